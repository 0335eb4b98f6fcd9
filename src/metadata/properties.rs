//! The `properties` block and its flat / per-object shape.
//!
//! A record never says which shape it uses. The shape is detected by probing:
//! if any value under `properties` is itself an object, the whole block is
//! per-object; otherwise it is one flat set applied to every mesh.

use serde_json::{Map, Value};

use super::value::{set_to_json, PropertySet};

/// Detected layout of a `properties` block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyShape {
    /// One property set for every eligible object.
    Flat,
    /// Property sets keyed by object name.
    Nested,
}

impl PropertyShape {
    /// Classify a raw `properties` object.
    pub fn detect(map: &Map<String, Value>) -> Self {
        if map.values().any(Value::is_object) {
            Self::Nested
        } else {
            Self::Flat
        }
    }

    /// Lowercase label used in logs and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Nested => "nested",
        }
    }
}

/// A classified `properties` block.
///
/// Values are kept as raw JSON; conversion and coercion happen when the block
/// is applied to scene objects so one bad value only costs its own key.
#[derive(Clone, Debug, PartialEq)]
pub enum Properties {
    /// Key to value, applied to every mesh.
    Flat(Map<String, Value>),
    /// Object name to (key to value). Entries that are not objects are kept
    /// so they can be reported when matched.
    Nested(Map<String, Value>),
}

impl Default for Properties {
    fn default() -> Self {
        Self::Flat(Map::new())
    }
}

impl Properties {
    /// Classify a raw JSON object.
    pub fn classify(map: Map<String, Value>) -> Self {
        match PropertyShape::detect(&map) {
            PropertyShape::Flat => Self::Flat(map),
            PropertyShape::Nested => Self::Nested(map),
        }
    }

    /// Build a flat block from one object's properties.
    pub fn flat(set: &PropertySet) -> Self {
        Self::Flat(set_to_json(set))
    }

    /// Build a per-object block.
    ///
    /// Objects with no properties are omitted. If every set is empty the result
    /// is an empty map, which classifies as flat on the way back in.
    pub fn per_object<'a>(sets: impl IntoIterator<Item = (&'a str, &'a PropertySet)>) -> Self {
        let map: Map<String, Value> = sets
            .into_iter()
            .filter(|(_, set)| !set.is_empty())
            .map(|(name, set)| (name.to_string(), Value::Object(set_to_json(set))))
            .collect();
        Self::classify(map)
    }

    pub fn shape(&self) -> PropertyShape {
        match self {
            Self::Flat(_) => PropertyShape::Flat,
            Self::Nested(_) => PropertyShape::Nested,
        }
    }

    /// The underlying JSON object, regardless of shape.
    pub fn as_map(&self) -> &Map<String, Value> {
        match self {
            Self::Flat(map) | Self::Nested(map) => map,
        }
    }

    pub fn len(&self) -> usize {
        self.as_map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_map().is_empty()
    }

    /// Convert to the JSON value written under `properties`.
    pub fn to_json(&self) -> Value {
        Value::Object(self.as_map().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::PropertyValue;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_shape_flat() {
        let map = obj(json!({"a": 1, "b": 2}));
        assert_eq!(PropertyShape::detect(&map), PropertyShape::Flat);
    }

    #[test]
    fn test_shape_nested() {
        let map = obj(json!({"Cube": {"a": 1}}));
        assert_eq!(PropertyShape::detect(&map), PropertyShape::Nested);
    }

    #[test]
    fn test_shape_empty_is_flat() {
        let props = Properties::classify(Map::new());
        assert_eq!(props.shape(), PropertyShape::Flat);
        assert!(props.is_empty());
    }

    #[test]
    fn test_shape_mixed_is_nested() {
        // One mapping is enough to switch the whole block.
        let map = obj(json!({"mass": 3, "Cube": {"a": 1}}));
        assert_eq!(Properties::classify(map).shape(), PropertyShape::Nested);
    }

    #[test]
    fn test_per_object_skips_empty_sets() {
        let mut cube = PropertySet::new();
        cube.insert("mass".into(), PropertyValue::Int(3));
        let empty = PropertySet::new();

        let props = Properties::per_object([("Cube", &cube), ("Empty", &empty)]);
        assert_eq!(props.shape(), PropertyShape::Nested);
        assert_eq!(props.to_json(), json!({"Cube": {"mass": 3}}));
    }
}

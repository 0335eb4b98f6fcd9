//! The versioned metadata record stored as `nx3.json`.

use serde::Serialize;
use serde_json::{Map, Value};

use super::properties::Properties;
use crate::util::{Error, Result};

/// Version written by this library.
pub const RECORD_VERSION: &str = "2.0";

/// Version of records without descriptive blocks.
pub const LEGACY_VERSION: &str = "1.0";

/// Value of the informational `type` key.
pub const RECORD_TYPE: &str = "nx3_properties";

/// Format tag of the model payload.
pub const MODEL_FORMAT: &str = "glb";

pub const GEOMETRY_KEY: &str = "Geometry_properties";
pub const LORA_KEY: &str = "Lora_properties";

/// Parsed metadata record.
///
/// `Geometry_properties` and `Lora_properties` are opaque: they are carried
/// through exactly as read and never interpreted.
#[derive(Clone, Debug, PartialEq)]
pub struct MetadataRecord {
    pub version: String,
    /// The `type` key.
    pub kind: String,
    pub properties: Properties,
    pub geometry: Option<Value>,
    pub lora: Option<Value>,
}

/// Descriptive block about the exported geometry.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeometryProperties {
    pub name: String,
    pub collection: String,
    #[serde(rename = "3d_format")]
    pub format: String,
}

/// Descriptive block about an auxiliary adaptation artifact.
#[derive(Clone, Debug, PartialEq, Serialize, serde::Deserialize)]
pub struct LoraProperties {
    pub source: String,
    pub destination: String,
}

impl Default for LoraProperties {
    fn default() -> Self {
        Self {
            source: "local".to_string(),
            destination: String::new(),
        }
    }
}

#[derive(Serialize)]
struct RecordOut<'a> {
    version: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    #[serde(rename = "Geometry_properties", skip_serializing_if = "Option::is_none")]
    geometry: Option<&'a Value>,
    #[serde(rename = "Lora_properties", skip_serializing_if = "Option::is_none")]
    lora: Option<&'a Value>,
    properties: &'a Map<String, Value>,
}

impl MetadataRecord {
    /// Create a legacy record with only a `properties` block.
    pub fn legacy(properties: Properties) -> Self {
        Self {
            version: LEGACY_VERSION.to_string(),
            kind: RECORD_TYPE.to_string(),
            properties,
            geometry: None,
            lora: None,
        }
    }

    /// Build a current-version record with default descriptive blocks.
    pub fn build(base_name: &str, properties: Properties) -> Self {
        RecordBuilder::new(base_name).properties(properties).build()
    }

    /// Start building a current-version record.
    pub fn builder(base_name: &str) -> RecordBuilder {
        RecordBuilder::new(base_name)
    }

    /// Parse a record from JSON bytes.
    ///
    /// A missing `properties` key yields an empty flat block. A `properties`
    /// value that is not an object is ignored with a warning.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| Error::InvalidMetadata(e.to_string()))?;
        let Value::Object(mut top) = value else {
            return Err(Error::InvalidMetadata(format!(
                "expected a JSON object at top level, got {}",
                json_type(&value)
            )));
        };

        let properties = match top.remove("properties") {
            Some(Value::Object(map)) => Properties::classify(map),
            Some(other) => {
                tracing::warn!(
                    "Ignoring 'properties' of type {}, expected an object",
                    json_type(&other)
                );
                Properties::default()
            }
            None => Properties::default(),
        };

        Ok(Self {
            version: top.get("version").map(text_of).unwrap_or_default(),
            kind: top.get("type").map(text_of).unwrap_or_default(),
            properties,
            geometry: top.remove(GEOMETRY_KEY),
            lora: top.remove(LORA_KEY),
        })
    }

    /// Serialize to pretty-printed JSON with a fixed key order.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let out = RecordOut {
            version: &self.version,
            kind: &self.kind,
            geometry: self.geometry.as_ref(),
            lora: self.lora.as_ref(),
            properties: self.properties.as_map(),
        };
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        out.serialize(&mut ser)?;
        Ok(buf)
    }

    /// Whether this is a v1 record.
    pub fn is_legacy(&self) -> bool {
        self.version.starts_with('1')
    }

    /// `Geometry_properties.name`, if present and textual.
    pub fn geometry_name(&self) -> Option<&str> {
        self.geometry.as_ref()?.get("name")?.as_str()
    }
}

/// Builder for current-version records.
#[derive(Clone, Debug)]
pub struct RecordBuilder {
    geometry: GeometryProperties,
    lora: LoraProperties,
    properties: Properties,
}

impl RecordBuilder {
    pub fn new(base_name: &str) -> Self {
        Self {
            geometry: GeometryProperties {
                name: base_name.to_string(),
                collection: String::new(),
                format: MODEL_FORMAT.to_string(),
            },
            lora: LoraProperties::default(),
            properties: Properties::default(),
        }
    }

    /// Name of the collection the exported objects came from.
    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.geometry.collection = collection.into();
        self
    }

    /// Override the model format tag.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.geometry.format = format.into();
        self
    }

    pub fn lora(mut self, lora: LoraProperties) -> Self {
        self.lora = lora;
        self
    }

    pub fn properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    pub fn build(self) -> MetadataRecord {
        MetadataRecord {
            version: RECORD_VERSION.to_string(),
            kind: RECORD_TYPE.to_string(),
            properties: self.properties,
            // Plain structs of strings always serialize.
            geometry: serde_json::to_value(&self.geometry).ok(),
            lora: serde_json::to_value(&self.lora).ok(),
        }
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

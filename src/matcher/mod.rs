//! Property matcher - applies a metadata `properties` block to freshly
//! imported objects.
//!
//! Flat blocks go to every imported mesh. Per-object blocks are looked up by
//! exact object name first, then by the name with its disambiguation suffix
//! stripped, so properties keyed `Cube` still reach an object the host had to
//! call `Cube.001`.
//!
//! Failures are per key: a value that cannot be set is reported and skipped,
//! and the pass continues with the next key and object.

use serde_json::{Map, Value};

use crate::metadata::{coerce, Properties, PropertyShape, PropertyValue};
use crate::scene::{base_name, PropertyUi, Scene};
use crate::util::{Error, Result};

/// How an object found its property set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchKind {
    /// Flat block, applied because the object is a mesh.
    Flat,
    /// Key equals the object name.
    Exact,
    /// Key equals the object name without its `.NNN` suffix.
    BaseName,
}

/// One object that received a property set.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectMatch {
    pub object: String,
    /// Key in `properties` that matched; empty for flat blocks.
    pub key: String,
    pub kind: MatchKind,
    /// Number of keys set successfully.
    pub applied: usize,
}

/// Outcome of one matching pass.
#[derive(Debug)]
pub struct MatchReport {
    pub shape: PropertyShape,
    pub matches: Vec<ObjectMatch>,
    /// Non-fatal per-key failures, all `Error::PropertyApplyFailed`.
    pub failures: Vec<Error>,
}

impl MatchReport {
    fn new(shape: PropertyShape) -> Self {
        Self {
            shape,
            matches: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Total keys set across all objects.
    pub fn applied(&self) -> usize {
        self.matches.iter().map(|m| m.applied).sum()
    }

    /// Match for a given object, if it received anything.
    pub fn match_for(&self, object: &str) -> Option<&ObjectMatch> {
        self.matches.iter().find(|m| m.object == object)
    }
}

/// Apply `properties` to `new_objects`.
///
/// Every object that had at least one key set is tagged for redraw.
pub fn apply_properties(
    scene: &mut dyn Scene,
    properties: &Properties,
    new_objects: &[String],
) -> MatchReport {
    let mut report = MatchReport::new(properties.shape());

    match properties {
        Properties::Flat(set) => {
            tracing::info!("Found single property set ({} keys)", set.len());
            if set.is_empty() {
                return report;
            }
            for object in new_objects {
                if !scene.kind(object).is_some_and(|k| k.is_mesh()) {
                    continue;
                }
                let applied = apply_set(scene, object, set, &mut report.failures);
                report.matches.push(ObjectMatch {
                    object: object.clone(),
                    key: String::new(),
                    kind: MatchKind::Flat,
                    applied,
                });
            }
        }
        Properties::Nested(sets) => {
            tracing::info!("Found multiple property sets ({} objects)", sets.len());
            for object in new_objects {
                let Some((key, kind)) = find_set(sets, object) else {
                    tracing::debug!("No property set for {object}");
                    continue;
                };
                let applied = match &sets[key] {
                    Value::Object(set) => apply_set(scene, object, set, &mut report.failures),
                    other => {
                        report.failures.push(failure(
                            object,
                            key,
                            format!("property set must be an object, got {other}"),
                        ));
                        0
                    }
                };
                report.matches.push(ObjectMatch {
                    object: object.clone(),
                    key: key.to_string(),
                    kind,
                    applied,
                });
            }
        }
    }

    for m in report.matches.iter().filter(|m| m.applied > 0) {
        scene.tag_redraw(&m.object);
    }
    for f in &report.failures {
        tracing::warn!("{f}");
    }
    tracing::info!(
        "Applied {} properties to {} objects ({} failed)",
        report.applied(),
        report.matches.len(),
        report.failures.len()
    );
    report
}

/// Find the per-object set for `object`: exact name, then base name.
pub fn find_set<'a>(sets: &'a Map<String, Value>, object: &str) -> Option<(&'a str, MatchKind)> {
    if let Some((key, _)) = sets.get_key_value(object) {
        return Some((key.as_str(), MatchKind::Exact));
    }
    let base = base_name(object);
    if base != object {
        if let Some((key, _)) = sets.get_key_value(base) {
            return Some((key.as_str(), MatchKind::BaseName));
        }
    }
    None
}

fn apply_set(
    scene: &mut dyn Scene,
    object: &str,
    set: &Map<String, Value>,
    failures: &mut Vec<Error>,
) -> usize {
    let mut applied = 0;
    for (key, raw) in set {
        match set_property(scene, object, key, raw) {
            Ok(value) => {
                tracing::debug!("Set property {key}={value} on {object}");
                applied += 1;
            }
            Err(e) => failures.push(e),
        }
    }
    applied
}

/// Coerce and set one property, replacing any previous value and UI entry.
fn set_property(
    scene: &mut dyn Scene,
    object: &str,
    key: &str,
    raw: &Value,
) -> Result<PropertyValue> {
    let value = PropertyValue::from_json(raw)
        .map(coerce)
        .ok_or_else(|| failure(object, key, format!("unsupported value {raw}")))?;

    let host = |e: Error| failure(object, key, e.to_string());
    if scene.has_property(object, key) {
        scene.remove_property(object, key).map_err(host)?;
    }
    scene
        .set_property(object, key, value.clone())
        .map_err(host)?;
    scene
        .set_property_ui(object, key, PropertyUi::for_value(&value))
        .map_err(host)?;
    Ok(value)
}

fn failure(object: &str, key: &str, reason: String) -> Error {
    Error::PropertyApplyFailed {
        object: object.to_string(),
        key: key.to_string(),
        reason,
    }
}

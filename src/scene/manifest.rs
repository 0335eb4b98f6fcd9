//! JSON manifest codec.
//!
//! Stands in for a real GLB encoder where only object identity matters:
//! headless tooling and tests. The payload lists each exported object's name
//! and kind; decoding recreates them through [`Scene::create_object`].

use serde::{Deserialize, Serialize};

use super::{ObjectKind, Scene, SceneCodec};
use crate::util::{Error, Result};

/// Format tag written for manifest payloads.
pub const MANIFEST_FORMAT: &str = "nx3-manifest";

#[derive(Debug, Serialize, Deserialize)]
struct Manifest {
    format: String,
    objects: Vec<ManifestEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ManifestEntry {
    name: String,
    kind: ObjectKind,
}

/// Codec that stores the object list as JSON.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManifestCodec;

impl SceneCodec for ManifestCodec {
    fn format_tag(&self) -> &str {
        MANIFEST_FORMAT
    }

    fn encode(&self, scene: &dyn Scene, objects: &[String]) -> Result<Vec<u8>> {
        let objects = objects
            .iter()
            .map(|name| {
                let kind = scene
                    .kind(name)
                    .ok_or_else(|| Error::ObjectNotFound(name.clone()))?;
                Ok(ManifestEntry {
                    name: name.clone(),
                    kind,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let manifest = Manifest {
            format: MANIFEST_FORMAT.to_string(),
            objects,
        };
        Ok(serde_json::to_vec(&manifest)?)
    }

    fn decode(&self, scene: &mut dyn Scene, payload: &[u8]) -> Result<Vec<String>> {
        let manifest: Manifest =
            serde_json::from_slice(payload).map_err(|e| Error::codec(e.to_string()))?;
        if manifest.format != MANIFEST_FORMAT {
            return Err(Error::codec(format!(
                "unexpected payload format: {}",
                manifest.format
            )));
        }
        manifest
            .objects
            .iter()
            .map(|entry| scene.create_object(&entry.name, entry.kind))
            .collect()
    }
}

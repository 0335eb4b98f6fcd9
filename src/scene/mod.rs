//! Host scene-graph and scene-codec capabilities.
//!
//! The library never talks to a host application directly. Everything it
//! needs from the scene is expressed by [`Scene`], and the GLB encode/decode
//! step by [`SceneCodec`]. Objects are referred to by name, which is unique
//! within a scene but may be rewritten by the host (`Cube` -> `Cube.001`).
//!
//! - [`MemoryScene`] - In-memory scene with host-style name disambiguation
//! - [`ManifestCodec`] - Deterministic JSON stand-in for a GLB codec

mod manifest;
mod memory;
mod naming;

pub use manifest::{ManifestCodec, MANIFEST_FORMAT};
pub use memory::{MemoryObject, MemoryScene, MeshData, MAX_PROPERTY_KEY_LEN};
pub use naming::{base_name, split_suffix, unique_name, SUFFIX_SEPARATOR};

use crate::metadata::{PropertySet, PropertyValue};
use crate::util::Result;

/// Type tag of a scene object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Mesh,
    Empty,
    Camera,
    Light,
    Curve,
    Armature,
    Other,
}

impl ObjectKind {
    #[inline]
    pub fn is_mesh(&self) -> bool {
        matches!(self, Self::Mesh)
    }
}

/// UI description entry kept alongside a custom property.
///
/// This is metadata about a property and is never exported.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyUi {
    pub description: String,
    pub default: Option<PropertyValue>,
    pub overridable: bool,
}

impl PropertyUi {
    /// Entry written for a freshly imported value.
    pub fn for_value(value: &PropertyValue) -> Self {
        Self {
            description: String::new(),
            default: Some(value.clone()),
            overridable: true,
        }
    }
}

/// Mutable access to the host scene graph.
pub trait Scene {
    /// Whether an object with this name exists.
    fn contains(&self, name: &str) -> bool;

    /// Type tag of an object.
    fn kind(&self, name: &str) -> Option<ObjectKind>;

    /// Names of all objects, in scene order.
    fn object_names(&self) -> Vec<String>;

    /// Currently selected objects, in selection order.
    fn selected(&self) -> Vec<String>;

    /// Replace the selection. The first name becomes the active object.
    fn select(&mut self, names: &[String]) -> Result<()>;

    /// Name of the collection new objects are linked into.
    fn active_collection(&self) -> Option<String> {
        None
    }

    /// Create an object and link it into the active collection. Returns the
    /// name the host assigned.
    fn create_object(&mut self, name: &str, kind: ObjectKind) -> Result<String>;

    /// Duplicate an object together with its data block and link the copy
    /// into the active collection. Returns the name the host assigned.
    fn duplicate(&mut self, name: &str) -> Result<String>;

    /// Bake all modifiers of a mesh object into its data.
    fn apply_modifiers(&mut self, name: &str) -> Result<()>;

    /// Merge the geometry of `sources` into `target`. Sources stay in the
    /// scene; removing them is up to the caller.
    fn join(&mut self, target: &str, sources: &[String]) -> Result<()>;

    /// Rename an object. Returns the name the host assigned, which may carry
    /// a disambiguation suffix.
    fn rename(&mut self, name: &str, requested: &str) -> Result<String>;

    /// Unlink and delete an object.
    fn remove(&mut self, name: &str) -> Result<()>;

    /// Custom properties of an object, excluding the UI side-table.
    fn custom_properties(&self, name: &str) -> Result<PropertySet>;

    /// Whether an object has a custom property with this key.
    fn has_property(&self, name: &str, key: &str) -> bool;

    /// Set a custom property.
    fn set_property(&mut self, name: &str, key: &str, value: PropertyValue) -> Result<()>;

    /// Delete a custom property and its UI entry.
    fn remove_property(&mut self, name: &str, key: &str) -> Result<()>;

    /// Set the UI entry of a property, creating the side-table if needed.
    fn set_property_ui(&mut self, name: &str, key: &str, ui: PropertyUi) -> Result<()>;

    /// Ask the host to refresh any view showing this object.
    fn tag_redraw(&mut self, name: &str);
}

/// Encoder/decoder for the model payload.
pub trait SceneCodec {
    /// Format tag recorded in `Geometry_properties.3d_format`.
    fn format_tag(&self) -> &str {
        crate::metadata::MODEL_FORMAT
    }

    /// Encode exactly the named objects.
    fn encode(&self, scene: &dyn Scene, objects: &[String]) -> Result<Vec<u8>>;

    /// Decode a payload into new scene objects. Returns the names of the
    /// objects created.
    fn decode(&self, scene: &mut dyn Scene, payload: &[u8]) -> Result<Vec<String>>;
}

//! # NX3
//!
//! Reader and writer for the NX3 container: a zip archive that bundles a
//! binary glTF scene, a JSON record of per-object custom properties and a
//! reserved weights blob.
//!
//! The crate does not decode geometry and does not own a scene graph. Hosts
//! plug in through two traits: [`scene::Scene`] for the scene graph and
//! [`scene::SceneCodec`] for the model payload. Everything in between lives
//! here: archive layout, the versioned metadata schema, string-to-number
//! coercion, matching properties onto imported objects, and the export
//! staging that never touches the user's originals.
//!
//! ## Modules
//!
//! - [`util`] - Error type
//! - [`archive`] - Container pack/unpack with size guard
//! - [`metadata`] - Metadata record, property values, coercion
//! - [`scene`] - Host capabilities, in-memory scene, manifest codec
//! - [`matcher`] - Applies a properties block to imported objects
//! - [`staging`] - Duplicate/merge/cleanup pipeline for export
//! - [`ops`] - Import and export entry points
//! - [`settings`] - Persistent defaults
//!
//! ## Example
//!
//! ```ignore
//! use nx3::prelude::*;
//!
//! let mut scene = MemoryScene::new();
//! let report = import_archive("chair.nx3", &mut scene, &ManifestCodec, &ImportOptions::default())?;
//!
//! for name in &report.objects {
//!     println!("{name}");
//! }
//! ```

pub mod util;
pub mod archive;
pub mod metadata;
pub mod scene;
pub mod matcher;
pub mod staging;
pub mod ops;
pub mod settings;

// Re-export commonly used types
pub use util::{Error, Result};
pub use metadata::{MetadataRecord, Properties, PropertyValue};
pub use ops::{export_archive, import_archive, ExportOptions, ImportOptions};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result};
    pub use crate::archive::{pack, unpack, ArchivePayload, UnpackedArchive};
    pub use crate::metadata::{coerce, MetadataRecord, Properties, PropertyShape, PropertyValue};
    pub use crate::scene::{ManifestCodec, MemoryObject, MemoryScene, ObjectKind, Scene, SceneCodec};
    pub use crate::ops::{
        export_archive, export_objects, import_archive, ExportOptions, ExportReport,
        ImportOptions, ImportReport,
    };
    pub use crate::settings::Settings;
}

//! Import and export orchestration.
//!
//! - [`import_archive`] - Unpack, decode through a [`SceneCodec`], apply properties
//! - [`export_archive`] / [`export_objects`] - Stage, encode, build metadata, pack
//!
//! [`SceneCodec`]: crate::scene::SceneCodec

mod export;
mod import;
mod options;

pub use export::{export_archive, export_objects, normalize_path, ExportReport};
pub use import::{import_archive, ImportReport};
pub use options::{ExportOptions, ImportOptions};

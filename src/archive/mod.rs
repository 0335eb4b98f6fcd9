//! NX3 container - a zip archive holding three role-tagged entries.
//!
//! | entry | role | required |
//! |---|---|---|
//! | `model.glb` (any `*.glb`) | binary scene | yes |
//! | `nx3.json` (any `*.json`, legacy `*.txt`) | metadata record | no |
//! | `nx3.safetensor` (any `*.safetensor`) | weights blob | no |
//!
//! - [`unpack`] / [`unpack_with_limit`] - Guarded extraction into a scoped temp dir
//! - [`pack`] - Atomic write of the three canonical entries
//! - [`GlbHeader`] - Header probe for the model payload

mod entry;
mod glb;
mod reader;
mod writer;

pub use entry::{EntryRole, METADATA_ENTRY, MODEL_ENTRY, WEIGHTS_ENTRY};
pub use glb::{GlbHeader, CHUNK_BIN, CHUNK_JSON, GLB_MAGIC};
pub use reader::{unpack, unpack_with_limit, ExtractedEntry, UnpackedArchive, MAX_UNCOMPRESSED_SIZE};
pub use writer::{pack, ArchivePayload};

/// File extension of NX3 archives, without the dot.
pub const EXTENSION: &str = "nx3";

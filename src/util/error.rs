//! Error types for the NX3 library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for NX3 operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Container cannot be parsed as a zip archive
    #[error("Invalid .nx3 archive: {0}")]
    CorruptArchive(String),

    /// Summed uncompressed entry sizes exceed the configured cap
    #[error("Archive too large: {size} bytes uncompressed (limit: {limit})")]
    ArchiveTooLarge { size: u64, limit: u64 },

    /// No `.glb` entry in the archive
    #[error("No .glb model found in the NX3 archive")]
    MissingModel,

    /// Metadata is not valid JSON or not a JSON object
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    /// Export requested with an empty selection
    #[error("No objects selected for export")]
    NothingSelected,

    /// Existing destination file could not be removed
    #[error("Cannot overwrite existing file {}: {source}", path.display())]
    DestinationBusy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single custom property could not be set (non-fatal)
    #[error("Failed to set {key} on {object}: {reason}")]
    PropertyApplyFailed {
        object: String,
        key: String,
        reason: String,
    },

    /// Scene object not found by name
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    /// Host scene graph rejected an operation
    #[error("Scene operation failed: {0}")]
    Scene(String),

    /// Scene codec failed to encode or decode the model payload
    #[error("Scene codec failed: {0}")]
    Codec(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a scene error from a string.
    pub fn scene(msg: impl Into<String>) -> Self {
        Self::Scene(msg.into())
    }

    /// Create a codec error from a string.
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    /// Whether this error aborts the surrounding operation.
    ///
    /// Only per-key property failures are recoverable; they are logged and
    /// skipped by the matcher.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::PropertyApplyFailed { .. })
    }
}

/// Result type alias for NX3 operations.
pub type Result<T> = std::result::Result<T, Error>;

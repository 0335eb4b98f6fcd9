//! Archive packing.
//!
//! The archive is written to a staging file next to the destination and then
//! moved into place, so a failed write never leaves a partial `.nx3` behind.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use super::entry::{METADATA_ENTRY, MODEL_ENTRY, WEIGHTS_ENTRY};
use crate::util::{Error, Result};

/// The three payloads written into an archive.
#[derive(Clone, Copy, Debug)]
pub struct ArchivePayload<'a> {
    /// Binary scene (GLB).
    pub model: &'a [u8],
    /// Serialized metadata record.
    pub metadata: &'a [u8],
    /// Weights blob; may be empty.
    pub weights: &'a [u8],
}

/// Write an archive to `path`, replacing any existing file.
///
/// An existing destination is removed before anything is written; if that
/// fails the call returns `DestinationBusy` and nothing else happens.
pub fn pack(path: impl AsRef<Path>, payload: &ArchivePayload<'_>) -> Result<()> {
    let path = path.as_ref();
    remove_existing(path)?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut staging = tempfile::Builder::new()
        .prefix(".nx3-")
        .suffix(".tmp")
        .tempfile_in(parent)?;

    {
        let mut zip = ZipWriter::new(BufWriter::new(staging.as_file_mut()));
        // Fixed timestamp and permissions keep output reproducible.
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default())
            .unix_permissions(0o644);

        for (name, data) in [
            (MODEL_ENTRY, payload.model),
            (METADATA_ENTRY, payload.metadata),
            (WEIGHTS_ENTRY, payload.weights),
        ] {
            zip.start_file(name, options).map_err(zip_err)?;
            zip.write_all(data)?;
            tracing::debug!("Wrote entry {name} ({} bytes)", data.len());
        }

        let mut inner = zip.finish().map_err(zip_err)?;
        inner.flush()?;
    }

    staging.persist(path).map_err(|e| Error::Io(e.error))?;
    tracing::info!("Packed NX3 archive to {:?}", path);
    Ok(())
}

fn remove_existing(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!("Removed existing file {:?}", path);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(Error::DestinationBusy {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn zip_err(e: zip::result::ZipError) -> Error {
    Error::Io(io::Error::other(e.to_string()))
}

//! Archive unpacking.
//!
//! Entries are extracted into a scoped temporary directory that is removed
//! when the returned [`UnpackedArchive`] is dropped, whatever the outcome.

use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::ZipArchive;

use super::entry::{is_top_level, EntryRole};
use crate::util::{Error, Result};

/// Hard cap on the summed uncompressed size of all entries (5 GiB).
pub const MAX_UNCOMPRESSED_SIZE: u64 = 5 * 1024 * 1024 * 1024;

/// One extracted file.
#[derive(Clone, Debug)]
pub struct ExtractedEntry {
    /// Entry name inside the archive.
    pub name: String,
    /// Declared uncompressed size.
    pub size: u64,
    /// Role, if this is a top-level entry with a known suffix.
    pub role: Option<EntryRole>,
    /// Location inside the extraction directory.
    pub path: PathBuf,
}

/// An extracted archive.
///
/// Holds the temporary extraction directory; dropping this value deletes it.
pub struct UnpackedArchive {
    dir: TempDir,
    entries: Vec<ExtractedEntry>,
    model: Option<usize>,
    metadata: Option<usize>,
    weights: Option<usize>,
}

/// Unpack an archive with the default size cap.
pub fn unpack(path: impl AsRef<Path>) -> Result<UnpackedArchive> {
    unpack_with_limit(path, MAX_UNCOMPRESSED_SIZE)
}

/// Unpack an archive, rejecting it if its entries exceed `limit` bytes.
///
/// The declared sizes are summed before anything is written. Extraction also
/// counts actual bytes, so an entry that lies about its size cannot push the
/// total past the cap either.
pub fn unpack_with_limit(path: impl AsRef<Path>, limit: u64) -> Result<UnpackedArchive> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut archive =
        ZipArchive::new(BufReader::new(file)).map_err(|e| Error::CorruptArchive(e.to_string()))?;

    // Pass 1: names and declared sizes only.
    let mut listing: Vec<(String, usize, u64, bool)> = Vec::with_capacity(archive.len());
    let mut declared: u64 = 0;
    for index in 0..archive.len() {
        let entry = archive
            .by_index(index)
            .map_err(|e| Error::CorruptArchive(e.to_string()))?;
        declared = declared.saturating_add(entry.size());
        listing.push((entry.name().to_string(), index, entry.size(), entry.is_dir()));
    }
    if declared > limit {
        return Err(Error::ArchiveTooLarge {
            size: declared,
            limit,
        });
    }

    // Deterministic classification regardless of central-directory order.
    listing.sort_by(|a, b| a.0.cmp(&b.0));

    let dir = tempfile::Builder::new().prefix("nx3-").tempdir()?;
    tracing::debug!("Extracting {} entries to {:?}", listing.len(), dir.path());

    let mut unpacked = UnpackedArchive {
        dir,
        entries: Vec::with_capacity(listing.len()),
        model: None,
        metadata: None,
        weights: None,
    };

    let mut written: u64 = 0;
    for (name, index, size, is_dir) in listing {
        if is_dir {
            continue;
        }
        let mut entry = archive
            .by_index(index)
            .map_err(|e| Error::CorruptArchive(e.to_string()))?;
        let Some(relative) = entry.enclosed_name() else {
            tracing::warn!("Skipping entry with unsafe path: {name}");
            continue;
        };

        let dest = unpacked.dir.path().join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&dest)?;
        let budget = limit - written;
        let copied = io::copy(&mut (&mut entry).take(budget.saturating_add(1)), &mut out)
            .map_err(|e| Error::CorruptArchive(format!("{name}: {e}")))?;
        if copied > budget {
            return Err(Error::ArchiveTooLarge {
                size: written + copied,
                limit,
            });
        }
        written += copied;

        let role = if is_top_level(&name) {
            EntryRole::classify(&name)
        } else {
            None
        };
        tracing::debug!("Extracted {name} ({copied} bytes, role: {role:?})");
        unpacked.record(ExtractedEntry {
            name,
            size,
            role,
            path: dest,
        });
    }

    tracing::info!(
        "Unpacked {:?}: {} entries, {} bytes",
        path,
        unpacked.entries.len(),
        written
    );
    Ok(unpacked)
}

impl UnpackedArchive {
    fn record(&mut self, entry: ExtractedEntry) {
        let idx = self.entries.len();
        match entry.role {
            Some(EntryRole::Model) => self.model = Some(idx),
            Some(EntryRole::Weights) => self.weights = Some(idx),
            Some(EntryRole::Metadata { legacy }) => {
                // `.json` always beats legacy `.txt`; otherwise last wins.
                let keep_current = legacy
                    && self
                        .metadata
                        .is_some_and(|i| self.entries[i].role == Some(EntryRole::Metadata { legacy: false }));
                if !keep_current {
                    self.metadata = Some(idx);
                }
            }
            None => {}
        }
        self.entries.push(entry);
    }

    /// Extraction directory. Removed on drop.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// All extracted files, sorted by entry name.
    pub fn entries(&self) -> &[ExtractedEntry] {
        &self.entries
    }

    pub fn model(&self) -> Option<&ExtractedEntry> {
        self.model.map(|i| &self.entries[i])
    }

    pub fn metadata(&self) -> Option<&ExtractedEntry> {
        self.metadata.map(|i| &self.entries[i])
    }

    pub fn weights(&self) -> Option<&ExtractedEntry> {
        self.weights.map(|i| &self.entries[i])
    }

    /// Read the model payload. Fails with `MissingModel` if there is none.
    pub fn read_model(&self) -> Result<Vec<u8>> {
        let entry = self.model().ok_or(Error::MissingModel)?;
        Ok(fs::read(&entry.path)?)
    }

    /// Read the metadata entry, if present.
    pub fn read_metadata(&self) -> Result<Option<Vec<u8>>> {
        self.metadata()
            .map(|e| fs::read(&e.path))
            .transpose()
            .map_err(Error::from)
    }

    /// Read the weights blob, if present.
    pub fn read_weights(&self) -> Result<Option<Vec<u8>>> {
        self.weights()
            .map(|e| fs::read(&e.path))
            .transpose()
            .map_err(Error::from)
    }
}

impl std::fmt::Debug for UnpackedArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnpackedArchive")
            .field("dir", &self.dir.path())
            .field("entries", &self.entries)
            .finish()
    }
}

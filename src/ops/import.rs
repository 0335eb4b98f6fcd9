//! Archive import: unpack, decode, reconcile properties.

use std::path::Path;

use super::ImportOptions;
use crate::archive::{self, GlbHeader, UnpackedArchive};
use crate::matcher::{apply_properties, MatchReport};
use crate::metadata::{MetadataRecord, Properties};
use crate::scene::{Scene, SceneCodec};
use crate::util::Result;

/// What an import did.
#[derive(Debug)]
pub struct ImportReport {
    /// Objects created by the codec, as named by the host.
    pub objects: Vec<String>,
    /// Parsed metadata, if the archive had a usable entry.
    pub metadata: Option<MetadataRecord>,
    pub matches: MatchReport,
    /// Weights blob, if present.
    pub weights: Option<Vec<u8>>,
}

/// Import an archive into `scene`.
///
/// Objects the codec created stay in the scene even if some properties fail
/// to apply; those failures are in [`ImportReport::matches`].
pub fn import_archive(
    path: impl AsRef<Path>,
    scene: &mut dyn Scene,
    codec: &dyn SceneCodec,
    options: &ImportOptions,
) -> Result<ImportReport> {
    let path = path.as_ref();
    tracing::info!("Importing {}", path.display());

    let archive = archive::unpack(path)?;
    let model = archive.read_model()?;
    let metadata = read_metadata(&archive, options)?;
    let weights = archive.read_weights()?;

    match GlbHeader::parse(&model) {
        Some(header) if !header.matches_len(model.len()) => tracing::warn!(
            "GLB header declares {} bytes, payload has {}",
            header.length,
            model.len()
        ),
        Some(header) => tracing::debug!("GLB v{}, {} bytes", header.version, header.length),
        None => tracing::debug!("Model payload is not GLB, passing to codec as-is"),
    }

    let objects = codec.decode(scene, &model)?;
    tracing::info!("Decoded {} objects", objects.len());

    let empty = Properties::default();
    let properties = metadata.as_ref().map_or(&empty, |m| &m.properties);
    let matches = apply_properties(scene, properties, &objects);

    Ok(ImportReport {
        objects,
        metadata,
        matches,
        weights,
    })
}

fn read_metadata(
    archive: &UnpackedArchive,
    options: &ImportOptions,
) -> Result<Option<MetadataRecord>> {
    let Some(bytes) = archive.read_metadata()? else {
        tracing::info!("No metadata entry, importing without properties");
        return Ok(None);
    };
    match MetadataRecord::parse(&bytes) {
        Ok(record) => {
            tracing::debug!(
                "Metadata v{} ({}, {} entries)",
                record.version,
                record.properties.shape().label(),
                record.properties.len()
            );
            Ok(Some(record))
        }
        Err(e) if options.strict_metadata => Err(e),
        Err(e) => {
            tracing::warn!("Ignoring metadata: {e}");
            Ok(None)
        }
    }
}

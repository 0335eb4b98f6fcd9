//! Archive export: stage, encode, describe, pack.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use super::ExportOptions;
use crate::archive::{self, ArchivePayload, EXTENSION};
use crate::metadata::MetadataRecord;
use crate::scene::{Scene, SceneCodec};
use crate::staging::StagingSet;
use crate::util::Result;

/// What an export did.
#[derive(Debug)]
pub struct ExportReport {
    /// Final archive path, with extension normalized.
    pub path: PathBuf,
    /// Names the staged objects had when they were encoded.
    pub objects: Vec<String>,
    pub metadata: MetadataRecord,
    /// Size of the encoded model payload.
    pub model_size: usize,
}

/// Export the current selection of `scene` to `path`.
pub fn export_archive(
    path: impl AsRef<Path>,
    scene: &mut dyn Scene,
    codec: &dyn SceneCodec,
    options: &ExportOptions,
) -> Result<ExportReport> {
    let selection = scene.selected();
    export_objects(path, scene, &selection, codec, options)
}

/// Export `objects` to `path`.
///
/// The scene is left exactly as it was found: all work happens on staged
/// duplicates that are removed before this returns, on success or failure.
pub fn export_objects(
    path: impl AsRef<Path>,
    scene: &mut dyn Scene,
    objects: &[String],
    codec: &dyn SceneCodec,
    options: &ExportOptions,
) -> Result<ExportReport> {
    let path = normalize_path(path.as_ref());
    let base = base_name(&path)?;
    tracing::info!("Exporting {} objects to {}", objects.len(), path.display());

    let collection = scene.active_collection().unwrap_or_default();
    let mut staged = StagingSet::stage(scene, objects, options.staging(), &base)?;
    let model = staged.encode(codec)?;
    let exported = staged.names();
    let properties = staged.collect_properties(options.combine_meshes)?;

    let record = MetadataRecord::builder(&base)
        .collection(collection)
        .format(codec.format_tag())
        .lora(options.lora.clone())
        .properties(properties)
        .build();
    let metadata = record.serialize()?;

    archive::pack(
        &path,
        &ArchivePayload {
            model: &model,
            metadata: &metadata,
            weights: &[],
        },
    )?;
    staged.cleanup();

    tracing::info!(
        "Exported {} ({} objects, {} property entries)",
        path.display(),
        exported.len(),
        record.properties.len()
    );
    Ok(ExportReport {
        path,
        objects: exported,
        metadata: record,
        model_size: model.len(),
    })
}

/// Append `.nx3` unless the path already ends with it (any case).
pub fn normalize_path(path: &Path) -> PathBuf {
    let has_ext = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(EXTENSION));
    if has_ext {
        return path.to_path_buf();
    }
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(EXTENSION);
    PathBuf::from(name)
}

/// Export base name: the file name without its final extension.
fn base_name(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("no file name in {}", path.display()),
            )
            .into()
        })
}

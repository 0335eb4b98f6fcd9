//! Per-operation options.

use crate::metadata::LoraProperties;
use crate::settings::Settings;
use crate::staging::StagingOptions;

/// Options for [`import_archive`](super::import_archive).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Fail with `InvalidMetadata` instead of importing without properties.
    pub strict_metadata: bool,
}

impl From<&Settings> for ImportOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            strict_metadata: settings.strict_metadata,
        }
    }
}

/// Options for [`export_archive`](super::export_archive).
#[derive(Clone, Debug, PartialEq)]
pub struct ExportOptions {
    pub apply_modifiers: bool,
    pub combine_meshes: bool,
    pub lora: LoraProperties,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for ExportOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            apply_modifiers: settings.apply_modifiers,
            combine_meshes: settings.combine_meshes,
            lora: settings.lora(),
        }
    }
}

impl ExportOptions {
    pub fn staging(&self) -> StagingOptions {
        StagingOptions {
            apply_modifiers: self.apply_modifiers,
            combine_meshes: self.combine_meshes,
        }
    }
}

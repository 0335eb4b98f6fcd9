//! Persistent defaults for import and export.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::metadata::LoraProperties;
use crate::util::Result;

const APP_DIR: &str = "nx3";
const FILE_NAME: &str = "settings.json";

/// Settings that persist between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Export
    pub apply_modifiers: bool,
    pub combine_meshes: bool,
    pub lora_source: String,
    pub lora_destination: String,

    // Import
    /// Abort imports whose metadata entry is not valid JSON.
    pub strict_metadata: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let lora = LoraProperties::default();
        Self {
            apply_modifiers: true,
            combine_meshes: true,
            lora_source: lora.source,
            lora_destination: lora.destination,
            strict_metadata: false,
        }
    }
}

impl Settings {
    /// Location of the settings file, if the platform has a config dir.
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push(APP_DIR);
            p.push(FILE_NAME);
            p
        })
    }

    /// Load settings, falling back to defaults on any problem.
    pub fn load() -> Self {
        Self::path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    /// Load settings from a specific file, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        let Ok(text) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&text).unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable settings {}: {e}", path.display());
            Self::default()
        })
    }

    /// Save to the default location. Returns the path written.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "no config directory")
        })?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save to a specific file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        tracing::debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// `Lora_properties` block written on export.
    pub fn lora(&self) -> LoraProperties {
        LoraProperties {
            source: self.lora_source.clone(),
            destination: self.lora_destination.clone(),
        }
    }
}

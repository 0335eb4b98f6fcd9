//! Entry roles and their canonical names.

use std::fmt;

/// Canonical entry name of the model payload.
pub const MODEL_ENTRY: &str = "model.glb";
/// Canonical entry name of the metadata record.
pub const METADATA_ENTRY: &str = "nx3.json";
/// Canonical entry name of the weights blob.
pub const WEIGHTS_ENTRY: &str = "nx3.safetensor";

/// Role of an archive entry, identified by file suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryRole {
    /// `*.glb`
    Model,
    /// `*.json`, or `*.txt` when `legacy` is set
    Metadata { legacy: bool },
    /// `*.safetensor`
    Weights,
}

impl EntryRole {
    /// Classify an entry by case-insensitive suffix.
    pub fn classify(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".glb") {
            Some(Self::Model)
        } else if lower.ends_with(".json") {
            Some(Self::Metadata { legacy: false })
        } else if lower.ends_with(".txt") {
            Some(Self::Metadata { legacy: true })
        } else if lower.ends_with(".safetensor") {
            Some(Self::Weights)
        } else {
            None
        }
    }

    /// Canonical entry name written by `pack`.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            Self::Model => MODEL_ENTRY,
            Self::Metadata { .. } => METADATA_ENTRY,
            Self::Weights => WEIGHTS_ENTRY,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Metadata { legacy: false } => "metadata",
            Self::Metadata { legacy: true } => "metadata (legacy)",
            Self::Weights => "weights",
        }
    }
}

impl fmt::Display for EntryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether a zip entry name sits at the archive root.
pub(crate) fn is_top_level(name: &str) -> bool {
    !name.trim_end_matches('/').contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(EntryRole::classify("model.glb"), Some(EntryRole::Model));
        assert_eq!(EntryRole::classify("SCENE.GLB"), Some(EntryRole::Model));
        assert_eq!(
            EntryRole::classify("nx3.json"),
            Some(EntryRole::Metadata { legacy: false })
        );
        assert_eq!(
            EntryRole::classify("nx3.TXT"),
            Some(EntryRole::Metadata { legacy: true })
        );
        assert_eq!(EntryRole::classify("w.safetensor"), Some(EntryRole::Weights));
        assert_eq!(EntryRole::classify("readme.md"), None);
        assert_eq!(EntryRole::classify("glb"), None);
    }

    #[test]
    fn test_canonical_names() {
        assert_eq!(EntryRole::Model.canonical_name(), "model.glb");
        assert_eq!(EntryRole::Metadata { legacy: true }.canonical_name(), "nx3.json");
        assert_eq!(EntryRole::Weights.canonical_name(), "nx3.safetensor");
    }

    #[test]
    fn test_top_level() {
        assert!(is_top_level("model.glb"));
        assert!(!is_top_level("textures/a.png"));
        assert!(!is_top_level("sub\\model.glb"));
        assert!(is_top_level("folder/"));
        assert!(!is_top_level("folder/nested/"));
    }
}

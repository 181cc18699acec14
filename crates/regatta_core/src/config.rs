//! Store and ledger configuration.

use crate::document::Section;
use regatta_codec::LogoRecord;
use std::path::PathBuf;

/// The starting document used when no template file is configured.
pub const DEFAULT_TEMPLATE: &str = include_str!("../assets/template.orcsc");

/// How the first identifier of an empty section is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdBase {
    /// Races and boats both start at 1.
    #[default]
    One,
    /// Races start at 2 in an empty section, boats at 1. Matches documents
    /// produced by older tooling.
    LegacyRaceOffset,
}

impl IdBase {
    /// First id assigned in an empty `section`.
    #[must_use]
    pub const fn first_id(self, section: Section) -> i64 {
        match (self, section) {
            (Self::LegacyRaceOffset, Section::Race) => 2,
            _ => 1,
        }
    }
}

/// Configuration for the document editor.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Template file copied by `create_from_template`. `None` uses
    /// [`DEFAULT_TEMPLATE`].
    pub template_path: Option<PathBuf>,

    /// Logo rows written into every new document.
    pub logos: Vec<LogoRecord>,

    /// Identifier policy for empty sections.
    pub id_base: IdBase,

    /// Reject races and boats whose `ClassId` is not in `Cls`.
    pub check_class_refs: bool,

    /// Reject classes whose `ClassId` already exists.
    pub reject_duplicate_class_ids: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            template_path: None,
            logos: default_logos(),
            id_base: IdBase::One,
            check_class_refs: false,
            reject_duplicate_class_ids: false,
        }
    }
}

impl StoreConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the template file.
    #[must_use]
    pub fn template_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_path = Some(path.into());
        self
    }

    /// Replaces the logo rows.
    #[must_use]
    pub fn logos(mut self, logos: Vec<LogoRecord>) -> Self {
        self.logos = logos;
        self
    }

    /// Sets the identifier policy.
    #[must_use]
    pub const fn id_base(mut self, id_base: IdBase) -> Self {
        self.id_base = id_base;
        self
    }

    /// Sets whether class references are checked.
    #[must_use]
    pub const fn check_class_refs(mut self, value: bool) -> Self {
        self.check_class_refs = value;
        self
    }

    /// Sets whether duplicate class ids are rejected.
    #[must_use]
    pub const fn reject_duplicate_class_ids(mut self, value: bool) -> Self {
        self.reject_duplicate_class_ids = value;
        self
    }
}

/// The three logo slots, without payload.
#[must_use]
pub fn default_logos() -> Vec<LogoRecord> {
    ["center", "right", "left"]
        .into_iter()
        .map(|slot| LogoRecord::new(slot, "", "image/"))
        .collect()
}

/// Configuration for the backup ledger.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Directory every backed-up file must live under.
    pub base_dir: PathBuf,

    /// Name of the snapshot tree inside `base_dir`.
    pub backup_dir_name: String,

    /// Extension of snapshot metadata sidecars.
    pub metadata_extension: String,
}

impl LedgerConfig {
    /// Creates a configuration rooted at `base_dir`.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            backup_dir_name: "backups".to_string(),
            metadata_extension: "json".to_string(),
        }
    }

    /// Sets the snapshot tree name.
    #[must_use]
    pub fn backup_dir_name(mut self, name: impl Into<String>) -> Self {
        self.backup_dir_name = name.into();
        self
    }

    /// Sets the sidecar extension.
    #[must_use]
    pub fn metadata_extension(mut self, ext: impl Into<String>) -> Self {
        self.metadata_extension = ext.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = StoreConfig::default();
        assert!(config.template_path.is_none());
        assert_eq!(config.id_base, IdBase::One);
        assert!(!config.check_class_refs);
        assert_eq!(config.logos.len(), 3);
    }

    #[test]
    fn builder_pattern() {
        let config = StoreConfig::new()
            .id_base(IdBase::LegacyRaceOffset)
            .reject_duplicate_class_ids(true)
            .template_path("/tmp/t.orcsc");

        assert_eq!(config.id_base, IdBase::LegacyRaceOffset);
        assert!(config.reject_duplicate_class_ids);
        assert_eq!(config.template_path, Some(PathBuf::from("/tmp/t.orcsc")));
    }

    #[test]
    fn first_id_per_policy() {
        assert_eq!(IdBase::One.first_id(Section::Race), 1);
        assert_eq!(IdBase::LegacyRaceOffset.first_id(Section::Race), 2);
        assert_eq!(IdBase::LegacyRaceOffset.first_id(Section::Fleet), 1);
    }

    #[test]
    fn ledger_defaults() {
        let config = LedgerConfig::new("/data");
        assert_eq!(config.backup_dir_name, "backups");
        assert_eq!(config.metadata_extension, "json");
    }

    #[test]
    fn bundled_template_has_all_sections() {
        for section in ["<Event", "<Cls", "<Race", "<Fleet", "<reports"] {
            assert!(DEFAULT_TEMPLATE.contains(section), "{section}");
        }
    }
}

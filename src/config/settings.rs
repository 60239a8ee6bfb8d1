//! User settings for the planner
//!
//! Holds the per-book backup paths, the remote service configuration and the
//! references of the most recent online backups.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::paths::PlannerPaths;
use crate::error::{PlannerError, PlannerResult};
use crate::models::DocumentKind;
use crate::remote::Reference;
use crate::storage::file_io::{read_text_required, write_json_atomic};

/// Remote storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteSettings {
    /// Base URL of the GitHub REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Threads in the background worker pool
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,

    /// Per-request transport timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_worker_threads() -> usize {
    2
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            worker_threads: default_worker_threads(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RemoteSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// User settings for the planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Local backup file per book; unset books use the backup directory
    #[serde(default)]
    pub backup_paths: BTreeMap<DocumentKind, PathBuf>,

    /// Reference of the latest successful online backup per book
    #[serde(default)]
    pub references: BTreeMap<DocumentKind, Reference>,

    #[serde(default)]
    pub remote: RemoteSettings,
}

fn default_schema_version() -> u32 {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            backup_paths: BTreeMap::new(),
            references: BTreeMap::new(),
            remote: RemoteSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    pub fn load_or_create(paths: &PlannerPaths) -> PlannerResult<Self> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Not saved until something changes
            return Ok(Settings::default());
        }

        let contents = read_text_required(&settings_path)?;
        serde_json::from_str(&contents)
            .map_err(|e| PlannerError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &PlannerPaths) -> PlannerResult<()> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// Local backup file for a book
    pub fn backup_path(&self, paths: &PlannerPaths, kind: DocumentKind) -> PathBuf {
        self.backup_paths
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| paths.default_backup_file(kind))
    }

    pub fn reference(&self, kind: DocumentKind) -> Option<&Reference> {
        self.references.get(&kind)
    }

    /// Overwrite the stored reference for a book
    pub fn set_reference(&mut self, kind: DocumentKind, reference: Reference) {
        self.references.insert(kind, reference);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.remote.api_url, "https://api.github.com");
        assert_eq!(settings.remote.worker_threads, 2);
        assert!(settings.references.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.set_reference(DocumentKind::AddressBook, Reference::new("abc"));
        settings.remote.worker_threads = 4;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(
            loaded.reference(DocumentKind::AddressBook),
            Some(&Reference::new("abc"))
        );
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let loaded: Settings = serde_json::from_str(r#"{"remote": {"worker_threads": 3}}"#).unwrap();
        assert_eq!(loaded.schema_version, 1);
        assert_eq!(loaded.remote.worker_threads, 3);
        assert_eq!(loaded.remote.timeout_secs, 30);
    }

    #[test]
    fn test_backup_path_falls_back_to_backup_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut settings = Settings::default();

        assert_eq!(
            settings.backup_path(&paths, DocumentKind::AddressBook),
            paths.default_backup_file(DocumentKind::AddressBook)
        );

        settings
            .backup_paths
            .insert(DocumentKind::AddressBook, PathBuf::from("/srv/a.bak"));
        assert_eq!(
            settings.backup_path(&paths, DocumentKind::AddressBook),
            PathBuf::from("/srv/a.bak")
        );
    }

    #[test]
    fn test_corrupt_settings_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "{ nope").unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, PlannerError::Config(_)));
    }
}

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entry::AUTO_UPDATE_ACTOR;

/// Errors raised while reading the library configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Runtime settings of the template library.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Directory holding the backing store.
    pub data_dir: PathBuf,
    pub database_file: String,
    /// Actor recorded on entries whose geometry was refreshed automatically.
    pub auto_update_actor: String,
    /// Re-probe entries with unknown geometry at startup.
    pub refresh_geometry: bool,
    /// Render every entry once at startup and report failures.
    pub render_on_load: bool,
    pub log_filter: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("assets/library"),
            database_file: "souls_database.ron".to_string(),
            auto_update_actor: AUTO_UPDATE_ACTOR.to_string(),
            refresh_geometry: true,
            render_on_load: true,
            log_filter: "info".to_string(),
        }
    }
}

impl LibraryConfig {
    /// Location of the backing store.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(ron::from_str(&contents)?)
    }

    /// Load settings, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = LibraryConfig::load_or_default(&dir.path().join("soulbook.ron")).unwrap();
        assert_eq!(config, LibraryConfig::default());
        assert_eq!(config.database_path(), PathBuf::from("assets/library/souls_database.ron"));
        assert_eq!(config.auto_update_actor, "AutoUpdate");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("soulbook.ron");
        std::fs::write(&path, r#"(data_dir: "/srv/souls", render_on_load: false)"#).unwrap();

        let config = LibraryConfig::load_or_default(&path).unwrap();
        assert_eq!(config.database_path(), PathBuf::from("/srv/souls/souls_database.ron"));
        assert!(!config.render_on_load);
        assert!(config.refresh_geometry);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("soulbook.ron");
        std::fs::write(&path, "(data_dir: ").unwrap();

        assert!(matches!(LibraryConfig::load_or_default(&path), Err(ConfigError::Parse(_))));
    }
}

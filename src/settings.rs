//! Loader settings
//!
//! Persisted as JSON next to the game data. A missing or broken settings
//! file is never fatal; defaults are used instead.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::MapError;

/// Map loading preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the level map files
    pub map_dir: PathBuf,
    /// Reject maps containing cell codes with no defined meaning
    pub strict_cells: bool,
    /// Look for a keyed `<stem>.json` map before the legacy file
    pub prefer_keyed_format: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            map_dir: PathBuf::from("assets/maps"),
            strict_cells: false,
            prefer_keyed_format: false,
        }
    }
}

impl Settings {
    /// Default settings file name
    pub const FILE_NAME: &'static str = "hazard_run_settings.json";

    /// Load settings from `path`, falling back to defaults
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Ignoring invalid settings {}: {}", path.display(), e),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to read settings {}: {}", path.display(), e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to `path` as pretty JSON
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), MapError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| MapError::from_io(path, e))?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Full path of a map file inside `map_dir`
    pub fn map_path(&self, file_name: &str) -> PathBuf {
        self.map_dir.join(file_name)
    }

    /// Candidate paths for a map, in lookup order
    pub fn map_candidates(&self, file_name: &str) -> Vec<PathBuf> {
        let legacy = self.map_path(file_name);
        if !self.prefer_keyed_format {
            return vec![legacy];
        }
        let keyed = legacy.with_extension("json");
        if keyed == legacy {
            vec![legacy]
        } else {
            vec![keyed, legacy]
        }
    }
}

//! # Configuration
//!
//! Settings live in `config.json` inside the platform config directory (via
//! the `directories` crate). A missing file means defaults.
//!
//! ## Notes directory resolution
//!
//! 1. `--dir` on the command line
//! 2. `NOTEDIR_HOME` environment variable
//! 3. `notes_dir` in `config.json`
//! 4. `<platform data dir>/notes`
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `notes_dir` | unset | Directory holding the note files |
//! | `file_ext` | `.txt` | Suffix of note files |
//! | `debounce_ms` | `300` | Quiet period before an autosave |

use crate::error::{NotesError, Result};
use crate::manager::ManagerOptions;
use crate::naming::normalize_ext;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_FILE_EXT: &str = ".txt";
const DEFAULT_DEBOUNCE_MS: u64 = 300;

pub const HOME_ENV: &str = "NOTEDIR_HOME";
pub const CONFIG_DIR_ENV: &str = "NOTEDIR_CONFIG_DIR";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes_dir: Option<PathBuf>,

    #[serde(default = "default_file_ext")]
    pub file_ext: String,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_file_ext() -> String {
    DEFAULT_FILE_EXT.to_string()
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            notes_dir: None,
            file_ext: default_file_ext(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl NotesConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(NotesError::Io)?;
        let config: NotesConfig =
            serde_json::from_str(&content).map_err(NotesError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(NotesError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(NotesError::Serialization)?;
        fs::write(config_path, content).map_err(NotesError::Io)?;
        Ok(())
    }

    /// The file extension, normalized to start with a dot.
    pub fn file_ext(&self) -> String {
        normalize_ext(&self.file_ext)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn manager_options(&self) -> ManagerOptions {
        ManagerOptions {
            file_ext: self.file_ext(),
            debounce: self.debounce(),
            ..ManagerOptions::default()
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "notedir", "notedir")
        .ok_or_else(|| NotesError::Config("Could not determine home directory".to_string()))
}

/// Where `config.json` lives.
pub fn config_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    Ok(project_dirs()?.config_dir().to_path_buf())
}

/// Picks the notes directory; see the module docs for the order.
pub fn resolve_notes_dir(flag: Option<PathBuf>, config: &NotesConfig) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Some(dir) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(dir));
    }
    if let Some(dir) = &config.notes_dir {
        return Ok(dir.clone());
    }
    Ok(project_dirs()?.data_dir().join("notes"))
}

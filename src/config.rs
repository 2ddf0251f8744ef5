//! User configuration stored as TOML

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::JsonFileStorage;
use crate::vocab::DisplayMode;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config directory not found")]
    ConfigDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Card store directory; the platform data directory when unset
    pub data_dir: Option<PathBuf>,
    pub display_mode: DisplayMode,
    /// Review only due cards unless `--all` is given
    pub due_only: bool,
    /// Insert the demo words into an empty store
    pub seed_examples: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            display_mode: DisplayMode::default(),
            due_only: true,
            seed_examples: true,
        }
    }
}

impl AppConfig {
    /// `<config_dir>/cidian/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::ConfigDirNotFound)?;
        Ok(config_dir.join("cidian").join("config.toml"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load from `path`, falling back to defaults when the file is missing or
    /// malformed
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Load from the default location
    pub fn load() -> Self {
        match Self::default_path() {
            Ok(path) => Self::load_or_default(&path),
            Err(e) => {
                log::warn!("Using default config: {}", e);
                Self::default()
            }
        }
    }

    /// Resolve the card store directory; an explicit override wins over the
    /// configured value
    pub fn resolve_data_dir(&self, cli_override: Option<&Path>) -> Option<PathBuf> {
        cli_override
            .map(Path::to_path_buf)
            .or_else(|| self.data_dir.clone())
            .or_else(|| JsonFileStorage::default_data_dir().ok())
    }
}

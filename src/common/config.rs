//! Runner settings file handling

use serde::Deserialize;
use std::path::Path;

use super::paths::config_path;
use super::{Error, Result};

/// Default number of sequences allowed to run at the same time
pub const DEFAULT_MAX_CONCURRENT_SEQUENCES: usize = 10;

/// Runner settings, read from `config.toml` in the platform config dir
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// AWS region hosting the bot
    #[serde(default = "default_region")]
    pub region: String,

    /// Upper bound on concurrently running sequences
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_sequences: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            region: default_region(),
            max_concurrent_sequences: default_max_concurrent(),
        }
    }
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_max_concurrent() -> usize {
    DEFAULT_MAX_CONCURRENT_SEQUENCES
}

impl Settings {
    /// Load settings from the default settings file
    ///
    /// Returns default settings if the file doesn't exist
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load settings from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        let settings: Settings =
            toml::from_str(&content).map_err(|e| Error::ConfigParse(e.to_string()))?;

        if settings.max_concurrent_sequences == 0 {
            return Err(Error::Config(
                "max_concurrent_sequences must be at least 1".to_string(),
            ));
        }
        Ok(settings)
    }
}

//! File system paths for the queue tooling.

use crate::{ConfigError, ConfigResult};
use std::path::PathBuf;

/// Directory name under the platform config directory.
const APP_DIR_NAME: &str = "mqtt-queue";

/// Manages file system paths for the queue tooling.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Directory holding `config.json`.
    base_dir: PathBuf,
}

impl Paths {
    /// Create a new Paths instance under the platform config directory
    /// (`~/.config/mqtt-queue` on Linux).
    pub fn new() -> ConfigResult<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Path("Could not determine config directory".to_string()))?;

        Ok(Self {
            base_dir: config_dir.join(APP_DIR_NAME),
        })
    }

    /// Create a new Paths instance with a custom base directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory.
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the config file path.
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ensure the base directory exists.
    pub fn ensure_dirs(&self) -> ConfigResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        Ok(())
    }
}

//! Configuration management for the outgoing queue.

use crate::{ConfigError, ConfigResult, Paths, QoS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default database file name, shared with older clients of the same queue.
pub const DEFAULT_DATABASE_NAME: &str = "mqttQueue.db";

/// Default SQLite busy timeout (60 seconds).
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 60_000;

/// Default upper bound for hand-composed SQL command text.
pub const DEFAULT_MAX_COMMAND_LEN: usize = 8192;

/// Queue configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory holding the database file.
    #[serde(default = "default_database_dir")]
    pub database_dir: PathBuf,
    /// Database file name inside `database_dir`.
    #[serde(default = "default_database_name")]
    pub database_name: String,
    /// How long SQLite waits on a locked database before giving up.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// Limit for raw SQL text handed to the store. `None` disables the check.
    #[serde(default = "default_max_command_len")]
    pub max_command_len: Option<usize>,
    /// QoS used when replaying queued messages.
    #[serde(default)]
    pub qos: QoS,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_database_dir() -> PathBuf {
    std::env::temp_dir()
}

fn default_database_name() -> String {
    DEFAULT_DATABASE_NAME.to_string()
}

fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

fn default_max_command_len() -> Option<usize> {
    Some(DEFAULT_MAX_COMMAND_LEN)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            database_dir: default_database_dir(),
            database_name: default_database_name(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            max_command_len: default_max_command_len(),
            qos: QoS::default(),
        }
    }
}

impl Config {
    /// Create a new Config with default values, then override from environment.
    pub fn new() -> ConfigResult<Self> {
        let mut config = Self::default();
        config.load_from_env()?;
        Ok(config)
    }

    /// Load configuration from the config file, falling back to defaults.
    ///
    /// Environment variables are applied last and win over the file.
    pub fn load(paths: &Paths) -> ConfigResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the config file.
    pub fn save(&self, paths: &Paths) -> ConfigResult<()> {
        paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), content)?;
        Ok(())
    }

    /// Full path of the queue database.
    pub fn database_file(&self) -> PathBuf {
        self.database_dir.join(&self.database_name)
    }

    fn load_from_env(&mut self) -> ConfigResult<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply `MQTT_QUEUE_*` overrides from the given lookup.
    fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).and_then(non_empty);

        if let Some(level) = get("MQTT_QUEUE_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(dir) = get("MQTT_QUEUE_DB_DIR") {
            self.database_dir = PathBuf::from(dir);
        }
        if let Some(name) = get("MQTT_QUEUE_DB_NAME") {
            self.database_name = name;
        }
        if let Some(raw) = get("MQTT_QUEUE_QOS") {
            let value: u8 = raw
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("MQTT_QUEUE_QOS is not a number: {}", raw)))?;
            self.qos = QoS::try_from(value)?;
        }
        Ok(())
    }
}

fn non_empty(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

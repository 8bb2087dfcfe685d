//! Configuration, paths, and logging for the MQTT outgoing queue.

mod config;
mod error;
mod logging;
mod paths;
mod qos;

pub use config::{
    Config, DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_DATABASE_NAME, DEFAULT_LOG_LEVEL,
    DEFAULT_MAX_COMMAND_LEN,
};
pub use error::{ConfigError, ConfigResult};
pub use logging::init_logging;
pub use paths::Paths;
pub use qos::QoS;

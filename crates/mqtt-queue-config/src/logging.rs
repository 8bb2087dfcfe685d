//! Logging initialization.
//!
//! Installs a `tracing-subscriber` registry that writes to stderr. The level
//! comes from `RUST_LOG` when set, otherwise from the configured default.
//! `MQTT_QUEUE_LOG_FORMAT=json` switches to JSON lines.

use std::io;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn from_env() -> Self {
        Self::parse(&std::env::var("MQTT_QUEUE_LOG_FORMAT").unwrap_or_default())
    }

    fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Compact
        }
    }
}

/// Initialize the logging system.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
///
/// ```ignore
/// init_logging("info");
/// tracing::info!("queue opened");
/// ```
pub fn init_logging(level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let layer = match LogFormat::from_env() {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_writer(io::stderr)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .compact()
            .with_writer(io::stderr)
            .boxed(),
    };

    let _ = tracing_subscriber::registry()
        .with(layer.with_filter(env_filter))
        .try_init();

    tracing::debug!(level, "logging initialized");
}

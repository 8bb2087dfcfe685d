//! CLI command implementations.

mod drain;
mod export;
mod queue;

pub use drain::drain;
pub use export::export;
pub use queue::{count, enqueue, list, remove};

use anyhow::{Context, Result};
use mqtt_queue_config::{Config, Paths};
use mqtt_queue_replay::{OutgoingQueue, ReplayResult};
use std::path::Path;
use tracing::warn;

/// Load configuration, pointing it at `db` when one is given.
pub fn load_config(db: Option<&Path>) -> Result<Config> {
    let paths = Paths::new()?;
    let mut config = Config::load(&paths)
        .with_context(|| format!("failed to load {}", paths.config_file().display()))?;

    if let Some(db) = db {
        set_database_file(&mut config, db)?;
    }
    Ok(config)
}

/// Split `db` into the configured directory and file name.
///
/// A bare file name resolves against the current directory.
fn set_database_file(config: &mut Config, db: &Path) -> Result<()> {
    let name = db
        .file_name()
        .with_context(|| format!("not a database file: {}", db.display()))?;
    config.database_name = name.to_string_lossy().into_owned();
    config.database_dir = match db.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir()?,
    };
    Ok(())
}

/// Open the queue named by `config`.
pub fn open_queue(config: &Config) -> Result<OutgoingQueue> {
    OutgoingQueue::init_queue(config).with_context(|| {
        format!(
            "failed to open queue at {}",
            config.database_file().display()
        )
    })
}

/// Combine a command's result with closing the queue.
///
/// The command's own error wins; a close failure after a failed command is
/// only logged.
pub fn finish(outcome: Result<()>, closed: ReplayResult<()>) -> Result<()> {
    match (outcome, closed) {
        (Err(e), Err(close_err)) => {
            warn!(error = %close_err, "failed to close queue");
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(()), closed) => closed.context("failed to close queue"),
    }
}

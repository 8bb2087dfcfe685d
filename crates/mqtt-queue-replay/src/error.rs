//! Replay error types.

use thiserror::Error;

/// Errors that stop a replay pass or a queue operation.
///
/// Publish failures are not errors at this level; they leave the message
/// queued and are counted in the report.
#[derive(Error, Debug)]
pub enum ReplayError {
    /// Storage error
    #[error("Database error: {0}")]
    Database(#[from] mqtt_queue_database::DatabaseError),
}

/// Result type alias using ReplayError.
pub type ReplayResult<T> = Result<T, ReplayError>;

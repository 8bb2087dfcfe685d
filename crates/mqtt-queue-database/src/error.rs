//! Database error types.

use thiserror::Error;

/// Database error type.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The store has been closed
    #[error("Database is closed")]
    Closed,

    /// No identifier could be generated for a new record
    #[error("Identifier generation failed: {0}")]
    IdGeneration(String),

    /// Invalid data error
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// SQL text exceeds the configured limit
    #[error("SQL command is {len} bytes, limit is {max}")]
    CommandTooLong { len: usize, max: usize },
}

/// Result type alias using DatabaseError.
pub type DatabaseResult<T> = Result<T, DatabaseError>;

//! Identifier generation for queued messages.

use crate::{DatabaseError, DatabaseResult};
use std::fmt;
use tracing::error;
use ulid::Generator;
use uuid::Uuid;

/// Generates time-ordered unique identifiers.
///
/// Identifiers are monotonic ULIDs rendered in hyphenated UUID form, so they
/// fit the `UUID` column and sort by creation time.
pub struct IdGenerator {
    inner: Generator,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            inner: Generator::new(),
        }
    }

    /// Produce the next identifier.
    ///
    /// Fails when the random component overflows within a single millisecond.
    pub fn next_id(&mut self) -> DatabaseResult<String> {
        let ulid = self.inner.generate().map_err(|e| {
            error!(error = %e, "make id error");
            DatabaseError::IdGeneration(e.to_string())
        })?;
        Ok(Uuid::from(ulid).hyphenated().to_string())
    }
}

impl fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGenerator").finish_non_exhaustive()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

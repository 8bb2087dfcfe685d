//! Replay behavior tests.
//!
//! - `scenarios.rs`    - end-to-end enqueue / replay flows
//! - `crash_safety.rs` - restart and at-least-once delivery
//! - `failures.rs`     - publish, delete and read failures

mod scenarios;

use mqtt_queue_database::{DatabaseError, DatabaseResult, OutgoingRepository, PendingMessage, StoredRow};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;

/// Wraps a repository to count reads and inject delete or list failures.
pub(crate) struct InstrumentedRepo<'a, R: OutgoingRepository> {
    pub inner: &'a mut R,
    pub count_calls: Cell<usize>,
    pub list_calls: Cell<usize>,
    pub fail_deletes: RefCell<HashSet<String>>,
    pub fail_list: bool,
}

impl<'a, R: OutgoingRepository> InstrumentedRepo<'a, R> {
    pub fn new(inner: &'a mut R) -> Self {
        Self {
            inner,
            count_calls: Cell::new(0),
            list_calls: Cell::new(0),
            fail_deletes: RefCell::new(HashSet::new()),
            fail_list: false,
        }
    }
}

impl<R: OutgoingRepository> OutgoingRepository for InstrumentedRepo<'_, R> {
    fn count_outgoing(&self) -> DatabaseResult<i64> {
        self.count_calls.set(self.count_calls.get() + 1);
        self.inner.count_outgoing()
    }

    fn insert_outgoing(&mut self, topic: &str, payload: &[u8]) -> DatabaseResult<String> {
        self.inner.insert_outgoing(topic, payload)
    }

    fn delete_outgoing(&self, id: &str) -> DatabaseResult<bool> {
        if self.fail_deletes.borrow().contains(id) {
            return Err(DatabaseError::Closed);
        }
        self.inner.delete_outgoing(id)
    }

    fn list_outgoing(&self) -> DatabaseResult<Vec<StoredRow>> {
        self.list_calls.set(self.list_calls.get() + 1);
        if self.fail_list {
            return Err(DatabaseError::Closed);
        }
        self.inner.list_outgoing()
    }

    fn get_outgoing(&self, id: &str) -> DatabaseResult<Option<PendingMessage>> {
        self.inner.get_outgoing(id)
    }
}

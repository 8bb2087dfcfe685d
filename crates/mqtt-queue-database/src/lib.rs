//! SQLite store for MQTT messages that are waiting to be published.
//!
//! This crate provides:
//! - [`QueueStore`]: owns the SQLite connection, the `outgoing` table schema
//!   and the generic `execute` / scalar query primitives
//! - [`OutgoingRepository`]: count, insert, delete and read pending messages
//! - [`IdGenerator`]: time-ordered unique identifiers for queued messages
//! - Literal helpers for composing SQL text that embeds user data
//! - [`export_sql`]: dump the queue as a replayable SQL script
//!
//! # Usage
//!
//! ```ignore
//! let mut store = QueueStore::open(&config)?;
//! let id = store.insert_outgoing("sensors/temp", b"21C")?;
//! assert_eq!(store.count_outgoing()?, 1);
//! store.delete_outgoing(&id)?;
//! ```
//!
//! The store is single-threaded. `rusqlite::Connection` is not `Sync`, so a
//! host that shares the store between threads has to serialize access itself.

mod error;
mod export;
mod ids;
pub mod literal;
mod models;
mod outgoing;
mod schema;
mod store;

#[cfg(test)]
mod tests;

pub use error::{DatabaseError, DatabaseResult};
pub use export::export_sql;
pub use ids::IdGenerator;
pub use literal::{blob_literal, encode_literal, encode_literal_str, quote_literal};
pub use models::{PendingMessage, StoredRow};
pub use outgoing::OutgoingRepository;
pub use schema::OUTGOING_TABLE;
pub use store::QueueStore;

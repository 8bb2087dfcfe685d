//! Queries over the `outgoing` table.

use crate::{DatabaseError, DatabaseResult, PendingMessage, QueueStore, StoredRow};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{params, Row};
use tracing::{debug, error};

/// Operations on messages waiting to be published.
///
/// Insert and delete are the only mutations; queued messages are never updated.
pub trait OutgoingRepository {
    /// Number of queued messages.
    fn count_outgoing(&self) -> DatabaseResult<i64>;

    /// Queue a message and return its new identifier.
    ///
    /// Nothing is written when the topic is empty or no identifier can be
    /// generated.
    fn insert_outgoing(&mut self, topic: &str, payload: &[u8]) -> DatabaseResult<String>;

    /// Remove a message by identifier. Returns `false` when nothing matched,
    /// which is not an error.
    fn delete_outgoing(&self, id: &str) -> DatabaseResult<bool>;

    /// All queued rows in storage order.
    fn list_outgoing(&self) -> DatabaseResult<Vec<StoredRow>>;

    /// Look up a single message.
    fn get_outgoing(&self, id: &str) -> DatabaseResult<Option<PendingMessage>>;
}

impl OutgoingRepository for QueueStore {
    fn count_outgoing(&self) -> DatabaseResult<i64> {
        let count = self.query_scalar_int("SELECT count(*) FROM outgoing;", [])?;
        debug!(count, "count outgoing");
        Ok(count)
    }

    fn insert_outgoing(&mut self, topic: &str, payload: &[u8]) -> DatabaseResult<String> {
        if topic.is_empty() {
            return Err(DatabaseError::InvalidData(
                "topic must not be empty".to_string(),
            ));
        }

        let id = self.ids.next_id()?;

        // Text keeps the row readable by clients that expect a TEXT column.
        let message = match std::str::from_utf8(payload) {
            Ok(text) => Value::Text(text.to_string()),
            Err(_) => Value::Blob(payload.to_vec()),
        };
        let payload_len = i64::try_from(payload.len())
            .map_err(|_| DatabaseError::InvalidData("payload too large".to_string()))?;

        self.execute(
            "INSERT INTO outgoing (UUID, TOPIC, MESSAGE, MESSAGE_LEN) VALUES (?1, ?2, ?3, ?4)",
            params![id, topic, message, payload_len],
        )
        .inspect_err(|_| error!(topic, "Failed to add outgoing message"))?;

        debug!(id = %id, topic, payload_len, "queued outgoing message");
        Ok(id)
    }

    fn delete_outgoing(&self, id: &str) -> DatabaseResult<bool> {
        let count = self.execute("DELETE FROM outgoing WHERE UUID = ?1", params![id])?;
        Ok(count > 0)
    }

    fn list_outgoing(&self) -> DatabaseResult<Vec<StoredRow>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare_cached(
            "SELECT rowid, UUID, TOPIC, MESSAGE, MESSAGE_LEN FROM outgoing ORDER BY rowid",
        )?;

        let rows = stmt
            .query_map([], read_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn get_outgoing(&self, id: &str) -> DatabaseResult<Option<PendingMessage>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare_cached(
            "SELECT rowid, UUID, TOPIC, MESSAGE, MESSAGE_LEN FROM outgoing WHERE UUID = ?1",
        )?;

        let mut rows = stmt.query(params![id])?;
        match rows.next()? {
            Some(row) => Ok(read_row(row)?.into_pending()),
            None => Ok(None),
        }
    }
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<StoredRow> {
    Ok(StoredRow {
        rowid: row.get(0)?,
        id: text_at(row, 1)?,
        topic: text_at(row, 2)?,
        payload: bytes_at(row, 3)?,
        payload_len: row.get(4)?,
    })
}

fn text_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(bytes_at(row, idx)?.map(|b| String::from_utf8_lossy(&b).into_owned()))
}

fn bytes_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Vec<u8>>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => None,
        ValueRef::Text(b) | ValueRef::Blob(b) => Some(b.to_vec()),
        ValueRef::Integer(i) => Some(i.to_string().into_bytes()),
        ValueRef::Real(f) => Some(f.to_string().into_bytes()),
    })
}

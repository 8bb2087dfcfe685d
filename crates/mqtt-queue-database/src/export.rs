//! Dump the queue as a SQL script.

use crate::literal::{blob_literal, quote_literal};
use crate::{DatabaseResult, OutgoingRepository};
use tracing::warn;

/// Render every queued message as an `INSERT` statement.
///
/// Applying the script to a store with an empty `outgoing` table (for
/// example with [`crate::QueueStore::execute_batch`]) reproduces the queue.
/// Rows with a missing id, topic or payload are left out.
pub fn export_sql<R>(repo: &R) -> DatabaseResult<String>
where
    R: OutgoingRepository + ?Sized,
{
    let mut script = String::from("BEGIN TRANSACTION;\n");

    for row in repo.list_outgoing()? {
        let rowid = row.rowid;
        let Some(msg) = row.into_pending() else {
            warn!(rowid, "skipping incomplete row in export");
            continue;
        };

        // SQLite stops tokenizing a string literal at NUL.
        let message = match std::str::from_utf8(&msg.payload) {
            Ok(text) if !text.contains('\0') => quote_literal(text),
            _ => blob_literal(&msg.payload),
        };

        script.push_str(&format!(
            "INSERT INTO outgoing(UUID,TOPIC,MESSAGE,MESSAGE_LEN) VALUES({},{},{},{});\n",
            quote_literal(&msg.id),
            quote_literal(&msg.topic),
            message,
            msg.payload_len
        ));
    }

    script.push_str("COMMIT;\n");
    Ok(script)
}

//! Schema for the outgoing queue.
//!
//! The layout is shared with other clients of the same database file, so
//! table and column names are fixed.

use rusqlite::Connection;
use tracing::debug;

/// Name of the queue table.
pub const OUTGOING_TABLE: &str = "outgoing";

const CREATE_OUTGOING: &str = "
    CREATE TABLE IF NOT EXISTS outgoing(
        UUID        TEXT    PRIMARY KEY NOT NULL,
        TOPIC       TEXT    NOT NULL,
        MESSAGE     TEXT    NOT NULL,
        MESSAGE_LEN INTEGER NOT NULL
    );
";

/// Create the queue table if it does not exist yet.
pub(crate) fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(CREATE_OUTGOING)?;
    debug!(table = OUTGOING_TABLE, "schema ready");
    Ok(())
}

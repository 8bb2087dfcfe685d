//! Connection ownership and generic query primitives.

use crate::schema::init_schema;
use crate::{DatabaseError, DatabaseResult, IdGenerator};
use mqtt_queue_config::{Config, DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_MAX_COMMAND_LEN};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OptionalExtension, Params};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info};

/// Owns the SQLite connection for the outgoing queue.
///
/// All reads and writes go through the primitives on this type, which is
/// what keeps SQL composition in one place.
pub struct QueueStore {
    conn: Option<Connection>,
    pub(crate) ids: IdGenerator,
    max_command_len: Option<usize>,
    path: Option<PathBuf>,
}

impl QueueStore {
    /// Open the database named by `config`, creating file and schema if needed.
    pub fn open(config: &Config) -> DatabaseResult<Self> {
        Self::open_with(
            &config.database_file(),
            Duration::from_millis(config.busy_timeout_ms),
            config.max_command_len,
        )
    }

    /// Open a database at `path` with default settings.
    pub fn open_path(path: &Path) -> DatabaseResult<Self> {
        Self::open_with(
            path,
            Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
            Some(DEFAULT_MAX_COMMAND_LEN),
        )
    }

    fn open_with(
        path: &Path,
        busy_timeout: Duration,
        max_command_len: Option<usize>,
    ) -> DatabaseResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path).map_err(|e| {
            error!(path = %path.display(), error = %e, "Can't open database");
            DatabaseError::from(e)
        })?;

        // Set before the schema check so a locked database is waited on.
        conn.busy_timeout(busy_timeout)?;
        init_schema(&conn).map_err(|e| {
            error!(error = %e, "Error creating outgoing table");
            DatabaseError::from(e)
        })?;

        info!(path = %path.display(), "Opened outgoing queue");
        Ok(Self {
            conn: Some(conn),
            ids: IdGenerator::new(),
            max_command_len,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory database for testing.
    pub fn open_in_memory() -> DatabaseResult<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Some(conn),
            ids: IdGenerator::new(),
            max_command_len: Some(DEFAULT_MAX_COMMAND_LEN),
            path: None,
        })
    }

    /// Close the connection. Closing an already closed store does nothing.
    pub fn close(&mut self) -> DatabaseResult<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, e)| {
                error!(error = %e, "Failed to close database");
                DatabaseError::from(e)
            })?;
            debug!("Closed outgoing queue");
        }
        Ok(())
    }

    /// Whether the connection is still open.
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Path of the database file, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get a reference to the underlying connection.
    pub fn connection(&self) -> DatabaseResult<&Connection> {
        self.conn.as_ref().ok_or(DatabaseError::Closed)
    }

    /// Run a command that returns no rows. Returns the number of rows changed.
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> DatabaseResult<usize> {
        self.check_command(sql)?;
        let conn = self.connection()?;
        conn.execute(sql, params).map_err(|e| {
            error!(error = %e, "sql error");
            DatabaseError::from(e)
        })
    }

    /// Run a query and return the first column of the first row as an integer.
    ///
    /// A query that yields no rows reads as `0`.
    pub fn query_scalar_int<P: Params>(&self, sql: &str, params: P) -> DatabaseResult<i64> {
        self.check_command(sql)?;
        let conn = self.connection()?;
        let mut stmt = conn.prepare_cached(sql).map_err(|e| {
            error!(error = %e, "sqlerror");
            DatabaseError::from(e)
        })?;

        let value = stmt
            .query_row(params, |row| row.get::<_, Option<i64>>(0))
            .optional()?
            .flatten();
        Ok(value.unwrap_or(0))
    }

    /// Run a query and return the first column of the first row as text.
    ///
    /// Returns `None` when there is no row or the value is NULL. Numbers are
    /// rendered as text.
    pub fn query_scalar_string<P: Params>(
        &self,
        sql: &str,
        params: P,
    ) -> DatabaseResult<Option<String>> {
        self.check_command(sql)?;
        let conn = self.connection()?;
        let mut stmt = conn.prepare_cached(sql).map_err(|e| {
            error!(error = %e, "sqlerror");
            DatabaseError::from(e)
        })?;

        let value = stmt
            .query_row(params, |row| Ok(value_to_text(row.get_ref(0)?)))
            .optional()?
            .flatten();
        Ok(value)
    }

    /// Run a script of several statements, such as one produced by
    /// [`crate::export_sql`]. Not subject to the command length limit.
    pub fn execute_batch(&self, sql: &str) -> DatabaseResult<()> {
        let conn = self.connection()?;
        conn.execute_batch(sql).map_err(|e| {
            error!(error = %e, "sql error");
            DatabaseError::from(e)
        })
    }

    fn check_command(&self, sql: &str) -> DatabaseResult<()> {
        match self.max_command_len {
            Some(max) if sql.len() > max => {
                error!(len = sql.len(), max, "SQL command exceeds limit");
                Err(DatabaseError::CommandTooLong {
                    len: sql.len(),
                    max,
                })
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for QueueStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueStore")
            .field("open", &self.conn.is_some())
            .field("path", &self.path)
            .field("max_command_len", &self.max_command_len)
            .finish()
    }
}

fn value_to_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;
    use tempfile::tempdir;

    #[test]
    fn open_creates_file_and_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("mqttQueue.db");

        let store = QueueStore::open_path(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.path(), Some(path.as_path()));
        assert!(store.is_open());
    }

    #[test]
    fn open_with_config() {
        let dir = tempdir().unwrap();
        let config = Config {
            database_dir: dir.path().to_path_buf(),
            database_name: "queue.db".to_string(),
            ..Config::default()
        };

        let store = QueueStore::open(&config).unwrap();
        assert_eq!(store.path(), Some(dir.path().join("queue.db").as_path()));
    }

    #[test]
    fn open_fails_on_directory_path() {
        let dir = tempdir().unwrap();
        let result = QueueStore::open_path(dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn open_waits_for_a_locked_database() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locked.db");

        let holder = Connection::open(&path).unwrap();
        holder.execute_batch("BEGIN EXCLUSIVE;").unwrap();
        let release = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(200));
            holder.execute_batch("COMMIT;").unwrap();
        });

        let store = QueueStore::open_path(&path).unwrap();
        release.join().unwrap();
        assert_eq!(store.query_scalar_int("SELECT count(*) FROM outgoing", []).unwrap(), 0);
    }

    #[test]
    fn close_twice_is_noop() {
        let mut store = QueueStore::open_in_memory().unwrap();
        store.close().unwrap();
        store.close().unwrap();
        assert!(!store.is_open());
    }

    #[test]
    fn operations_after_close_fail() {
        let mut store = QueueStore::open_in_memory().unwrap();
        store.close().unwrap();

        assert!(matches!(
            store.query_scalar_int("SELECT 1", []),
            Err(DatabaseError::Closed)
        ));
        assert!(matches!(
            store.execute("DELETE FROM outgoing", []),
            Err(DatabaseError::Closed)
        ));
    }

    #[test]
    fn scalar_int_and_string() {
        let store = QueueStore::open_in_memory().unwrap();
        store
            .execute(
                "INSERT INTO outgoing (UUID, TOPIC, MESSAGE, MESSAGE_LEN) VALUES (?1, ?2, ?3, ?4)",
                params!["id-1", "t", "m", 1],
            )
            .unwrap();

        let count = store
            .query_scalar_int("SELECT count(*) FROM outgoing", [])
            .unwrap();
        assert_eq!(count, 1);

        let topic = store
            .query_scalar_string("SELECT TOPIC FROM outgoing WHERE UUID = ?1", ["id-1"])
            .unwrap();
        assert_eq!(topic.as_deref(), Some("t"));

        let len_as_text = store
            .query_scalar_string("SELECT MESSAGE_LEN FROM outgoing", [])
            .unwrap();
        assert_eq!(len_as_text.as_deref(), Some("1"));
    }

    #[test]
    fn scalar_queries_without_rows() {
        let store = QueueStore::open_in_memory().unwrap();

        let missing = store
            .query_scalar_string("SELECT TOPIC FROM outgoing WHERE UUID = ?1", ["nope"])
            .unwrap();
        assert!(missing.is_none());

        let zero = store
            .query_scalar_int("SELECT MESSAGE_LEN FROM outgoing", [])
            .unwrap();
        assert_eq!(zero, 0);
    }

    #[test]
    fn malformed_sql_is_an_error() {
        let store = QueueStore::open_in_memory().unwrap();
        assert!(matches!(
            store.query_scalar_int("SELEC count(*) FROM outgoing", []),
            Err(DatabaseError::Sqlite(_))
        ));
        assert!(matches!(
            store.query_scalar_string("SELECT nope FROM outgoing", []),
            Err(DatabaseError::Sqlite(_))
        ));
        assert!(matches!(
            store.execute("INSERT INTO missing_table VALUES (1)", []),
            Err(DatabaseError::Sqlite(_))
        ));
    }

    #[test]
    fn long_commands_fail_instead_of_truncating() {
        let store = QueueStore::open_in_memory().unwrap();
        let sql = format!(
            "SELECT count(*) FROM outgoing WHERE TOPIC = '{}'",
            "x".repeat(DEFAULT_MAX_COMMAND_LEN)
        );

        assert!(matches!(
            store.query_scalar_int(&sql, []),
            Err(DatabaseError::CommandTooLong { .. })
        ));
    }

    #[test]
    fn command_limit_can_be_disabled() {
        let dir = tempdir().unwrap();
        let config = Config {
            database_dir: dir.path().to_path_buf(),
            max_command_len: None,
            ..Config::default()
        };
        let store = QueueStore::open(&config).unwrap();
        let sql = format!(
            "SELECT count(*) FROM outgoing WHERE TOPIC = '{}'",
            "x".repeat(DEFAULT_MAX_COMMAND_LEN)
        );

        assert_eq!(store.query_scalar_int(&sql, []).unwrap(), 0);
    }
}

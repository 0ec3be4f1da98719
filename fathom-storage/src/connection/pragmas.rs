//! Connection pragmas. WAL for concurrent readers, NORMAL sync as the
//! durability/latency tradeoff.

use fathom_core::errors::StorageError;
use rusqlite::Connection;

/// Apply pragmas to a read-write connection.
pub fn apply_pragmas(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;
         PRAGMA cache_size = -64000;",
    )
    .map_err(|e| StorageError::SqliteError {
        message: e.to_string(),
    })
}

/// Apply pragmas to a read-only connection.
pub fn apply_read_pragmas(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "PRAGMA query_only = ON;
         PRAGMA busy_timeout = 5000;
         PRAGMA cache_size = -16000;",
    )
    .map_err(|e| StorageError::SqliteError {
        message: e.to_string(),
    })
}

//! Write connection utilities (BEGIN IMMEDIATE transactions).

use fathom_core::errors::StorageError;
use rusqlite::Connection;

/// Execute a write operation inside a BEGIN IMMEDIATE transaction.
/// This acquires the write lock at transaction start, preventing
/// SQLITE_BUSY mid-transaction.
///
/// The transaction is managed manually: COMMIT on success, ROLLBACK on
/// any error from the closure or the COMMIT itself, so the connection
/// never stays inside an open transaction.
pub fn with_immediate_transaction<F, T>(conn: &Connection, f: F) -> Result<T, StorageError>
where
    F: FnOnce(&Connection) -> Result<T, StorageError>,
{
    conn.execute_batch("BEGIN IMMEDIATE")
        .map_err(|e| StorageError::SqliteError {
            message: format!("failed to begin immediate transaction: {e}"),
        })?;

    let outcome = f(conn).and_then(|value| {
        conn.execute_batch("COMMIT")
            .map_err(|e| StorageError::SqliteError {
                message: format!("failed to commit: {e}"),
            })?;
        Ok(value)
    });

    if outcome.is_err() {
        // The closure's error is what the caller needs; a rollback
        // failure here means the connection already left the
        // transaction (e.g. an auto-rollback on commit failure).
        let _ = conn.execute_batch("ROLLBACK");
    }
    outcome
}

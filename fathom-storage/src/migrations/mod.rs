//! Versioned migrations, tracked via `PRAGMA user_version`.

pub mod v001_symbols;
pub mod v002_capabilities;
pub mod v003_graph_snapshots;

use fathom_core::errors::StorageError;
use rusqlite::Connection;

const MIGRATIONS: &[(u32, &str)] = &[
    (1, v001_symbols::MIGRATION_SQL),
    (2, v002_capabilities::MIGRATION_SQL),
    (3, v003_graph_snapshots::MIGRATION_SQL),
];

/// Apply every migration newer than the database's current version.
pub fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    let current: u32 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;

    for &(version, sql) in MIGRATIONS {
        if version <= current {
            continue;
        }
        conn.execute_batch(sql)
            .map_err(|e| StorageError::MigrationFailed {
                version,
                message: e.to_string(),
            })?;
        conn.pragma_update(None, "user_version", version)
            .map_err(|e| StorageError::MigrationFailed {
                version,
                message: e.to_string(),
            })?;
        tracing::debug!(version, "applied migration");
    }

    Ok(())
}

/// Current schema version of a database.
pub fn schema_version(conn: &Connection) -> Result<u32, StorageError> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })
}

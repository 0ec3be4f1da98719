//! Storage errors.

use super::error_code::{self, FathomErrorCode};

/// Errors from the persistence adapter. Propagated unmodified to the
/// caller; retry policy, if any, belongs to the store itself.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("Migration {version} failed: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("Row decode failed: {message}")]
    RowDecode { message: String },

    #[error("Connection pool lock poisoned")]
    PoolPoisoned,
}

impl FathomErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        error_code::STORAGE_ERROR
    }
}

//! One query module per table family. Free functions over
//! `&Connection`; rows are decoded into domain types exactly once, at
//! this boundary.

pub mod capability_links;
pub mod evolution;
pub mod graph_snapshots;
pub mod health;
pub mod references;
pub mod symbols;

use fathom_core::errors::StorageError;

pub(crate) fn sqlite_err(e: rusqlite::Error) -> StorageError {
    StorageError::SqliteError {
        message: e.to_string(),
    }
}

pub(crate) fn decode_err(message: impl Into<String>) -> StorageError {
    StorageError::RowDecode {
        message: message.into(),
    }
}

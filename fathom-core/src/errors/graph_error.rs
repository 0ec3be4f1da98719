//! Call graph and graph query errors.

use super::error_code::{self, FathomErrorCode};
use super::storage_error::StorageError;

/// Errors from call-graph construction and graph queries.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The root of a build (or a query endpoint) does not exist.
    /// Fatal to that call; missing non-root symbols during traversal
    /// are simply not expanded.
    #[error("Symbol {symbol_id} not found")]
    SymbolNotFound { symbol_id: i64 },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl FathomErrorCode for GraphError {
    fn error_code(&self) -> &'static str {
        error_code::GRAPH_ERROR
    }
}

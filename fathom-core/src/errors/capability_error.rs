//! Capability linking, health, and evolution errors.

use super::error_code::{self, FathomErrorCode};
use super::storage_error::StorageError;

/// Errors from the capability layer.
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    /// Health/evolution operation against an unknown capability.
    #[error("Capability {capability_id} not found")]
    CapabilityNotFound { capability_id: i64 },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl FathomErrorCode for CapabilityError {
    fn error_code(&self) -> &'static str {
        error_code::CAPABILITY_ERROR
    }
}

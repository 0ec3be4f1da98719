//! Stable error codes for cross-boundary reporting.

pub const GRAPH_ERROR: &str = "FATHOM_GRAPH_ERROR";
pub const CAPABILITY_ERROR: &str = "FATHOM_CAPABILITY_ERROR";
pub const STORAGE_ERROR: &str = "FATHOM_STORAGE_ERROR";
pub const CONFIG_ERROR: &str = "FATHOM_CONFIG_ERROR";

/// Maps an error to its stable string code.
pub trait FathomErrorCode {
    fn error_code(&self) -> &'static str;
}

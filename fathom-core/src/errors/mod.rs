//! Error handling for Fathom.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod capability_error;
pub mod config_error;
pub mod error_code;
pub mod graph_error;
pub mod storage_error;

pub use capability_error::CapabilityError;
pub use config_error::ConfigError;
pub use error_code::FathomErrorCode;
pub use graph_error::GraphError;
pub use storage_error::StorageError;

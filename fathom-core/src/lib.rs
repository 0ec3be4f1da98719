//! Shared foundation for the Fathom code-intelligence engine.
//!
//! Domain types, configuration, error taxonomy, store/cache ports, and
//! the synchronous event dispatcher. No I/O lives here; the ports are
//! implemented by `fathom-storage` and consumed by `fathom-analysis`.

pub mod config;
pub mod errors;
pub mod events;
pub mod tracing;
pub mod traits;
pub mod types;

//! SQLite adapter behind the fathom-core store ports.
//!
//! Write-serialized, read-pooled connections; versioned migrations with
//! STRICT tables; one query module per table family. The analysis crate
//! never sees SQL; it talks to the `SymbolStore`/`CapabilityStore`/
//! `GraphSnapshotStore` traits implemented by [`store::SqliteStore`].

pub mod connection;
pub mod migrations;
pub mod queries;
pub mod store;

pub use store::SqliteStore;

//! Ports to external collaborators. The analysis engine only ever sees
//! these narrow interfaces; `fathom-storage` provides the SQLite-backed
//! implementations.

pub mod capability_store;
pub mod graph_cache;
pub mod symbol_store;

pub use capability_store::{CapabilityStore, EvolutionFilter, LinkFilter};
pub use graph_cache::{call_graph_key, repository_prefix, GraphCache, GraphSnapshotStore};
pub use symbol_store::{ReferenceFilter, SymbolFilter, SymbolStore};

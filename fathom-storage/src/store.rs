//! SqliteStore: the fathom-core store ports over a DatabaseManager.

use std::path::Path;

use fathom_core::errors::StorageError;
use fathom_core::traits::{
    CapabilityStore, EvolutionFilter, GraphSnapshotStore, LinkFilter, ReferenceFilter,
    SymbolFilter, SymbolStore,
};
use fathom_core::types::{
    Capability, CapabilityEvolution, CapabilityHealth, CallGraphData, CodeSymbol,
    SymbolCapabilityLink, SymbolReference,
};

use crate::connection::writer::with_immediate_transaction;
use crate::connection::DatabaseManager;
use crate::queries;

/// SQLite-backed implementation of `SymbolStore`, `CapabilityStore`,
/// and `GraphSnapshotStore`.
pub struct SqliteStore {
    db: DatabaseManager,
}

impl SqliteStore {
    /// Open (and migrate) a database at the given path.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Ok(Self {
            db: DatabaseManager::open(path)?,
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self {
            db: DatabaseManager::open_in_memory()?,
        })
    }

    /// Seed one symbol. Extractor-side write, also used by tests.
    pub fn insert_symbol(&self, symbol: &CodeSymbol) -> Result<(), StorageError> {
        self.db
            .with_writer(|conn| queries::symbols::insert_symbol(conn, symbol))
    }

    /// Seed one reference. Returns the assigned id.
    pub fn insert_reference(&self, reference: &SymbolReference) -> Result<i64, StorageError> {
        self.db
            .with_writer(|conn| queries::references::insert_reference(conn, reference))
    }

    /// Seed a capability row.
    pub fn insert_capability(&self, capability: &Capability) -> Result<(), StorageError> {
        self.db
            .with_writer(|conn| queries::capability_links::insert_capability(conn, capability))
    }

    /// Soft-delete a symbol. Returns whether a live row was marked.
    pub fn soft_delete_symbol(&self, id: i64, deleted_at: i64) -> Result<bool, StorageError> {
        self.db
            .with_writer(|conn| queries::symbols::soft_delete_symbol(conn, id, deleted_at))
    }

    /// Seed a batch of symbols and references in one transaction.
    pub fn insert_extraction(
        &self,
        symbols: &[CodeSymbol],
        references: &[SymbolReference],
    ) -> Result<(), StorageError> {
        self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |conn| {
                for symbol in symbols {
                    queries::symbols::insert_symbol(conn, symbol)?;
                }
                for reference in references {
                    queries::references::insert_reference(conn, reference)?;
                }
                Ok(())
            })
        })
    }
}

impl SymbolStore for SqliteStore {
    fn get_symbol(&self, id: i64) -> Result<Option<CodeSymbol>, StorageError> {
        self.db
            .with_reader(|conn| queries::symbols::get_symbol(conn, id))
    }

    fn list_symbols(&self, filter: &SymbolFilter) -> Result<Vec<CodeSymbol>, StorageError> {
        self.db
            .with_reader(|conn| queries::symbols::list_symbols(conn, filter))
    }

    fn list_references(
        &self,
        filter: &ReferenceFilter,
    ) -> Result<Vec<SymbolReference>, StorageError> {
        self.db
            .with_reader(|conn| queries::references::list_references(conn, filter))
    }
}

impl CapabilityStore for SqliteStore {
    fn get_capability(&self, id: i64) -> Result<Option<Capability>, StorageError> {
        self.db
            .with_reader(|conn| queries::capability_links::get_capability(conn, id))
    }

    fn list_capabilities(&self) -> Result<Vec<Capability>, StorageError> {
        self.db
            .with_reader(queries::capability_links::list_capabilities)
    }

    fn upsert_link(&self, link: &SymbolCapabilityLink) -> Result<(), StorageError> {
        self.db
            .with_writer(|conn| queries::capability_links::upsert_link(conn, link))
    }

    fn insert_link_if_absent(&self, link: &SymbolCapabilityLink) -> Result<bool, StorageError> {
        self.db
            .with_writer(|conn| queries::capability_links::insert_link_if_absent(conn, link))
    }

    fn delete_link(&self, symbol_id: i64, capability_id: i64) -> Result<bool, StorageError> {
        self.db.with_writer(|conn| {
            queries::capability_links::delete_link(conn, symbol_id, capability_id)
        })
    }

    fn list_links(&self, filter: &LinkFilter) -> Result<Vec<SymbolCapabilityLink>, StorageError> {
        self.db
            .with_reader(|conn| queries::capability_links::list_links(conn, filter))
    }

    fn upsert_health(&self, health: &CapabilityHealth) -> Result<(), StorageError> {
        self.db
            .with_writer(|conn| queries::health::upsert_health(conn, health))
    }

    fn latest_health_before(
        &self,
        capability_id: i64,
        repository_id: i64,
        date: i64,
    ) -> Result<Option<CapabilityHealth>, StorageError> {
        self.db.with_reader(|conn| {
            queries::health::latest_health_before(conn, capability_id, repository_id, date)
        })
    }

    fn list_health(
        &self,
        capability_id: i64,
        repository_id: i64,
        start_date: Option<i64>,
        end_date: Option<i64>,
        limit: u32,
    ) -> Result<Vec<CapabilityHealth>, StorageError> {
        self.db.with_reader(|conn| {
            queries::health::list_health(
                conn,
                capability_id,
                repository_id,
                start_date,
                end_date,
                limit,
            )
        })
    }

    fn insert_event(&self, event: &CapabilityEvolution) -> Result<i64, StorageError> {
        self.db
            .with_writer(|conn| queries::evolution::insert_event(conn, event))
    }

    fn list_events(
        &self,
        filter: &EvolutionFilter,
    ) -> Result<Vec<CapabilityEvolution>, StorageError> {
        self.db
            .with_reader(|conn| queries::evolution::list_events(conn, filter))
    }
}

impl GraphSnapshotStore for SqliteStore {
    fn upsert_snapshot(
        &self,
        repository_id: i64,
        graph_type: &str,
        root_id: i64,
        data: &CallGraphData,
    ) -> Result<(), StorageError> {
        self.db.with_writer(|conn| {
            queries::graph_snapshots::upsert_snapshot(conn, repository_id, graph_type, root_id, data)
        })
    }

    fn get_snapshot(
        &self,
        repository_id: i64,
        graph_type: &str,
        root_id: i64,
    ) -> Result<Option<(CallGraphData, bool)>, StorageError> {
        self.db.with_reader(|conn| {
            queries::graph_snapshots::get_snapshot(conn, repository_id, graph_type, root_id)
        })
    }

    fn mark_all_stale(&self, repository_id: i64) -> Result<usize, StorageError> {
        self.db
            .with_writer(|conn| queries::graph_snapshots::mark_all_stale(conn, repository_id))
    }
}

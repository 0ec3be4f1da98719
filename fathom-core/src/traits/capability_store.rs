//! CapabilityStore port: capability identity, symbol links, health
//! snapshots, and evolution events.

use crate::errors::StorageError;
use crate::types::{
    Capability, CapabilityEvolution, CapabilityHealth, ChangeCategory, EvolutionEventType,
    Significance, SymbolCapabilityLink,
};

/// Filter for link listings.
#[derive(Debug, Clone, Default)]
pub struct LinkFilter {
    pub capability_id: Option<i64>,
    pub symbol_id: Option<i64>,
    pub auto_linked: Option<bool>,
}

/// Filter for evolution event queries.
#[derive(Debug, Clone, Default)]
pub struct EvolutionFilter {
    pub capability_id: Option<i64>,
    pub repository_id: Option<i64>,
    pub event_types: Option<Vec<EvolutionEventType>>,
    pub change_categories: Option<Vec<ChangeCategory>>,
    pub min_significance: Option<Significance>,
    pub since: Option<i64>,
    pub until: Option<i64>,
    /// `None` means unbounded (used for aggregate computation).
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Persistence for the capability layer.
///
/// Health writes are idempotent upserts keyed by
/// `(capability, repository, date)`; evolution writes are append-only.
pub trait CapabilityStore: Send + Sync {
    fn get_capability(&self, id: i64) -> Result<Option<Capability>, StorageError>;

    fn list_capabilities(&self) -> Result<Vec<Capability>, StorageError>;

    /// Upsert by `(symbol_id, capability_id)` — replaces any prior link
    /// for the pair.
    fn upsert_link(&self, link: &SymbolCapabilityLink) -> Result<(), StorageError>;

    /// Insert only if the pair is not already linked. Returns whether a
    /// row was created.
    fn insert_link_if_absent(&self, link: &SymbolCapabilityLink) -> Result<bool, StorageError>;

    /// Idempotent delete. Returns whether a row was removed.
    fn delete_link(&self, symbol_id: i64, capability_id: i64) -> Result<bool, StorageError>;

    fn list_links(&self, filter: &LinkFilter) -> Result<Vec<SymbolCapabilityLink>, StorageError>;

    /// Upsert keyed by `(capability_id, repository_id, date)`.
    fn upsert_health(&self, health: &CapabilityHealth) -> Result<(), StorageError>;

    /// Most recent snapshot strictly earlier than `date`.
    fn latest_health_before(
        &self,
        capability_id: i64,
        repository_id: i64,
        date: i64,
    ) -> Result<Option<CapabilityHealth>, StorageError>;

    /// Snapshots in `[start, end]` (unset bounds are open), most recent
    /// first, at most `limit` rows.
    fn list_health(
        &self,
        capability_id: i64,
        repository_id: i64,
        start_date: Option<i64>,
        end_date: Option<i64>,
        limit: u32,
    ) -> Result<Vec<CapabilityHealth>, StorageError>;

    /// Append one event; returns its assigned id.
    fn insert_event(&self, event: &CapabilityEvolution) -> Result<i64, StorageError>;

    /// Events matching the filter, most recent first, honoring
    /// limit/offset.
    fn list_events(
        &self,
        filter: &EvolutionFilter,
    ) -> Result<Vec<CapabilityEvolution>, StorageError>;
}

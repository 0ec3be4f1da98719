//! GraphCache port: TTL key-value cache plus the persistent
//! staleness-flagged snapshot table.

use std::time::Duration;

use crate::errors::StorageError;
use crate::types::CallGraphData;

/// TTL key-value cache for built call graphs.
///
/// Consistency policy: a successful read returns immediately without
/// re-validating against the store. Invalidation is coarse-grained (all
/// keys for a repository), so a read racing an invalidation may return
/// a just-invalidated graph. That window is accepted.
pub trait GraphCache: Send + Sync {
    fn get(&self, key: &str) -> Option<CallGraphData>;

    fn put(&self, key: &str, value: CallGraphData, ttl: Duration);

    /// Remove every entry whose key starts with `prefix`.
    fn invalidate_prefix(&self, prefix: &str);
}

/// Persistent call-graph snapshots keyed by
/// `(repository_id, graph_type, root_id)`, with a staleness flag flipped
/// on structural change instead of eager recomputation.
pub trait GraphSnapshotStore: Send + Sync {
    fn upsert_snapshot(
        &self,
        repository_id: i64,
        graph_type: &str,
        root_id: i64,
        data: &CallGraphData,
    ) -> Result<(), StorageError>;

    /// Returns the snapshot and whether it is stale.
    fn get_snapshot(
        &self,
        repository_id: i64,
        graph_type: &str,
        root_id: i64,
    ) -> Result<Option<(CallGraphData, bool)>, StorageError>;

    /// Mark every snapshot for the repository stale. Returns the number
    /// of rows flagged.
    fn mark_all_stale(&self, repository_id: i64) -> Result<usize, StorageError>;
}

/// Cache key for a call-graph build. The repository segment leads so
/// prefix invalidation can clear a whole repository.
pub fn call_graph_key(
    repository_id: i64,
    root_symbol_id: i64,
    max_depth: u32,
    include_external: bool,
) -> String {
    format!("callgraph:{repository_id}:{root_symbol_id}:{max_depth}:{include_external}")
}

/// Prefix covering every call-graph key for a repository.
pub fn repository_prefix(repository_id: i64) -> String {
    format!("callgraph:{repository_id}:")
}

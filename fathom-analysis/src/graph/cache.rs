//! Moka-backed TTL cache for built call graphs.
//!
//! Moka's builder-level TTL is uniform across entries, but the cache
//! contract carries a TTL per `put`. Each entry stores its own deadline
//! and an expired read is treated as a miss (and evicted eagerly).

use std::sync::Arc;
use std::time::{Duration, Instant};

use fathom_core::traits::GraphCache;
use fathom_core::types::CallGraphData;
use moka::sync::Cache;

#[derive(Clone)]
struct Entry {
    data: Arc<CallGraphData>,
    expires_at: Instant,
}

/// Sharded in-process graph cache with per-entry TTL and prefix
/// invalidation.
pub struct MokaGraphCache {
    cache: Cache<String, Entry>,
}

impl MokaGraphCache {
    pub fn new(max_capacity: u64) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(max_capacity)
                .support_invalidation_closures()
                .build(),
        }
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl GraphCache for MokaGraphCache {
    fn get(&self, key: &str) -> Option<CallGraphData> {
        let entry = self.cache.get(key)?;
        if Instant::now() >= entry.expires_at {
            self.cache.invalidate(key);
            return None;
        }
        Some((*entry.data).clone())
    }

    fn put(&self, key: &str, value: CallGraphData, ttl: Duration) {
        self.cache.insert(
            key.to_string(),
            Entry {
                data: Arc::new(value),
                expires_at: Instant::now() + ttl,
            },
        );
    }

    fn invalidate_prefix(&self, prefix: &str) {
        let prefix = prefix.to_string();
        if let Err(e) = self
            .cache
            .invalidate_entries_if(move |key, _| key.starts_with(&prefix))
        {
            tracing::warn!(error = %e, "cache prefix invalidation failed");
        }
    }
}

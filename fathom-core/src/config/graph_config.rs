//! Call graph configuration.

use serde::{Deserialize, Serialize};

/// Configuration for call-graph construction and traversal.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GraphConfig {
    /// Default build depth when the caller does not specify one. Default: 3.
    pub max_depth: Option<u32>,
    /// TTL for cached call graphs, in seconds. Default: 300.
    pub cache_ttl_secs: Option<u64>,
    /// Hard cap on caller/callee traversal depth. Default: 10.
    pub traversal_depth_cap: Option<u32>,
    /// Average fan treated as fully coupled when normalizing the
    /// coupling score. Default: 10.0.
    pub fan_normalization: Option<f64>,
}

impl GraphConfig {
    /// Effective default build depth, defaulting to 3.
    pub fn effective_max_depth(&self) -> u32 {
        self.max_depth.unwrap_or(3)
    }

    /// Effective cache TTL, defaulting to 300 seconds.
    pub fn effective_cache_ttl_secs(&self) -> u64 {
        self.cache_ttl_secs.unwrap_or(300)
    }

    /// Effective traversal depth cap, defaulting to 10.
    pub fn effective_traversal_depth_cap(&self) -> u32 {
        self.traversal_depth_cap.unwrap_or(10)
    }

    /// Effective fan normalization ceiling, defaulting to 10.0.
    pub fn effective_fan_normalization(&self) -> f64 {
        self.fan_normalization.unwrap_or(10.0)
    }
}

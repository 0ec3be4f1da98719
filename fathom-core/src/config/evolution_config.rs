//! Evolution tracking configuration (significance thresholds).

use serde::{Deserialize, Serialize};

/// Configuration for evolution event classification and detection.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Affected-symbol count above which an event is MAJOR. Default: 10.
    pub major_symbol_count: Option<u32>,
    /// |health score delta| above which an event is MAJOR. Default: 20.0.
    pub major_health_delta: Option<f64>,
    /// Affected-symbol count above which an event is MODERATE. Default: 5.
    pub moderate_symbol_count: Option<u32>,
    /// |complexity delta| above which an event is MODERATE. Default: 20.
    pub moderate_complexity_delta: Option<i64>,
    /// Aggregate complexity increase that triggers a COMPLEXITY_SPIKE
    /// detection. Default: 50.
    pub complexity_spike_threshold: Option<i64>,
    /// Default page size for evolution queries. Default: 100.
    pub query_limit: Option<u32>,
}

impl EvolutionConfig {
    pub fn effective_major_symbol_count(&self) -> u32 {
        self.major_symbol_count.unwrap_or(10)
    }

    pub fn effective_major_health_delta(&self) -> f64 {
        self.major_health_delta.unwrap_or(20.0)
    }

    pub fn effective_moderate_symbol_count(&self) -> u32 {
        self.moderate_symbol_count.unwrap_or(5)
    }

    pub fn effective_moderate_complexity_delta(&self) -> i64 {
        self.moderate_complexity_delta.unwrap_or(20)
    }

    pub fn effective_complexity_spike_threshold(&self) -> i64 {
        self.complexity_spike_threshold.unwrap_or(50)
    }

    pub fn effective_query_limit(&self) -> u32 {
        self.query_limit.unwrap_or(100)
    }
}

//! Event payload types for the analysis lifecycle.

use crate::types::{EvolutionEventType, HealthStatus, Significance};

/// Payload for `on_graph_built`.
#[derive(Debug, Clone)]
pub struct GraphBuiltEvent {
    pub repository_id: i64,
    pub root_symbol_id: i64,
    pub total_nodes: u32,
    pub max_depth: u32,
    pub cache_hit: bool,
}

/// Payload for `on_cache_invalidated`.
#[derive(Debug, Clone)]
pub struct CacheInvalidatedEvent {
    pub repository_id: i64,
    pub snapshots_marked_stale: usize,
}

/// Payload for `on_cycles_detected`.
#[derive(Debug, Clone)]
pub struct CyclesDetectedEvent {
    pub repository_id: i64,
    pub cycle_count: usize,
}

/// Payload for `on_health_computed`.
#[derive(Debug, Clone)]
pub struct HealthComputedEvent {
    pub capability_id: i64,
    pub repository_id: i64,
    pub overall_score: f64,
    pub status: HealthStatus,
}

/// Payload for `on_evolution_recorded`.
#[derive(Debug, Clone)]
pub struct EvolutionRecordedEvent {
    pub capability_id: i64,
    pub repository_id: i64,
    pub event_type: EvolutionEventType,
    pub significance: Significance,
}

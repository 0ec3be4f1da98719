//! Event handler trait. Every method defaults to a no-op so handlers
//! implement only what they observe.

use super::types::*;

/// Observer of analysis lifecycle events.
pub trait FathomEventHandler: Send + Sync {
    fn on_graph_built(&self, event: &GraphBuiltEvent) {
        let _ = event;
    }

    fn on_cache_invalidated(&self, event: &CacheInvalidatedEvent) {
        let _ = event;
    }

    fn on_cycles_detected(&self, event: &CyclesDetectedEvent) {
        let _ = event;
    }

    fn on_health_computed(&self, event: &HealthComputedEvent) {
        let _ = event;
    }

    fn on_evolution_recorded(&self, event: &EvolutionRecordedEvent) {
        let _ = event;
    }
}

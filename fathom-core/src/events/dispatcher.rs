//! Synchronous event dispatch with zero overhead when empty.

use std::sync::Arc;

use super::handler::FathomEventHandler;
use super::types::*;

/// Synchronous event dispatcher wrapping a list of handlers.
///
/// When no handlers are registered, `emit` iterates over an empty Vec, so
/// effectively zero cost.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn FathomEventHandler>>,
}

impl EventDispatcher {
    /// Create a new empty dispatcher.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register an event handler.
    pub fn register(&mut self, handler: Arc<dyn FathomEventHandler>) {
        self.handlers.push(handler);
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Emit an event to all registered handlers.
    /// Handlers that panic are caught and do not prevent subsequent
    /// handlers from receiving the event.
    fn emit<F: Fn(&dyn FathomEventHandler)>(&self, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::warn!("event handler panicked; continuing with remaining handlers");
            }
        }
    }

    pub fn emit_graph_built(&self, event: &GraphBuiltEvent) {
        self.emit(|h| h.on_graph_built(event));
    }

    pub fn emit_cache_invalidated(&self, event: &CacheInvalidatedEvent) {
        self.emit(|h| h.on_cache_invalidated(event));
    }

    pub fn emit_cycles_detected(&self, event: &CyclesDetectedEvent) {
        self.emit(|h| h.on_cycles_detected(event));
    }

    pub fn emit_health_computed(&self, event: &HealthComputedEvent) {
        self.emit(|h| h.on_health_computed(event));
    }

    pub fn emit_evolution_recorded(&self, event: &EvolutionRecordedEvent) {
        self.emit(|h| h.on_evolution_recorded(event));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::types::HealthStatus;

    struct Counting {
        calls: AtomicUsize,
    }

    impl FathomEventHandler for Counting {
        fn on_health_computed(&self, _event: &HealthComputedEvent) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Panicking;

    impl FathomEventHandler for Panicking {
        fn on_health_computed(&self, _event: &HealthComputedEvent) {
            panic!("handler failure");
        }
    }

    #[test]
    fn test_panicking_handler_does_not_block_others() {
        let counting = Arc::new(Counting {
            calls: AtomicUsize::new(0),
        });
        let mut dispatcher = EventDispatcher::new();
        dispatcher.register(Arc::new(Panicking));
        dispatcher.register(counting.clone());

        dispatcher.emit_health_computed(&HealthComputedEvent {
            capability_id: 1,
            repository_id: 1,
            overall_score: 80.0,
            status: HealthStatus::Healthy,
        });

        assert_eq!(counting.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_dispatcher_is_noop() {
        let dispatcher = EventDispatcher::new();
        assert_eq!(dispatcher.handler_count(), 0);
        dispatcher.emit_cycles_detected(&CyclesDetectedEvent {
            repository_id: 1,
            cycle_count: 0,
        });
    }
}

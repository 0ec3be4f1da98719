//! Capability layer: symbol linking, daily health scoring, and
//! evolution event tracking.

pub mod evolution;
pub mod health;
pub mod linker;

pub use evolution::{EvolutionReport, EvolutionTracker, RecordEventRequest, TimelineBucket};
pub use health::{
    AlertSeverity, HealthAlert, HealthReport, HealthRequest, HealthScorer, HealthTrendSummary,
};
pub use linker::{CapabilityLinker, LinkRequest};

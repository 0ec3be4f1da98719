//! Domain types for symbols, references, call graphs, capabilities,
//! health snapshots, and evolution events.

pub mod capability;
pub mod collections;
pub mod evolution;
pub mod graph;
pub mod health;
pub mod symbol;
pub mod time;

pub use capability::{Capability, LinkType, SymbolCapabilityLink};
pub use evolution::{
    CapabilityEvolution, ChangeCategory, EvolutionEventType, Significance,
};
pub use graph::{CallGraphData, CallGraphNode, ExternalCallInfo, GraphMetrics};
pub use health::{CapabilityHealth, HealthStatus, HealthTrend};
pub use symbol::{CodeSymbol, ReferenceType, SymbolKind, SymbolReference};
pub use time::{day_of, unix_now};

//! The analysis engine of the Fathom code-intelligence stack.
//!
//! Two layers:
//! - `graph`: bounded-depth call-graph construction with TTL caching and
//!   persistent snapshots, plus traversal queries (callers/callees,
//!   shortest path, whole-repository cycle detection).
//! - `capability`: symbol-to-capability linking, daily health scoring,
//!   and evolution event tracking.
//!
//! Everything here talks to storage through the ports in
//! `fathom_core::traits`; the engine never touches SQLite directly.

pub mod capability;
pub mod graph;

pub use capability::{CapabilityLinker, EvolutionTracker, HealthScorer};
pub use graph::{CallGraphBuilder, GraphQueryEngine, MokaGraphCache};

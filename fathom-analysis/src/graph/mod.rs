//! Call-graph layer: bounded-depth tree builds, the Moka-backed TTL
//! cache, the in-memory reference graph, and traversal queries.

pub mod builder;
pub mod cache;
pub mod query;
pub mod reference_graph;

pub use builder::{BuildOptions, CallGraphBuilder};
pub use cache::MokaGraphCache;
pub use query::{CallEdge, Cycle, GraphNeighbor, GraphQueryEngine, PathStep};
pub use reference_graph::ReferenceGraph;

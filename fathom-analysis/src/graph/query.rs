//! Traversal queries over the reference graph: callers/callees within a
//! bounded distance, call-edge aggregation, BFS shortest path, and
//! whole-repository cycle detection.

use std::collections::VecDeque;
use std::sync::Arc;

use fathom_core::config::GraphConfig;
use fathom_core::errors::GraphError;
use fathom_core::events::{CyclesDetectedEvent, EventDispatcher};
use fathom_core::traits::{ReferenceFilter, SymbolStore};
use fathom_core::types::collections::{FxHashMap, FxHashSet};
use fathom_core::types::{ReferenceType, SymbolKind};
use petgraph::stable_graph::NodeIndex;
use petgraph::Direction;

use super::reference_graph::ReferenceGraph;

/// A symbol reached by a caller/callee traversal, with its BFS distance
/// from the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNeighbor {
    pub symbol_id: i64,
    pub name: String,
    pub kind: SymbolKind,
    pub file_path: String,
    pub distance: u32,
}

/// An aggregated call edge: reference-row multiplicity collapsed into a
/// count per (source, target) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallEdge {
    pub source_symbol_id: i64,
    pub target_symbol_id: i64,
    pub call_count: u32,
}

/// One step on a shortest path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathStep {
    pub symbol_id: i64,
    pub name: String,
    pub file_path: String,
}

/// A reference cycle, in path order starting from its discovery point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    pub symbol_ids: Vec<i64>,
}

/// Traversal queries over one repository's reference graph. The graph
/// is loaded fresh per call; callers needing many queries against the
/// same revision should batch them behind [`ReferenceGraph::load`].
pub struct GraphQueryEngine {
    store: Arc<dyn SymbolStore>,
    config: GraphConfig,
    events: Arc<EventDispatcher>,
}

impl GraphQueryEngine {
    pub fn new(store: Arc<dyn SymbolStore>, config: GraphConfig) -> Self {
        Self {
            store,
            config,
            events: Arc::new(EventDispatcher::new()),
        }
    }

    pub fn with_events(mut self, events: Arc<EventDispatcher>) -> Self {
        self.events = events;
        self
    }

    /// Symbols that (transitively) reference `symbol_id`, up to `depth`
    /// edges away. Depth is capped by the configured traversal cap.
    pub fn get_callers(
        &self,
        repository_id: i64,
        symbol_id: i64,
        depth: u32,
    ) -> Result<Vec<GraphNeighbor>, GraphError> {
        self.neighbors(repository_id, symbol_id, depth, Direction::Incoming)
    }

    /// Symbols (transitively) referenced by `symbol_id`, up to `depth`
    /// edges away. Depth is capped by the configured traversal cap.
    pub fn get_callees(
        &self,
        repository_id: i64,
        symbol_id: i64,
        depth: u32,
    ) -> Result<Vec<GraphNeighbor>, GraphError> {
        self.neighbors(repository_id, symbol_id, depth, Direction::Outgoing)
    }

    /// Resolved internal call edges, aggregated per (source, target)
    /// pair. `source_file_id` restricts to edges whose source symbol
    /// lives in that file.
    pub fn get_call_edges(
        &self,
        repository_id: i64,
        source_file_id: Option<i64>,
    ) -> Result<Vec<CallEdge>, GraphError> {
        let references = self.store.list_references(&ReferenceFilter {
            repository_id: Some(repository_id),
            reference_type: Some(ReferenceType::Call),
            source_file_id,
            is_external: Some(false),
            ..Default::default()
        })?;

        let mut counts: FxHashMap<(i64, i64), u32> = FxHashMap::default();
        for reference in &references {
            let Some(target_id) = reference.target_symbol_id else {
                continue;
            };
            *counts
                .entry((reference.source_symbol_id, target_id))
                .or_default() += 1;
        }

        let mut edges: Vec<CallEdge> = counts
            .into_iter()
            .map(|((source, target), count)| CallEdge {
                source_symbol_id: source,
                target_symbol_id: target,
                call_count: count,
            })
            .collect();
        edges.sort_by_key(|e| (e.source_symbol_id, e.target_symbol_id));
        Ok(edges)
    }

    /// BFS shortest path from `from` to `to`, endpoints inclusive.
    ///
    /// Both endpoints must exist (`SymbolNotFound` otherwise); an
    /// existing but unreachable pair yields `Ok(None)`. `from == to` is
    /// the single-element path.
    pub fn find_path(
        &self,
        repository_id: i64,
        from: i64,
        to: i64,
    ) -> Result<Option<Vec<PathStep>>, GraphError> {
        for endpoint in [from, to] {
            if self.store.get_symbol(endpoint)?.is_none() {
                return Err(GraphError::SymbolNotFound {
                    symbol_id: endpoint,
                });
            }
        }

        let graph = ReferenceGraph::load(self.store.as_ref(), repository_id)?;
        let (Some(start), Some(goal)) = (graph.node(from), graph.node(to)) else {
            return Ok(None);
        };
        if start == goal {
            return Ok(Some(vec![path_step(&graph, start)]));
        }

        let mut prev: FxHashMap<NodeIndex, NodeIndex> = FxHashMap::default();
        let mut visited: FxHashSet<NodeIndex> = FxHashSet::default();
        let mut queue = VecDeque::new();
        visited.insert(start);
        queue.push_back(start);

        while let Some(node) = queue.pop_front() {
            for next in graph.graph.neighbors_directed(node, Direction::Outgoing) {
                if !visited.insert(next) {
                    continue;
                }
                prev.insert(next, node);
                if next == goal {
                    let mut path = vec![goal];
                    let mut current = goal;
                    while let Some(&p) = prev.get(&current) {
                        path.push(p);
                        current = p;
                    }
                    path.reverse();
                    return Ok(Some(
                        path.into_iter().map(|n| path_step(&graph, n)).collect(),
                    ));
                }
                queue.push_back(next);
            }
        }

        Ok(None)
    }

    /// Find every elementary reference cycle in the repository.
    ///
    /// Iterative DFS with a gray/black coloring; a back edge to a gray
    /// node closes the cycle formed by the stack slice from that node.
    /// Cycles are deduplicated by membership, so `A -> B -> A` and
    /// `B -> A -> B` report once.
    pub fn detect_cycles(&self, repository_id: i64) -> Result<Vec<Cycle>, GraphError> {
        let graph = ReferenceGraph::load(self.store.as_ref(), repository_id)?;

        #[derive(Clone, Copy, PartialEq)]
        enum Color {
            White,
            Gray,
            Black,
        }

        let mut color: FxHashMap<NodeIndex, Color> = graph
            .graph
            .node_indices()
            .map(|n| (n, Color::White))
            .collect();
        let mut cycles: Vec<Cycle> = Vec::new();
        let mut seen_memberships: FxHashSet<Vec<i64>> = FxHashSet::default();

        let roots: Vec<NodeIndex> = graph.graph.node_indices().collect();
        for root in roots {
            if color[&root] != Color::White {
                continue;
            }

            // Frame: node plus its remaining out-neighbors.
            let mut stack: Vec<(NodeIndex, Vec<NodeIndex>, usize)> = Vec::new();
            let mut on_path: Vec<NodeIndex> = Vec::new();
            let mut path_position: FxHashMap<NodeIndex, usize> = FxHashMap::default();

            color.insert(root, Color::Gray);
            path_position.insert(root, 0);
            on_path.push(root);
            let neighbors: Vec<NodeIndex> =
                graph.graph.neighbors_directed(root, Direction::Outgoing).collect();
            stack.push((root, neighbors, 0));

            while !stack.is_empty() {
                let advanced = {
                    let Some((_, neighbors, cursor)) = stack.last_mut() else {
                        break;
                    };
                    if *cursor < neighbors.len() {
                        let next = neighbors[*cursor];
                        *cursor += 1;
                        Some(next)
                    } else {
                        None
                    }
                };

                match advanced {
                    Some(next) => match color[&next] {
                        Color::White => {
                            color.insert(next, Color::Gray);
                            path_position.insert(next, on_path.len());
                            on_path.push(next);
                            let next_neighbors: Vec<NodeIndex> = graph
                                .graph
                                .neighbors_directed(next, Direction::Outgoing)
                                .collect();
                            stack.push((next, next_neighbors, 0));
                        }
                        Color::Gray => {
                            let start = path_position[&next];
                            let members: Vec<i64> = on_path[start..]
                                .iter()
                                .map(|&n| graph.symbol(n).symbol_id)
                                .collect();
                            let mut membership = members.clone();
                            membership.sort_unstable();
                            if seen_memberships.insert(membership) {
                                cycles.push(Cycle {
                                    symbol_ids: members,
                                });
                            }
                        }
                        Color::Black => {}
                    },
                    None => {
                        if let Some((node, _, _)) = stack.pop() {
                            color.insert(node, Color::Black);
                            path_position.remove(&node);
                            on_path.pop();
                        }
                    }
                }
            }
        }

        self.events.emit_cycles_detected(&CyclesDetectedEvent {
            repository_id,
            cycle_count: cycles.len(),
        });
        if !cycles.is_empty() {
            tracing::debug!(repository_id, cycles = cycles.len(), "reference cycles found");
        }
        Ok(cycles)
    }

    fn neighbors(
        &self,
        repository_id: i64,
        symbol_id: i64,
        depth: u32,
        direction: Direction,
    ) -> Result<Vec<GraphNeighbor>, GraphError> {
        if self.store.get_symbol(symbol_id)?.is_none() {
            return Err(GraphError::SymbolNotFound { symbol_id });
        }
        let depth = depth.min(self.config.effective_traversal_depth_cap());

        let graph = ReferenceGraph::load(self.store.as_ref(), repository_id)?;
        let Some(origin) = graph.node(symbol_id) else {
            return Ok(Vec::new());
        };

        let mut result = Vec::new();
        let mut visited: FxHashSet<NodeIndex> = FxHashSet::default();
        let mut queue: VecDeque<(NodeIndex, u32)> = VecDeque::new();
        visited.insert(origin);
        queue.push_back((origin, 0));

        while let Some((node, distance)) = queue.pop_front() {
            if distance >= depth {
                continue;
            }
            for next in graph.graph.neighbors_directed(node, direction) {
                if !visited.insert(next) {
                    continue;
                }
                let symbol = graph.symbol(next);
                result.push(GraphNeighbor {
                    symbol_id: symbol.symbol_id,
                    name: symbol.name.clone(),
                    kind: symbol.kind,
                    file_path: symbol.file_path.clone(),
                    distance: distance + 1,
                });
                queue.push_back((next, distance + 1));
            }
        }

        result.sort_by(|a, b| (a.distance, a.symbol_id).cmp(&(b.distance, b.symbol_id)));
        Ok(result)
    }
}

fn path_step(graph: &ReferenceGraph, node: NodeIndex) -> PathStep {
    let symbol = graph.symbol(node);
    PathStep {
        symbol_id: symbol.symbol_id,
        name: symbol.name.clone(),
        file_path: symbol.file_path.clone(),
    }
}

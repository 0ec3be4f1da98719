//! In-memory reference graph over one repository's resolved,
//! non-external references. Backs the traversal queries.

use fathom_core::errors::GraphError;
use fathom_core::traits::{ReferenceFilter, SymbolFilter, SymbolStore};
use fathom_core::types::collections::FxHashMap;
use fathom_core::types::{ReferenceType, SymbolKind};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};

/// Node payload: the symbol fields traversal answers need.
#[derive(Debug, Clone)]
pub struct SymbolNode {
    pub symbol_id: i64,
    pub name: String,
    pub kind: SymbolKind,
    pub file_path: String,
}

/// Edge payload. Multiplicity is preserved — one edge per reference row,
/// so parallel edges between a pair are expected.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceEdge {
    pub reference_type: ReferenceType,
}

/// Directed reference graph for a single repository.
///
/// External references and references whose target never resolved are
/// not represented; they have no node to point at.
pub struct ReferenceGraph {
    pub graph: StableDiGraph<SymbolNode, ReferenceEdge>,
    index: FxHashMap<i64, NodeIndex>,
}

impl ReferenceGraph {
    /// Load every live symbol and resolved internal reference for the
    /// repository.
    pub fn load(store: &dyn SymbolStore, repository_id: i64) -> Result<Self, GraphError> {
        let symbols = store.list_symbols(&SymbolFilter {
            repository_id: Some(repository_id),
            ..Default::default()
        })?;
        let references = store.list_references(&ReferenceFilter {
            repository_id: Some(repository_id),
            is_external: Some(false),
            ..Default::default()
        })?;

        let mut graph = StableDiGraph::with_capacity(symbols.len(), references.len());
        let mut index = FxHashMap::default();

        for symbol in symbols {
            let node = graph.add_node(SymbolNode {
                symbol_id: symbol.id,
                name: symbol.name,
                kind: symbol.kind,
                file_path: symbol.file_path,
            });
            index.insert(symbol.id, node);
        }

        for reference in &references {
            let Some(target_id) = reference.target_symbol_id else {
                continue;
            };
            let (Some(&source), Some(&target)) = (
                index.get(&reference.source_symbol_id),
                index.get(&target_id),
            ) else {
                continue;
            };
            graph.add_edge(
                source,
                target,
                ReferenceEdge {
                    reference_type: reference.reference_type,
                },
            );
        }

        tracing::debug!(
            repository_id,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "reference graph loaded"
        );

        Ok(Self { graph, index })
    }

    pub fn node(&self, symbol_id: i64) -> Option<NodeIndex> {
        self.index.get(&symbol_id).copied()
    }

    pub fn symbol(&self, node: NodeIndex) -> &SymbolNode {
        &self.graph[node]
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }
}

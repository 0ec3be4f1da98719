//! Property-based tests for call-graph build invariants.
//!
//! Fuzzes random reference topologies (including dense cyclic ones) and
//! verifies the structural guarantees of the built tree:
//!   - depth never exceeds the requested bound, children sit one level
//!     below their parent
//!   - no root-to-node path repeats a symbol (cycle guard)
//!   - every tree edge corresponds to a seeded reference row
//!   - totalNodes counts distinct symbols and coupling stays in [0, 100]

use std::sync::Arc;

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

use fathom_analysis::graph::{BuildOptions, CallGraphBuilder, MokaGraphCache};
use fathom_core::config::GraphConfig;
use fathom_core::types::collections::FxHashSet;
use fathom_core::types::{CallGraphData, CallGraphNode, CodeSymbol, ReferenceType, SymbolKind, SymbolReference};
use fathom_storage::store::SqliteStore;

fn symbol(id: i64) -> CodeSymbol {
    CodeSymbol {
        id,
        repository_id: 1,
        file_id: 100,
        parent_symbol_id: None,
        name: format!("fn{id}"),
        kind: SymbolKind::Function,
        file_path: "src/a.ts".to_string(),
        start_line: 1,
        end_line: 10,
        complexity: 1,
        line_count: 10,
        documentation: None,
        is_exported: true,
        deleted_at: None,
    }
}

fn call(source: i64, target: i64) -> SymbolReference {
    SymbolReference {
        id: 0,
        repository_id: 1,
        source_symbol_id: source,
        target_symbol_id: Some(target),
        reference_type: ReferenceType::Call,
        is_external: false,
        external_package: None,
        target_name: None,
        line: 1,
    }
}

/// Build a graph over `n` symbols (ids 1..=n) with the given edge list,
/// rooted at symbol 1.
fn build(n: i64, edges: &[(i64, i64)], max_depth: u32) -> CallGraphData {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let symbols: Vec<CodeSymbol> = (1..=n).map(symbol).collect();
    let references: Vec<SymbolReference> =
        edges.iter().map(|&(s, t)| call(s, t)).collect();
    store.insert_extraction(&symbols, &references).unwrap();

    CallGraphBuilder::new(
        store,
        Arc::new(MokaGraphCache::new(16)),
        GraphConfig::default(),
    )
    .build_call_graph(
        1,
        1,
        &BuildOptions {
            max_depth: Some(max_depth),
            include_external: false,
        },
    )
    .unwrap()
}

fn walk<F>(node: &CallGraphNode, visit: &mut F) -> Result<(), TestCaseError>
where
    F: FnMut(&CallGraphNode, &[i64]) -> Result<(), TestCaseError>,
{
    fn inner<F>(node: &CallGraphNode, path: &mut Vec<i64>, visit: &mut F) -> Result<(), TestCaseError>
    where
        F: FnMut(&CallGraphNode, &[i64]) -> Result<(), TestCaseError>,
    {
        visit(node, path)?;
        path.push(node.symbol_id);
        for child in &node.children {
            inner(child, path, visit)?;
        }
        path.pop();
        Ok(())
    }
    inner(node, &mut Vec::new(), visit)
}

/// Edge lists over `1..=n` node ids, self-loops and duplicates allowed.
fn edges(n: i64) -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((1..=n, 1..=n), 0..40)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_depth_bound_holds(
        (n, edges) in (2i64..10).prop_flat_map(|n| (Just(n), edges(n))),
        max_depth in 1u32..5,
    ) {
        let data = build(n, &edges, max_depth);
        let mut deepest = 0;
        walk(&data.root, &mut |node, path| {
            deepest = deepest.max(node.depth);
            prop_assert!(node.depth <= max_depth, "node {} at depth {} > {}", node.symbol_id, node.depth, max_depth);
            prop_assert_eq!(node.depth as usize, path.len(), "depth must equal distance from root");
            Ok(())
        })?;
        prop_assert_eq!(data.max_depth, deepest);
    }

    #[test]
    fn prop_no_path_repeats_a_symbol(
        (n, edges) in (2i64..10).prop_flat_map(|n| (Just(n), edges(n))),
        max_depth in 1u32..6,
    ) {
        let data = build(n, &edges, max_depth);
        walk(&data.root, &mut |node, path| {
            prop_assert!(
                !path.contains(&node.symbol_id),
                "symbol {} re-expanded on its own path {:?}",
                node.symbol_id,
                path
            );
            Ok(())
        })?;
    }

    #[test]
    fn prop_tree_edges_come_from_references(
        (n, edge_list) in (2i64..10).prop_flat_map(|n| (Just(n), edges(n))),
        max_depth in 1u32..5,
    ) {
        let seeded: FxHashSet<(i64, i64)> = edge_list.iter().copied().collect();
        let data = build(n, &edge_list, max_depth);
        walk(&data.root, &mut |node, path| {
            if let Some(&parent) = path.last() {
                prop_assert!(
                    seeded.contains(&(parent, node.symbol_id)),
                    "tree edge {} -> {} has no reference row",
                    parent,
                    node.symbol_id
                );
            }
            Ok(())
        })?;
    }

    #[test]
    fn prop_totals_and_metrics_are_consistent(
        (n, edges) in (2i64..10).prop_flat_map(|n| (Just(n), edges(n))),
        max_depth in 1u32..5,
    ) {
        let data = build(n, &edges, max_depth);

        let mut distinct = FxHashSet::default();
        walk(&data.root, &mut |node, _| {
            distinct.insert(node.symbol_id);
            Ok(())
        })?;
        prop_assert_eq!(data.total_nodes as usize, distinct.len());
        prop_assert!(data.total_nodes as i64 <= n);

        prop_assert!(data.metrics.coupling_score >= 0.0);
        prop_assert!(data.metrics.coupling_score <= 100.0);
        prop_assert!(data.metrics.avg_fan_out <= f64::from(data.metrics.max_fan_out));
        prop_assert!(data.metrics.avg_fan_in <= f64::from(data.metrics.max_fan_in));
    }
}

//! GraphQueryEngine integration tests: traversal, shortest paths, and
//! cycle detection.

use std::sync::Arc;

use fathom_analysis::graph::GraphQueryEngine;
use fathom_core::config::GraphConfig;
use fathom_core::errors::GraphError;
use fathom_core::types::{CodeSymbol, ReferenceType, SymbolKind, SymbolReference};
use fathom_storage::store::SqliteStore;

fn setup_store() -> (Arc<SqliteStore>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(&dir.path().join("fathom-test.db")).unwrap();
    (Arc::new(store), dir)
}

fn engine(store: &Arc<SqliteStore>) -> GraphQueryEngine {
    GraphQueryEngine::new(store.clone(), GraphConfig::default())
}

fn symbol(id: i64, name: &str) -> CodeSymbol {
    CodeSymbol {
        id,
        repository_id: 1,
        file_id: 100,
        parent_symbol_id: None,
        name: name.to_string(),
        kind: SymbolKind::Function,
        file_path: "src/mod.ts".to_string(),
        start_line: 1,
        end_line: 10,
        complexity: 1,
        line_count: 10,
        documentation: None,
        is_exported: false,
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

fn seed_chain(store: &SqliteStore, n: i64) {
    let symbols: Vec<CodeSymbol> = (1..=n).map(|i| symbol(i, &format!("f{i}"))).collect();
    let references: Vec<SymbolReference> = (1..n).map(|i| call(i, i + 1)).collect();
    store.insert_extraction(&symbols, &references).unwrap();
}

#[test]
fn callees_and_callers_are_depth_bounded() {
    let (store, _dir) = setup_store();
    seed_chain(&store, 5);
    let engine = engine(&store);

    let callees = engine.get_callees(1, 1, 2).unwrap();
    assert_eq!(callees.len(), 2);
    assert_eq!(callees[0].symbol_id, 2);
    assert_eq!(callees[0].distance, 1);
    assert_eq!(callees[1].symbol_id, 3);
    assert_eq!(callees[1].distance, 2);

    let callers = engine.get_callers(1, 5, 1).unwrap();
    assert_eq!(callers.len(), 1);
    assert_eq!(callers[0].symbol_id, 4);
}

#[test]
fn traversal_depth_is_capped_by_config() {
    let (store, _dir) = setup_store();
    seed_chain(&store, 15);
    let engine = engine(&store);

    // Default cap is 10; a larger request is clamped.
    let callees = engine.get_callees(1, 1, 100).unwrap();
    assert_eq!(callees.len(), 10);
}

#[test]
fn traversal_excludes_origin_even_in_cycles() {
    let (store, _dir) = setup_store();
    store
        .insert_extraction(
            &[symbol(1, "a"), symbol(2, "b")],
            &[call(1, 2), call(2, 1)],
        )
        .unwrap();

    let callees = engine(&store).get_callees(1, 1, 5).unwrap();
    assert_eq!(callees.len(), 1);
    assert_eq!(callees[0].symbol_id, 2);
}

#[test]
fn unknown_traversal_origin_is_an_error() {
    let (store, _dir) = setup_store();
    seed_chain(&store, 2);
    let err = engine(&store).get_callees(1, 99, 3).unwrap_err();
    assert!(matches!(err, GraphError::SymbolNotFound { symbol_id: 99 }));
}

#[test]
fn call_edges_aggregate_multiplicity() {
    let (store, _dir) = setup_store();
    store
        .insert_extraction(
            &[symbol(1, "a"), symbol(2, "b"), symbol(3, "c")],
            &[call(1, 2), call(1, 2), call(1, 2), call(2, 3)],
        )
        .unwrap();

    let edges = engine(&store).get_call_edges(1, None).unwrap();
    assert_eq!(edges.len(), 2);
    assert_eq!(edges[0].source_symbol_id, 1);
    assert_eq!(edges[0].target_symbol_id, 2);
    assert_eq!(edges[0].call_count, 3);
    assert_eq!(edges[1].call_count, 1);
}

#[test]
fn find_path_returns_bfs_shortest() {
    let (store, _dir) = setup_store();
    // Long route 1->2->3->4 and shortcut 1->5->4.
    store
        .insert_extraction(
            &[
                symbol(1, "a"),
                symbol(2, "b"),
                symbol(3, "c"),
                symbol(4, "d"),
                symbol(5, "e"),
            ],
            &[call(1, 2), call(2, 3), call(3, 4), call(1, 5), call(5, 4)],
        )
        .unwrap();

    let path = engine(&store).find_path(1, 1, 4).unwrap().unwrap();
    assert_eq!(path.len(), 3);
    assert_eq!(path[0].symbol_id, 1);
    assert_eq!(path[1].symbol_id, 5);
    assert_eq!(path[2].symbol_id, 4);
}

#[test]
fn find_path_edge_cases() {
    let (store, _dir) = setup_store();
    store
        .insert_extraction(
            &[symbol(1, "a"), symbol(2, "b"), symbol(3, "c")],
            &[call(1, 2)],
        )
        .unwrap();
    let engine = engine(&store);

    // Unreachable is a value, not an error.
    assert!(engine.find_path(1, 2, 3).unwrap().is_none());
    // Paths follow edge direction.
    assert!(engine.find_path(1, 2, 1).unwrap().is_none());

    let trivial = engine.find_path(1, 1, 1).unwrap().unwrap();
    assert_eq!(trivial.len(), 1);
    assert_eq!(trivial[0].symbol_id, 1);

    let err = engine.find_path(1, 1, 404).unwrap_err();
    assert!(matches!(err, GraphError::SymbolNotFound { symbol_id: 404 }));
}

#[test]
fn detect_cycles_reports_exact_membership() {
    let (store, _dir) = setup_store();
    // a -> b -> c -> a, with d -> a outside the cycle.
    store
        .insert_extraction(
            &[symbol(1, "a"), symbol(2, "b"), symbol(3, "c"), symbol(4, "d")],
            &[call(1, 2), call(2, 3), call(3, 1), call(4, 1)],
        )
        .unwrap();

    let cycles = engine(&store).detect_cycles(1).unwrap();
    assert_eq!(cycles.len(), 1);
    let mut members = cycles[0].symbol_ids.clone();
    members.sort_unstable();
    assert_eq!(members, vec![1, 2, 3]);
}

#[test]
fn detect_cycles_finds_self_loops_and_dedupes() {
    let (store, _dir) = setup_store();
    // Self-loop on a; two-cycle b <-> c reachable from both sides.
    store
        .insert_extraction(
            &[symbol(1, "a"), symbol(2, "b"), symbol(3, "c")],
            &[call(1, 1), call(2, 3), call(3, 2)],
        )
        .unwrap();

    let mut cycles = engine(&store).detect_cycles(1).unwrap();
    for cycle in &mut cycles {
        cycle.symbol_ids.sort_unstable();
    }
    cycles.sort_by(|a, b| a.symbol_ids.cmp(&b.symbol_ids));

    assert_eq!(cycles.len(), 2);
    assert_eq!(cycles[0].symbol_ids, vec![1]);
    assert_eq!(cycles[1].symbol_ids, vec![2, 3]);
}

#[test]
fn acyclic_repository_has_no_cycles() {
    let (store, _dir) = setup_store();
    seed_chain(&store, 6);
    assert!(engine(&store).detect_cycles(1).unwrap().is_empty());
}

//! CallGraphBuilder integration tests over a real SQLite store.

use std::sync::Arc;

use fathom_analysis::graph::{BuildOptions, CallGraphBuilder, MokaGraphCache};
use fathom_core::config::GraphConfig;
use fathom_core::errors::GraphError;
use fathom_core::types::{CodeSymbol, ReferenceType, SymbolKind, SymbolReference};
use fathom_storage::store::SqliteStore;

fn setup_store() -> (Arc<SqliteStore>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(&dir.path().join("fathom-test.db")).unwrap();
    (Arc::new(store), dir)
}

fn builder(store: &Arc<SqliteStore>) -> CallGraphBuilder {
    CallGraphBuilder::new(
        store.clone(),
        Arc::new(MokaGraphCache::new(256)),
        GraphConfig::default(),
    )
    .with_snapshots(store.clone())
}

fn symbol(id: i64, file: i64, name: &str) -> CodeSymbol {
    CodeSymbol {
        id,
        repository_id: 1,
        file_id: file,
        parent_symbol_id: None,
        name: name.to_string(),
        kind: SymbolKind::Function,
        file_path: format!("src/file{file}.ts"),
        start_line: 1,
        end_line: 20,
        complexity: 2,
        line_count: 20,
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
        line: 5,
    }
}

fn external_call(source: i64, package: &str, name: &str) -> SymbolReference {
    SymbolReference {
        id: 0,
        repository_id: 1,
        source_symbol_id: source,
        target_symbol_id: None,
        reference_type: ReferenceType::Call,
        is_external: true,
        external_package: Some(package.to_string()),
        target_name: Some(name.to_string()),
        line: 6,
    }
}

#[test]
fn main_calling_helper_yields_two_nodes() {
    let (store, _dir) = setup_store();
    store
        .insert_extraction(
            &[symbol(1, 100, "main"), symbol(2, 100, "helper")],
            &[call(1, 2)],
        )
        .unwrap();

    let data = builder(&store)
        .build_call_graph(
            1,
            1,
            &BuildOptions {
                max_depth: Some(2),
                include_external: true,
            },
        )
        .unwrap();

    assert_eq!(data.total_nodes, 2);
    assert_eq!(data.root.name, "main");
    assert_eq!(data.root.call_count, 1);
    assert_eq!(data.root.children.len(), 1);
    assert_eq!(data.root.children[0].name, "helper");
    assert_eq!(data.root.children[0].depth, 1);
    assert_eq!(data.max_depth, 1);
}

#[test]
fn missing_root_fails_missing_target_does_not() {
    let (store, _dir) = setup_store();
    store
        .insert_extraction(&[symbol(1, 100, "main")], &[call(1, 999)])
        .unwrap();

    let b = builder(&store);
    let err = b
        .build_call_graph(1, 42, &BuildOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        GraphError::SymbolNotFound { symbol_id: 42 }
    ));

    // The dangling reference still counts as a call site but produces no
    // child.
    let data = b.build_call_graph(1, 1, &BuildOptions::default()).unwrap();
    assert_eq!(data.total_nodes, 1);
    assert_eq!(data.root.call_count, 1);
    assert!(data.root.children.is_empty());
}

#[test]
fn depth_bound_holds_on_a_chain() {
    let (store, _dir) = setup_store();
    let symbols: Vec<CodeSymbol> = (1..=6).map(|i| symbol(i, 100, "f")).collect();
    let references: Vec<SymbolReference> = (1..=5).map(|i| call(i, i + 1)).collect();
    store.insert_extraction(&symbols, &references).unwrap();

    let data = builder(&store)
        .build_call_graph(
            1,
            1,
            &BuildOptions {
                max_depth: Some(3),
                include_external: false,
            },
        )
        .unwrap();

    assert_eq!(data.max_depth, 3);
    assert_eq!(data.total_nodes, 4);
    fn max_depth(node: &fathom_core::types::CallGraphNode) -> u32 {
        node.children.iter().map(max_depth).max().unwrap_or(node.depth)
    }
    assert!(max_depth(&data.root) <= 3);
}

#[test]
fn cycle_guard_breaks_recursion_without_losing_siblings() {
    let (store, _dir) = setup_store();
    // a -> b -> c -> a, plus b -> d.
    store
        .insert_extraction(
            &[
                symbol(1, 100, "a"),
                symbol(2, 100, "b"),
                symbol(3, 100, "c"),
                symbol(4, 100, "d"),
            ],
            &[call(1, 2), call(2, 3), call(3, 1), call(2, 4)],
        )
        .unwrap();

    let data = builder(&store)
        .build_call_graph(
            1,
            1,
            &BuildOptions {
                max_depth: Some(10),
                include_external: false,
            },
        )
        .unwrap();

    assert_eq!(data.total_nodes, 4);
    let b = &data.root.children[0];
    // c does not re-expand a; d still appears under b.
    let c = b.children.iter().find(|n| n.name == "c").unwrap();
    assert!(c.children.is_empty());
    assert!(b.children.iter().any(|n| n.name == "d"));
}

#[test]
fn shared_callee_appears_twice_but_counts_once() {
    let (store, _dir) = setup_store();
    // a -> b, a -> c, b -> d, c -> d.
    store
        .insert_extraction(
            &[
                symbol(1, 100, "a"),
                symbol(2, 100, "b"),
                symbol(3, 100, "c"),
                symbol(4, 100, "d"),
            ],
            &[call(1, 2), call(1, 3), call(2, 4), call(3, 4)],
        )
        .unwrap();

    let data = builder(&store)
        .build_call_graph(1, 1, &BuildOptions::default())
        .unwrap();

    let d_occurrences: usize = data
        .root
        .children
        .iter()
        .map(|child| child.children.iter().filter(|n| n.name == "d").count())
        .sum();
    assert_eq!(d_occurrences, 2);
    assert_eq!(data.total_nodes, 4);
}

#[test]
fn external_calls_recorded_when_requested() {
    let (store, _dir) = setup_store();
    store
        .insert_extraction(
            &[symbol(1, 100, "main")],
            &[
                external_call(1, "lodash", "merge"),
                external_call(1, "lodash", "merge"),
                external_call(1, "zod", "parse"),
            ],
        )
        .unwrap();

    let b = builder(&store);
    let with = b
        .build_call_graph(
            1,
            1,
            &BuildOptions {
                max_depth: Some(3),
                include_external: true,
            },
        )
        .unwrap();
    assert_eq!(with.external_calls.len(), 2);
    assert_eq!(with.root.call_count, 3);

    let without = b
        .build_call_graph(
            1,
            1,
            &BuildOptions {
                max_depth: Some(3),
                include_external: false,
            },
        )
        .unwrap();
    assert!(without.external_calls.is_empty());
}

#[test]
fn cache_serves_repeat_builds_until_invalidated() {
    let (store, _dir) = setup_store();
    store
        .insert_extraction(
            &[symbol(1, 100, "main"), symbol(2, 100, "helper")],
            &[call(1, 2)],
        )
        .unwrap();

    let b = builder(&store);
    let options = BuildOptions::default();
    let first = b.build_call_graph(1, 1, &options).unwrap();
    assert_eq!(first.total_nodes, 2);

    // New data is invisible while the cached graph lives.
    store.insert_symbol(&symbol(3, 100, "extra")).unwrap();
    store.insert_reference(&call(2, 3)).unwrap();
    let cached = b.build_call_graph(1, 1, &options).unwrap();
    assert_eq!(cached.total_nodes, 2);

    b.invalidate_repository(1).unwrap();
    let rebuilt = b.build_call_graph(1, 1, &options).unwrap();
    assert_eq!(rebuilt.total_nodes, 3);
}

#[test]
fn builds_persist_snapshots_and_invalidation_marks_them_stale() {
    let (store, _dir) = setup_store();
    store
        .insert_extraction(
            &[symbol(1, 100, "main"), symbol(2, 100, "helper")],
            &[call(1, 2)],
        )
        .unwrap();

    let b = builder(&store);
    b.build_call_graph(1, 1, &BuildOptions::default()).unwrap();

    let (snapshot, stale) = b.stored_snapshot(1, 1).unwrap().unwrap();
    assert_eq!(snapshot.total_nodes, 2);
    assert!(!stale);

    let marked = b.invalidate_repository(1).unwrap();
    assert_eq!(marked, 1);
    let (_, stale) = b.stored_snapshot(1, 1).unwrap().unwrap();
    assert!(stale);
}

#[test]
fn file_graphs_cover_top_level_roots_and_stop_at_file_boundary() {
    let (store, _dir) = setup_store();
    // File 100: two top-level symbols and one nested. File 200: callee.
    let mut nested = symbol(3, 100, "inner");
    nested.parent_symbol_id = Some(1);
    store
        .insert_extraction(
            &[
                symbol(1, 100, "alpha"),
                symbol(2, 100, "beta"),
                nested,
                symbol(4, 200, "gamma"),
                symbol(5, 200, "delta"),
            ],
            &[call(1, 4), call(4, 5), call(2, 1)],
        )
        .unwrap();

    let graphs = builder(&store).build_file_call_graph(1, 100).unwrap();
    assert_eq!(graphs.len(), 2);

    let alpha = graphs.iter().find(|g| g.root.name == "alpha").unwrap();
    // gamma (file 200) appears as a leaf; its own callee delta does not.
    assert_eq!(alpha.root.children.len(), 1);
    assert_eq!(alpha.root.children[0].name, "gamma");
    assert!(alpha.root.children[0].children.is_empty());
}

#[test]
fn metrics_reflect_fan_out_and_fan_in() {
    let (store, _dir) = setup_store();
    // a calls b twice and c once; b calls c.
    store
        .insert_extraction(
            &[symbol(1, 100, "a"), symbol(2, 100, "b"), symbol(3, 100, "c")],
            &[call(1, 2), call(1, 2), call(1, 3), call(2, 3)],
        )
        .unwrap();

    let data = builder(&store)
        .build_call_graph(1, 1, &BuildOptions::default())
        .unwrap();

    let metrics = &data.metrics;
    assert_eq!(metrics.max_fan_out, 3);
    assert_eq!(metrics.max_fan_in, 2);
    // Sources: a(3), b(1) -> avg 2. Targets: b(2), c(2) -> avg 2.
    assert_eq!(metrics.avg_fan_out, 2.0);
    assert_eq!(metrics.avg_fan_in, 2.0);
    // (2 + 2) / 2 = 2 against the default ceiling of 10 -> 20.
    assert!((metrics.coupling_score - 20.0).abs() < 1e-9);
}

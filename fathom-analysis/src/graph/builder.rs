//! Bounded-depth call-graph construction.
//!
//! Builds are trees, not graphs: a symbol already on the current
//! root-to-node path is never re-expanded, which breaks cycles without
//! losing the sibling occurrences of a shared callee. Completed builds
//! go to the TTL cache and, when a snapshot store is attached, to the
//! persistent snapshot table.

use std::sync::Arc;
use std::time::Duration;

use fathom_core::config::GraphConfig;
use fathom_core::errors::GraphError;
use fathom_core::events::{CacheInvalidatedEvent, EventDispatcher, GraphBuiltEvent};
use fathom_core::traits::{
    call_graph_key, repository_prefix, GraphCache, GraphSnapshotStore, ReferenceFilter,
    SymbolFilter, SymbolStore,
};
use fathom_core::types::collections::{FxHashMap, FxHashSet};
use fathom_core::types::{
    CallGraphData, CallGraphNode, CodeSymbol, ExternalCallInfo, GraphMetrics,
};
use rayon::prelude::*;

/// Snapshot table discriminator for symbol-rooted call graphs.
const CALL_GRAPH_TYPE: &str = "call";

/// Per-build options. `max_depth: None` falls back to the configured
/// default depth.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub max_depth: Option<u32>,
    pub include_external: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            include_external: true,
        }
    }
}

/// Builds call graphs on top of the symbol store.
pub struct CallGraphBuilder {
    store: Arc<dyn SymbolStore>,
    cache: Arc<dyn GraphCache>,
    snapshots: Option<Arc<dyn GraphSnapshotStore>>,
    config: GraphConfig,
    events: Arc<EventDispatcher>,
}

/// Mutable state threaded through one build.
struct BuildContext {
    /// Distinct symbols placed in the tree.
    distinct: FxHashSet<i64>,
    /// Symbols on the current root-to-node path (cycle guard).
    path: FxHashSet<i64>,
    /// External calls, deduplicated by (package, symbol).
    externals: Vec<ExternalCallInfo>,
    seen_externals: FxHashSet<(String, String)>,
    deepest: u32,
}

impl BuildContext {
    fn new() -> Self {
        Self {
            distinct: FxHashSet::default(),
            path: FxHashSet::default(),
            externals: Vec::new(),
            seen_externals: FxHashSet::default(),
            deepest: 0,
        }
    }
}

impl CallGraphBuilder {
    pub fn new(store: Arc<dyn SymbolStore>, cache: Arc<dyn GraphCache>, config: GraphConfig) -> Self {
        Self {
            store,
            cache,
            snapshots: None,
            config,
            events: Arc::new(EventDispatcher::new()),
        }
    }

    /// Attach a persistent snapshot store. Completed builds are upserted
    /// there in addition to the TTL cache.
    pub fn with_snapshots(mut self, snapshots: Arc<dyn GraphSnapshotStore>) -> Self {
        self.snapshots = Some(snapshots);
        self
    }

    pub fn with_events(mut self, events: Arc<EventDispatcher>) -> Self {
        self.events = events;
        self
    }

    /// Build the call graph rooted at `root_symbol_id`, consulting the
    /// TTL cache first. Fails with `SymbolNotFound` when the root does
    /// not exist; missing or deleted non-root targets are silently not
    /// expanded.
    pub fn build_call_graph(
        &self,
        repository_id: i64,
        root_symbol_id: i64,
        options: &BuildOptions,
    ) -> Result<CallGraphData, GraphError> {
        let max_depth = options.max_depth.unwrap_or(self.config.effective_max_depth());
        let key = call_graph_key(repository_id, root_symbol_id, max_depth, options.include_external);

        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(repository_id, root_symbol_id, key = %key, "call graph cache hit");
            self.events.emit_graph_built(&GraphBuiltEvent {
                repository_id,
                root_symbol_id,
                total_nodes: hit.total_nodes,
                max_depth: hit.max_depth,
                cache_hit: true,
            });
            return Ok(hit);
        }

        let data = self.build_uncached(repository_id, root_symbol_id, max_depth, options, None)?;

        self.cache.put(
            &key,
            data.clone(),
            Duration::from_secs(self.config.effective_cache_ttl_secs()),
        );
        if let Some(snapshots) = &self.snapshots {
            snapshots.upsert_snapshot(repository_id, CALL_GRAPH_TYPE, root_symbol_id, &data)?;
        }

        self.events.emit_graph_built(&GraphBuiltEvent {
            repository_id,
            root_symbol_id,
            total_nodes: data.total_nodes,
            max_depth: data.max_depth,
            cache_hit: false,
        });
        tracing::debug!(
            repository_id,
            root_symbol_id,
            total_nodes = data.total_nodes,
            max_depth = data.max_depth,
            "call graph built"
        );
        Ok(data)
    }

    /// Build one call graph per top-level symbol of a file, in parallel.
    ///
    /// Children outside the file appear as leaves — cross-file expansion
    /// belongs to symbol-rooted builds. File-scoped builds bypass the
    /// cache and snapshot table; their trees are shaped differently from
    /// same-key unscoped builds.
    pub fn build_file_call_graph(
        &self,
        repository_id: i64,
        file_id: i64,
    ) -> Result<Vec<CallGraphData>, GraphError> {
        let roots = self.store.list_symbols(&SymbolFilter {
            repository_id: Some(repository_id),
            file_id: Some(file_id),
            top_level_only: true,
            ..Default::default()
        })?;

        let max_depth = self.config.effective_max_depth();
        let options = BuildOptions {
            max_depth: Some(max_depth),
            include_external: false,
        };

        let graphs: Vec<CallGraphData> = roots
            .par_iter()
            .map(|root| {
                self.build_uncached(repository_id, root.id, max_depth, &options, Some(file_id))
            })
            .collect::<Result<_, GraphError>>()?;

        tracing::debug!(
            repository_id,
            file_id,
            roots = graphs.len(),
            "file call graphs built"
        );
        Ok(graphs)
    }

    /// Drop every cached graph for the repository and flag its stored
    /// snapshots stale. Returns the number of snapshots flagged.
    pub fn invalidate_repository(&self, repository_id: i64) -> Result<usize, GraphError> {
        self.cache.invalidate_prefix(&repository_prefix(repository_id));
        let marked = match &self.snapshots {
            Some(snapshots) => snapshots.mark_all_stale(repository_id)?,
            None => 0,
        };
        self.events.emit_cache_invalidated(&CacheInvalidatedEvent {
            repository_id,
            snapshots_marked_stale: marked,
        });
        tracing::info!(repository_id, marked, "call-graph caches invalidated");
        Ok(marked)
    }

    /// Read back the persisted snapshot for a root, with its staleness
    /// flag. `None` when no snapshot store is attached or none exists.
    pub fn stored_snapshot(
        &self,
        repository_id: i64,
        root_symbol_id: i64,
    ) -> Result<Option<(CallGraphData, bool)>, GraphError> {
        match &self.snapshots {
            Some(snapshots) => {
                Ok(snapshots.get_snapshot(repository_id, CALL_GRAPH_TYPE, root_symbol_id)?)
            }
            None => Ok(None),
        }
    }

    fn build_uncached(
        &self,
        repository_id: i64,
        root_symbol_id: i64,
        max_depth: u32,
        options: &BuildOptions,
        file_scope: Option<i64>,
    ) -> Result<CallGraphData, GraphError> {
        let root_symbol = self
            .store
            .get_symbol(root_symbol_id)?
            .ok_or(GraphError::SymbolNotFound {
                symbol_id: root_symbol_id,
            })?;

        let mut ctx = BuildContext::new();
        let root = self.expand(
            repository_id,
            &root_symbol,
            0,
            max_depth,
            options.include_external,
            file_scope,
            &mut ctx,
        )?;
        let metrics = self.compute_metrics(repository_id)?;

        Ok(CallGraphData {
            root,
            total_nodes: ctx.distinct.len() as u32,
            max_depth: ctx.deepest,
            external_calls: ctx.externals,
            metrics,
        })
    }

    fn expand(
        &self,
        repository_id: i64,
        symbol: &CodeSymbol,
        depth: u32,
        max_depth: u32,
        include_external: bool,
        file_scope: Option<i64>,
        ctx: &mut BuildContext,
    ) -> Result<CallGraphNode, GraphError> {
        ctx.distinct.insert(symbol.id);
        ctx.deepest = ctx.deepest.max(depth);

        let references = self.store.list_references(&ReferenceFilter {
            repository_id: Some(repository_id),
            source_symbol_id: Some(symbol.id),
            ..Default::default()
        })?;
        let call_count = references.len() as u32;

        let mut children = Vec::new();
        let expandable =
            depth < max_depth && file_scope.map_or(true, |file| symbol.file_id == file);
        if expandable {
            ctx.path.insert(symbol.id);
            for reference in &references {
                if reference.is_external {
                    if include_external {
                        self.note_external(reference.external_package.clone(), reference.target_name.clone(), ctx);
                    }
                    continue;
                }
                let Some(target_id) = reference.target_symbol_id else {
                    continue;
                };
                if ctx.path.contains(&target_id) {
                    continue;
                }
                let Some(target) = self.store.get_symbol(target_id)? else {
                    continue;
                };
                if target.is_deleted() {
                    continue;
                }
                children.push(self.expand(
                    repository_id,
                    &target,
                    depth + 1,
                    max_depth,
                    include_external,
                    file_scope,
                    ctx,
                )?);
            }
            ctx.path.remove(&symbol.id);
        }

        Ok(CallGraphNode {
            symbol_id: symbol.id,
            name: symbol.name.clone(),
            kind: symbol.kind,
            file_path: symbol.file_path.clone(),
            file_id: symbol.file_id,
            depth,
            complexity: symbol.complexity,
            call_count,
            children,
        })
    }

    fn note_external(
        &self,
        package: Option<String>,
        target_name: Option<String>,
        ctx: &mut BuildContext,
    ) {
        let package = package.unwrap_or_else(|| "unknown".to_string());
        let symbol = target_name.unwrap_or_default();
        if ctx.seen_externals.insert((package.clone(), symbol.clone())) {
            ctx.externals.push(ExternalCallInfo { package, symbol });
        }
    }

    /// Fan-in/fan-out over the repository's resolved internal
    /// references. Averages are per symbol that has at least one edge on
    /// the respective side.
    fn compute_metrics(&self, repository_id: i64) -> Result<GraphMetrics, GraphError> {
        let references = self.store.list_references(&ReferenceFilter {
            repository_id: Some(repository_id),
            is_external: Some(false),
            ..Default::default()
        })?;

        let mut fan_out: FxHashMap<i64, u32> = FxHashMap::default();
        let mut fan_in: FxHashMap<i64, u32> = FxHashMap::default();
        for reference in &references {
            let Some(target_id) = reference.target_symbol_id else {
                continue;
            };
            *fan_out.entry(reference.source_symbol_id).or_default() += 1;
            *fan_in.entry(target_id).or_default() += 1;
        }

        if fan_out.is_empty() && fan_in.is_empty() {
            return Ok(GraphMetrics::default());
        }

        let avg = |counts: &FxHashMap<i64, u32>| -> f64 {
            if counts.is_empty() {
                0.0
            } else {
                counts.values().map(|&c| c as f64).sum::<f64>() / counts.len() as f64
            }
        };
        let avg_fan_out = avg(&fan_out);
        let avg_fan_in = avg(&fan_in);
        let max_fan_out = fan_out.values().copied().max().unwrap_or(0);
        let max_fan_in = fan_in.values().copied().max().unwrap_or(0);

        let normalization = self.config.effective_fan_normalization();
        let coupling_score =
            (((avg_fan_out + avg_fan_in) / 2.0) / normalization).min(1.0) * 100.0;

        Ok(GraphMetrics {
            avg_fan_out,
            avg_fan_in,
            max_fan_out,
            max_fan_in,
            coupling_score,
        })
    }
}

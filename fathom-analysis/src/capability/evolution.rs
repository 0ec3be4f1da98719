//! Capability evolution tracking: append-only, commit-tied events with
//! derived significance, plus aggregate reporting and spike detection.

use std::sync::Arc;

use fathom_core::config::EvolutionConfig;
use fathom_core::errors::CapabilityError;
use fathom_core::events::{EventDispatcher, EvolutionRecordedEvent};
use fathom_core::traits::{CapabilityStore, EvolutionFilter, LinkFilter, SymbolFilter, SymbolStore};
use fathom_core::types::collections::FxHashMap;
use fathom_core::types::{
    day_of, unix_now, CapabilityEvolution, ChangeCategory, EvolutionEventType, Significance,
};

/// Everything a caller supplies for one event. Significance is derived,
/// never accepted from outside.
#[derive(Debug, Clone)]
pub struct RecordEventRequest {
    pub capability_id: i64,
    pub repository_id: i64,
    pub commit_sha: String,
    pub previous_commit_sha: Option<String>,
    pub event_type: EvolutionEventType,
    pub affected_symbol_ids: Vec<i64>,
    pub affected_file_ids: Vec<i64>,
    pub complexity_delta: i64,
    pub lines_delta: i64,
    pub health_score_delta: f64,
    pub breaking_change: bool,
    pub change_category: ChangeCategory,
    pub summary: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

/// One per-day aggregation bucket of the evolution timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineBucket {
    pub date: i64,
    pub event_count: u64,
    pub complexity_delta: i64,
    pub lines_delta: i64,
}

/// A page of events plus aggregates over the whole matching set.
#[derive(Debug, Clone)]
pub struct EvolutionReport {
    /// The requested page, most recent first.
    pub events: Vec<CapabilityEvolution>,
    /// Total matches ignoring pagination.
    pub total_events: u64,
    pub counts_by_type: FxHashMap<EvolutionEventType, u64>,
    pub counts_by_category: FxHashMap<ChangeCategory, u64>,
    /// Per-day buckets, ascending by date.
    pub timeline: Vec<TimelineBucket>,
}

/// Records and reports capability evolution events.
pub struct EvolutionTracker {
    symbols: Arc<dyn SymbolStore>,
    capabilities: Arc<dyn CapabilityStore>,
    config: EvolutionConfig,
    events: Arc<EventDispatcher>,
}

impl EvolutionTracker {
    pub fn new(
        symbols: Arc<dyn SymbolStore>,
        capabilities: Arc<dyn CapabilityStore>,
        config: EvolutionConfig,
    ) -> Self {
        Self {
            symbols,
            capabilities,
            config,
            events: Arc::new(EventDispatcher::new()),
        }
    }

    pub fn with_events(mut self, events: Arc<EventDispatcher>) -> Self {
        self.events = events;
        self
    }

    /// Append one event. The capability must exist; significance is
    /// derived from the request's magnitude.
    pub fn record_event(
        &self,
        request: RecordEventRequest,
    ) -> Result<CapabilityEvolution, CapabilityError> {
        if self
            .capabilities
            .get_capability(request.capability_id)?
            .is_none()
        {
            return Err(CapabilityError::CapabilityNotFound {
                capability_id: request.capability_id,
            });
        }

        let significance = classify_significance(&request, &self.config);
        let mut event = CapabilityEvolution {
            id: 0,
            capability_id: request.capability_id,
            repository_id: request.repository_id,
            commit_sha: request.commit_sha,
            previous_commit_sha: request.previous_commit_sha,
            event_type: request.event_type,
            affected_symbol_ids: request.affected_symbol_ids,
            affected_file_ids: request.affected_file_ids,
            complexity_delta: request.complexity_delta,
            lines_delta: request.lines_delta,
            health_score_delta: request.health_score_delta,
            breaking_change: request.breaking_change,
            change_category: request.change_category,
            significance,
            summary: request.summary,
            description: request.description,
            tags: request.tags,
            detected_at: unix_now(),
        };
        event.id = self.capabilities.insert_event(&event)?;

        self.events.emit_evolution_recorded(&EvolutionRecordedEvent {
            capability_id: event.capability_id,
            repository_id: event.repository_id,
            event_type: event.event_type,
            significance,
        });
        tracing::debug!(
            capability_id = event.capability_id,
            event_type = event.event_type.as_str(),
            significance = significance.as_str(),
            "evolution event recorded"
        );
        Ok(event)
    }

    /// Query events with aggregates. Pagination applies to the returned
    /// page only; totals, counts, and the timeline cover every match.
    pub fn get_evolution(
        &self,
        filter: &EvolutionFilter,
    ) -> Result<EvolutionReport, CapabilityError> {
        let unbounded = EvolutionFilter {
            limit: None,
            offset: 0,
            ..filter.clone()
        };
        let all = self.capabilities.list_events(&unbounded)?;

        let mut counts_by_type: FxHashMap<EvolutionEventType, u64> = FxHashMap::default();
        let mut counts_by_category: FxHashMap<ChangeCategory, u64> = FxHashMap::default();
        let mut buckets: FxHashMap<i64, TimelineBucket> = FxHashMap::default();
        for event in &all {
            *counts_by_type.entry(event.event_type).or_default() += 1;
            *counts_by_category.entry(event.change_category).or_default() += 1;
            let date = day_of(event.detected_at);
            let bucket = buckets.entry(date).or_insert(TimelineBucket {
                date,
                event_count: 0,
                complexity_delta: 0,
                lines_delta: 0,
            });
            bucket.event_count += 1;
            bucket.complexity_delta += event.complexity_delta;
            bucket.lines_delta += event.lines_delta;
        }
        let mut timeline: Vec<TimelineBucket> = buckets.into_values().collect();
        timeline.sort_by_key(|b| b.date);

        let total_events = all.len() as u64;
        let limit = filter.limit.unwrap_or(self.config.effective_query_limit()) as usize;
        let events: Vec<CapabilityEvolution> = all
            .into_iter()
            .skip(filter.offset as usize)
            .take(limit)
            .collect();

        Ok(EvolutionReport {
            events,
            total_events,
            counts_by_type,
            counts_by_category,
            timeline,
        })
    }

    /// Compare the capability's current aggregate complexity against its
    /// latest stored health snapshot; an increase past the spike
    /// threshold records a COMPLEXITY_SPIKE event. `None` means nothing
    /// noteworthy — including when no baseline snapshot exists yet.
    pub fn detect_evolution(
        &self,
        capability_id: i64,
        repository_id: i64,
        commit_sha: &str,
        previous_commit_sha: Option<&str>,
    ) -> Result<Option<CapabilityEvolution>, CapabilityError> {
        if self.capabilities.get_capability(capability_id)?.is_none() {
            return Err(CapabilityError::CapabilityNotFound { capability_id });
        }

        let Some(baseline) =
            self.capabilities
                .latest_health_before(capability_id, repository_id, i64::MAX)?
        else {
            return Ok(None);
        };

        let links = self.capabilities.list_links(&LinkFilter {
            capability_id: Some(capability_id),
            ..Default::default()
        })?;
        let symbol_ids: Vec<i64> = links.iter().map(|l| l.symbol_id).collect();
        let symbols = if symbol_ids.is_empty() {
            Vec::new()
        } else {
            self.symbols.list_symbols(&SymbolFilter {
                repository_id: Some(repository_id),
                symbol_ids: Some(symbol_ids),
                ..Default::default()
            })?
        };

        let current_complexity: i64 = symbols.iter().map(|s| s.complexity as i64).sum();
        let increase = current_complexity - baseline.total_complexity as i64;
        if increase <= self.config.effective_complexity_spike_threshold() {
            return Ok(None);
        }

        let affected_file_ids: Vec<i64> = {
            let mut file_ids: Vec<i64> = symbols.iter().map(|s| s.file_id).collect();
            file_ids.sort_unstable();
            file_ids.dedup();
            file_ids
        };

        let event = self.record_event(RecordEventRequest {
            capability_id,
            repository_id,
            commit_sha: commit_sha.to_string(),
            previous_commit_sha: previous_commit_sha.map(str::to_string),
            event_type: EvolutionEventType::ComplexitySpike,
            affected_symbol_ids: symbols.iter().map(|s| s.id).collect(),
            affected_file_ids,
            complexity_delta: increase,
            lines_delta: 0,
            health_score_delta: 0.0,
            breaking_change: false,
            change_category: ChangeCategory::Feature,
            summary: format!("aggregate complexity rose by {increase}"),
            description: None,
            tags: vec!["auto-detected".to_string()],
        })?;
        Ok(Some(event))
    }
}

/// Magnitude-based significance. Breaking changes dominate everything.
fn classify_significance(request: &RecordEventRequest, config: &EvolutionConfig) -> Significance {
    if request.breaking_change {
        return Significance::Critical;
    }
    let affected = request.affected_symbol_ids.len() as u32;
    if affected > config.effective_major_symbol_count()
        || request.health_score_delta.abs() > config.effective_major_health_delta()
    {
        return Significance::Major;
    }
    if affected > config.effective_moderate_symbol_count()
        || request.complexity_delta.abs() > config.effective_moderate_complexity_delta()
    {
        return Significance::Moderate;
    }
    if affected > 0 {
        return Significance::Minor;
    }
    Significance::Trivial
}

//! Daily capability health scoring.
//!
//! Four component scores (complexity, quality, stability,
//! maintainability) weighted into an overall 0-100 score, persisted as
//! one snapshot per (capability, repository, day). Re-running the same
//! day overwrites the row.

use std::sync::Arc;

use fathom_core::config::HealthConfig;
use fathom_core::errors::CapabilityError;
use fathom_core::events::{EventDispatcher, HealthComputedEvent};
use fathom_core::traits::{CapabilityStore, LinkFilter, SymbolFilter, SymbolStore};
use fathom_core::types::collections::FxHashSet;
use fathom_core::types::time::SECONDS_PER_DAY;
use fathom_core::types::{
    day_of, unix_now, CapabilityHealth, HealthStatus, HealthTrend, LinkType,
};

/// Churn data is not integrated yet; stability is pinned here until it
/// is. Extension point, not a formula to tune.
const STABILITY_PLACEHOLDER: f64 = 75.0;

/// Lint integration is likewise pending; the lint factor of the quality
/// score gets full marks until then.
const LINT_FACTOR_PLACEHOLDER: f64 = 100.0;

/// Average complexity at which the maintainability complexity factor
/// bottoms out.
const MAINTAINABILITY_COMPLEXITY_CEILING: f64 = 20.0;

/// Parameters for a health history query.
#[derive(Debug, Clone)]
pub struct HealthRequest {
    pub capability_id: i64,
    pub repository_id: i64,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    /// Defaults to the configured history limit (30 days).
    pub limit: Option<u32>,
}

/// Trend summary over a health history window.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthTrendSummary {
    pub direction: HealthTrend,
    /// Latest score minus the most recent score at least 7 days older.
    pub delta_7d: f64,
    /// Latest score minus the most recent score at least 30 days older.
    pub delta_30d: f64,
    /// Mean absolute consecutive-day score delta; 0 with fewer than 3
    /// points.
    pub volatility: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSeverity {
    Warning,
    Critical,
}

/// A threshold breach in the most recent snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthAlert {
    pub metric: String,
    pub severity: AlertSeverity,
    pub message: String,
    pub value: f64,
    pub target: f64,
}

/// History, trend, and alerts for one capability.
#[derive(Debug, Clone)]
pub struct HealthReport {
    pub current: Option<CapabilityHealth>,
    /// Most recent first.
    pub history: Vec<CapabilityHealth>,
    pub trend: HealthTrendSummary,
    pub alerts: Vec<HealthAlert>,
}

/// Computes and persists capability health snapshots.
pub struct HealthScorer {
    symbols: Arc<dyn SymbolStore>,
    capabilities: Arc<dyn CapabilityStore>,
    config: HealthConfig,
    events: Arc<EventDispatcher>,
}

impl HealthScorer {
    pub fn new(
        symbols: Arc<dyn SymbolStore>,
        capabilities: Arc<dyn CapabilityStore>,
        config: HealthConfig,
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

    /// Compute today's health snapshot and upsert it. A capability with
    /// no linked symbols still gets a snapshot (zero counters).
    pub fn calculate_health(
        &self,
        capability_id: i64,
        repository_id: i64,
    ) -> Result<CapabilityHealth, CapabilityError> {
        if self.capabilities.get_capability(capability_id)?.is_none() {
            return Err(CapabilityError::CapabilityNotFound { capability_id });
        }

        let links = self.capabilities.list_links(&LinkFilter {
            capability_id: Some(capability_id),
            ..Default::default()
        })?;
        let test_linked: FxHashSet<i64> = links
            .iter()
            .filter(|l| l.link_type == LinkType::Tests)
            .map(|l| l.symbol_id)
            .collect();
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

        let symbol_count = symbols.len() as u32;
        let total_complexity: u64 = symbols.iter().map(|s| s.complexity as u64).sum();
        let max_complexity = symbols.iter().map(|s| s.complexity).max().unwrap_or(0);
        let total_lines: u64 = symbols.iter().map(|s| s.line_count as u64).sum();
        let avg_complexity = if symbol_count == 0 {
            0.0
        } else {
            total_complexity as f64 / symbol_count as f64
        };
        let documented = symbols.iter().filter(|s| s.is_documented()).count();
        let documentation_ratio = if symbol_count == 0 {
            0.0
        } else {
            documented as f64 / symbol_count as f64
        };

        let test_count = symbols.iter().filter(|s| test_linked.contains(&s.id)).count();
        let non_test_count = symbols.len() - test_count;
        let test_coverage = if non_test_count == 0 {
            if test_count > 0 {
                100.0
            } else {
                0.0
            }
        } else {
            (test_count as f64 / non_test_count as f64 * 100.0).min(100.0)
        };

        let complexity_score =
            complexity_score(avg_complexity, max_complexity as f64, &self.config);
        let quality_score = quality_score(test_coverage, documentation_ratio, &self.config);
        let stability_score = STABILITY_PLACEHOLDER;
        let maintainability_score =
            maintainability_score(avg_complexity, documentation_ratio, symbol_count);

        let overall_health_score = (complexity_score * self.config.effective_complexity_weight()
            + quality_score * self.config.effective_quality_weight()
            + stability_score * self.config.effective_stability_weight()
            + maintainability_score * self.config.effective_maintainability_weight())
        .clamp(0.0, 100.0);

        let date = day_of(unix_now());
        let previous = self
            .capabilities
            .latest_health_before(capability_id, repository_id, date)?;
        let trend_delta = previous
            .as_ref()
            .map(|p| overall_health_score - p.overall_health_score)
            .unwrap_or(0.0);
        let health_trend =
            classify_trend(trend_delta, self.config.effective_trend_delta_threshold());
        let health_status = classify_status(overall_health_score, &self.config);

        let health = CapabilityHealth {
            capability_id,
            repository_id,
            date,
            symbol_count,
            total_complexity,
            avg_complexity,
            max_complexity,
            total_lines,
            documentation_ratio,
            test_coverage,
            recent_commit_count: 0,
            last_commit_at: None,
            complexity_score,
            quality_score,
            stability_score,
            maintainability_score,
            overall_health_score,
            health_status,
            health_trend,
            trend_delta,
        };
        self.capabilities.upsert_health(&health)?;

        self.events.emit_health_computed(&HealthComputedEvent {
            capability_id,
            repository_id,
            overall_score: overall_health_score,
            status: health_status,
        });
        tracing::debug!(
            capability_id,
            repository_id,
            score = overall_health_score,
            status = health_status.as_str(),
            "health computed"
        );
        Ok(health)
    }

    /// History, trend, and alerts over the requested window.
    pub fn get_health(&self, request: &HealthRequest) -> Result<HealthReport, CapabilityError> {
        if self
            .capabilities
            .get_capability(request.capability_id)?
            .is_none()
        {
            return Err(CapabilityError::CapabilityNotFound {
                capability_id: request.capability_id,
            });
        }

        let limit = request
            .limit
            .unwrap_or(self.config.effective_history_limit());
        let history = self.capabilities.list_health(
            request.capability_id,
            request.repository_id,
            request.start_date,
            request.end_date,
            limit,
        )?;

        let current = history.first().cloned();
        let trend = summarize_trend(&history);
        let alerts = current
            .as_ref()
            .map(|h| collect_alerts(h, &self.config))
            .unwrap_or_default();

        Ok(HealthReport {
            current,
            history,
            trend,
            alerts,
        })
    }
}

/// 100 minus an average-complexity penalty and a max-complexity penalty.
/// Each penalty is the overshoot ratio scaled to 50 and capped there.
fn complexity_score(avg: f64, max: f64, config: &HealthConfig) -> f64 {
    let penalty = |value: f64, target: f64| -> f64 {
        if target <= 0.0 {
            return 0.0;
        }
        (((value - target) / target).max(0.0) * 50.0).min(50.0)
    };
    100.0
        - penalty(avg, config.effective_target_avg_complexity())
        - penalty(max, config.effective_target_max_complexity())
}

/// 40% test coverage vs target, 30% lint factor (placeholder full
/// marks), 30% documentation ratio vs target.
fn quality_score(coverage: f64, doc_ratio: f64, config: &HealthConfig) -> f64 {
    let coverage_factor =
        (coverage / config.effective_target_test_coverage() * 100.0).min(100.0);
    let doc_factor =
        (doc_ratio / config.effective_target_documentation_ratio() * 100.0).min(100.0);
    (0.4 * coverage_factor + 0.3 * LINT_FACTOR_PLACEHOLDER + 0.3 * doc_factor).min(100.0)
}

/// 40% complexity factor, 40% documentation ratio, 20% size factor.
fn maintainability_score(avg_complexity: f64, doc_ratio: f64, symbol_count: u32) -> f64 {
    let complexity_factor =
        (1.0 - avg_complexity / MAINTAINABILITY_COMPLEXITY_CEILING).max(0.0);
    let size_factor = if symbol_count <= 50 {
        1.0
    } else if symbol_count <= 100 {
        0.8
    } else {
        0.6
    };
    (complexity_factor * 0.4 + doc_ratio * 0.4 + size_factor * 0.2) * 100.0
}

/// Threshold classification; boundaries are inclusive.
fn classify_status(score: f64, config: &HealthConfig) -> HealthStatus {
    if score >= config.effective_healthy_threshold() {
        HealthStatus::Healthy
    } else if score >= config.effective_warning_threshold() {
        HealthStatus::Warning
    } else {
        HealthStatus::Critical
    }
}

fn classify_trend(delta: f64, threshold: f64) -> HealthTrend {
    if delta > threshold {
        HealthTrend::Improving
    } else if delta < -threshold {
        HealthTrend::Declining
    } else {
        HealthTrend::Stable
    }
}

/// Trend over a most-recent-first history window.
fn summarize_trend(history: &[CapabilityHealth]) -> HealthTrendSummary {
    let Some(latest) = history.first() else {
        return HealthTrendSummary {
            direction: HealthTrend::Stable,
            delta_7d: 0.0,
            delta_30d: 0.0,
            volatility: 0.0,
        };
    };

    let delta_vs = |days: i64| -> f64 {
        history
            .iter()
            .find(|h| h.date <= latest.date - days * SECONDS_PER_DAY)
            .map(|h| latest.overall_health_score - h.overall_health_score)
            .unwrap_or(0.0)
    };

    let volatility = if history.len() < 3 {
        0.0
    } else {
        let deltas: Vec<f64> = history
            .windows(2)
            .map(|w| (w[0].overall_health_score - w[1].overall_health_score).abs())
            .collect();
        deltas.iter().sum::<f64>() / deltas.len() as f64
    };

    HealthTrendSummary {
        direction: latest.health_trend,
        delta_7d: delta_vs(7),
        delta_30d: delta_vs(30),
        volatility,
    }
}

fn collect_alerts(health: &CapabilityHealth, config: &HealthConfig) -> Vec<HealthAlert> {
    let mut alerts = Vec::new();

    let target_avg = config.effective_target_avg_complexity();
    if health.avg_complexity > target_avg {
        alerts.push(HealthAlert {
            metric: "avg_complexity".to_string(),
            severity: AlertSeverity::Warning,
            message: format!(
                "average complexity {:.1} exceeds target {:.1}",
                health.avg_complexity, target_avg
            ),
            value: health.avg_complexity,
            target: target_avg,
        });
    }

    let target_coverage = config.effective_target_test_coverage();
    if health.test_coverage < target_coverage {
        let severity = if health.test_coverage < target_coverage / 2.0 {
            AlertSeverity::Critical
        } else {
            AlertSeverity::Warning
        };
        alerts.push(HealthAlert {
            metric: "test_coverage".to_string(),
            severity,
            message: format!(
                "test coverage {:.1}% below target {:.1}%",
                health.test_coverage, target_coverage
            ),
            value: health.test_coverage,
            target: target_coverage,
        });
    }

    let target_doc = config.effective_target_documentation_ratio();
    if health.documentation_ratio < target_doc {
        alerts.push(HealthAlert {
            metric: "documentation_ratio".to_string(),
            severity: AlertSeverity::Warning,
            message: format!(
                "documentation ratio {:.2} below target {:.2}",
                health.documentation_ratio, target_doc
            ),
            value: health.documentation_ratio,
            target: target_doc,
        });
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(date: i64, score: f64, trend: HealthTrend) -> CapabilityHealth {
        CapabilityHealth {
            capability_id: 1,
            repository_id: 1,
            date,
            symbol_count: 1,
            total_complexity: 1,
            avg_complexity: 1.0,
            max_complexity: 1,
            total_lines: 10,
            documentation_ratio: 1.0,
            test_coverage: 100.0,
            recent_commit_count: 0,
            last_commit_at: None,
            complexity_score: 100.0,
            quality_score: 100.0,
            stability_score: STABILITY_PLACEHOLDER,
            maintainability_score: 100.0,
            overall_health_score: score,
            health_status: HealthStatus::Healthy,
            health_trend: trend,
            trend_delta: 0.0,
        }
    }

    #[test]
    fn test_status_boundaries_are_inclusive() {
        let config = HealthConfig::default();
        assert_eq!(classify_status(70.0, &config), HealthStatus::Healthy);
        assert_eq!(classify_status(69.99, &config), HealthStatus::Warning);
        assert_eq!(classify_status(40.0, &config), HealthStatus::Warning);
        assert_eq!(classify_status(39.99, &config), HealthStatus::Critical);
        assert_eq!(classify_status(0.0, &config), HealthStatus::Critical);
        assert_eq!(classify_status(100.0, &config), HealthStatus::Healthy);
    }

    #[test]
    fn test_trend_classification() {
        assert_eq!(classify_trend(6.0, 5.0), HealthTrend::Improving);
        assert_eq!(classify_trend(-6.0, 5.0), HealthTrend::Declining);
        assert_eq!(classify_trend(0.0, 5.0), HealthTrend::Stable);
        assert_eq!(classify_trend(5.0, 5.0), HealthTrend::Stable);
        assert_eq!(classify_trend(-5.0, 5.0), HealthTrend::Stable);
    }

    #[test]
    fn test_complexity_score_at_targets() {
        let config = HealthConfig::default();
        assert_eq!(complexity_score(10.0, 25.0, &config), 100.0);
        assert_eq!(complexity_score(5.0, 10.0, &config), 100.0);
        // Double the average target costs the full 50-point avg penalty.
        assert_eq!(complexity_score(30.0, 10.0, &config), 50.0);
        // Both penalties saturated.
        assert_eq!(complexity_score(100.0, 200.0, &config), 0.0);
    }

    #[test]
    fn test_quality_score_reference_scenario() {
        // 10 symbols, 2 test-linked: coverage 2/8 = 25%, all documented.
        let config = HealthConfig::default();
        let score = quality_score(25.0, 1.0, &config);
        assert!((score - 72.5).abs() < 1e-9);
    }

    #[test]
    fn test_maintainability_reference_scenario() {
        let score = maintainability_score(5.0, 1.0, 10);
        assert!((score - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_maintainability_size_penalty() {
        let small = maintainability_score(0.0, 1.0, 50);
        let medium = maintainability_score(0.0, 1.0, 51);
        let large = maintainability_score(0.0, 1.0, 101);
        assert!(small > medium && medium > large);
    }

    #[test]
    fn test_summarize_trend_deltas() {
        let day = 20_000 * SECONDS_PER_DAY;
        let history = vec![
            snapshot(day, 80.0, HealthTrend::Improving),
            snapshot(day - 7 * SECONDS_PER_DAY, 70.0, HealthTrend::Stable),
            snapshot(day - 30 * SECONDS_PER_DAY, 60.0, HealthTrend::Stable),
        ];
        let trend = summarize_trend(&history);
        assert_eq!(trend.direction, HealthTrend::Improving);
        assert_eq!(trend.delta_7d, 10.0);
        assert_eq!(trend.delta_30d, 20.0);
        assert_eq!(trend.volatility, 10.0);
    }

    #[test]
    fn test_summarize_trend_empty_history() {
        let trend = summarize_trend(&[]);
        assert_eq!(trend.direction, HealthTrend::Stable);
        assert_eq!(trend.delta_7d, 0.0);
        assert_eq!(trend.volatility, 0.0);
    }

    #[test]
    fn test_alerts_on_threshold_breaches() {
        let config = HealthConfig::default();
        let mut health = snapshot(0, 50.0, HealthTrend::Stable);
        health.avg_complexity = 12.0;
        health.test_coverage = 30.0; // below half of the 80% target
        health.documentation_ratio = 0.5;

        let alerts = collect_alerts(&health, &config);
        assert_eq!(alerts.len(), 3);
        let coverage = alerts.iter().find(|a| a.metric == "test_coverage").unwrap();
        assert_eq!(coverage.severity, AlertSeverity::Critical);
    }
}

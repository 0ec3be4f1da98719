//! Daily capability health snapshots.

use serde::{Deserialize, Serialize};

/// Health classification derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "HEALTHY",
            HealthStatus::Warning => "WARNING",
            HealthStatus::Critical => "CRITICAL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "HEALTHY" => Some(HealthStatus::Healthy),
            "WARNING" => Some(HealthStatus::Warning),
            "CRITICAL" => Some(HealthStatus::Critical),
            _ => None,
        }
    }
}

/// Direction of score movement versus the most recent prior day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthTrend {
    Improving,
    Stable,
    Declining,
}

impl HealthTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthTrend::Improving => "IMPROVING",
            HealthTrend::Stable => "STABLE",
            HealthTrend::Declining => "DECLINING",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "IMPROVING" => Some(HealthTrend::Improving),
            "STABLE" => Some(HealthTrend::Stable),
            "DECLINING" => Some(HealthTrend::Declining),
            _ => None,
        }
    }
}

/// One health snapshot. At most one row per
/// `(capability_id, repository_id, date)`. Re-running the same day
/// overwrites rather than duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityHealth {
    pub capability_id: i64,
    pub repository_id: i64,
    /// Day-truncated unix timestamp.
    pub date: i64,

    // Raw counters.
    pub symbol_count: u32,
    pub total_complexity: u64,
    pub avg_complexity: f64,
    pub max_complexity: u32,
    pub total_lines: u64,
    /// documented / total, in [0, 1].
    pub documentation_ratio: f64,
    /// Simplified: test-linked / non-test-linked ratio as a percentage,
    /// capped at 100.
    pub test_coverage: f64,
    /// Churn placeholders, populated once git-history sync lands.
    pub recent_commit_count: u32,
    pub last_commit_at: Option<i64>,

    // Component scores, each 0-100.
    pub complexity_score: f64,
    pub quality_score: f64,
    pub stability_score: f64,
    pub maintainability_score: f64,

    // Derived, never set directly by callers.
    pub overall_health_score: f64,
    pub health_status: HealthStatus,
    pub health_trend: HealthTrend,
    /// Today's score minus the most recent prior day's score.
    pub trend_delta: f64,
}

//! Capability evolution events: immutable records tied to commits.

use serde::{Deserialize, Serialize};

/// What kind of change an evolution event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvolutionEventType {
    Created,
    Expanded,
    Refactored,
    ComplexitySpike,
    HealthImproved,
    HealthDeclined,
    SymbolsRemoved,
    Deprecated,
}

impl EvolutionEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvolutionEventType::Created => "CREATED",
            EvolutionEventType::Expanded => "EXPANDED",
            EvolutionEventType::Refactored => "REFACTORED",
            EvolutionEventType::ComplexitySpike => "COMPLEXITY_SPIKE",
            EvolutionEventType::HealthImproved => "HEALTH_IMPROVED",
            EvolutionEventType::HealthDeclined => "HEALTH_DECLINED",
            EvolutionEventType::SymbolsRemoved => "SYMBOLS_REMOVED",
            EvolutionEventType::Deprecated => "DEPRECATED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CREATED" => Some(EvolutionEventType::Created),
            "EXPANDED" => Some(EvolutionEventType::Expanded),
            "REFACTORED" => Some(EvolutionEventType::Refactored),
            "COMPLEXITY_SPIKE" => Some(EvolutionEventType::ComplexitySpike),
            "HEALTH_IMPROVED" => Some(EvolutionEventType::HealthImproved),
            "HEALTH_DECLINED" => Some(EvolutionEventType::HealthDeclined),
            "SYMBOLS_REMOVED" => Some(EvolutionEventType::SymbolsRemoved),
            "DEPRECATED" => Some(EvolutionEventType::Deprecated),
            _ => None,
        }
    }
}

/// Broad category of a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeCategory {
    Feature,
    Refactor,
    Bugfix,
    Cleanup,
    Architecture,
}

impl ChangeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeCategory::Feature => "FEATURE",
            ChangeCategory::Refactor => "REFACTOR",
            ChangeCategory::Bugfix => "BUGFIX",
            ChangeCategory::Cleanup => "CLEANUP",
            ChangeCategory::Architecture => "ARCHITECTURE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "FEATURE" => Some(ChangeCategory::Feature),
            "REFACTOR" => Some(ChangeCategory::Refactor),
            "BUGFIX" => Some(ChangeCategory::Bugfix),
            "CLEANUP" => Some(ChangeCategory::Cleanup),
            "ARCHITECTURE" => Some(ChangeCategory::Architecture),
            _ => None,
        }
    }
}

/// Severity classification of an evolution event.
///
/// Ordered: `Trivial < Minor < Moderate < Major < Critical`, so
/// minimum-significance filters compare directly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Significance {
    Trivial,
    Minor,
    Moderate,
    Major,
    Critical,
}

impl Significance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Significance::Trivial => "TRIVIAL",
            Significance::Minor => "MINOR",
            Significance::Moderate => "MODERATE",
            Significance::Major => "MAJOR",
            Significance::Critical => "CRITICAL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "TRIVIAL" => Some(Significance::Trivial),
            "MINOR" => Some(Significance::Minor),
            "MODERATE" => Some(Significance::Moderate),
            "MAJOR" => Some(Significance::Major),
            "CRITICAL" => Some(Significance::Critical),
            _ => None,
        }
    }
}

/// One recorded evolution event. Append-only; significance is derived
/// at record time, never supplied by callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityEvolution {
    pub id: i64,
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
    pub significance: Significance,
    pub summary: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub detected_at: i64,
}

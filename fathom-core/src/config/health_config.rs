//! Health scoring configuration: weights, thresholds, and targets.

use serde::{Deserialize, Serialize};

/// Configuration for capability health scoring.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HealthConfig {
    /// Overall-score weight of the complexity component. Default: 0.25.
    pub complexity_weight: Option<f64>,
    /// Overall-score weight of the quality component. Default: 0.30.
    pub quality_weight: Option<f64>,
    /// Overall-score weight of the stability component. Default: 0.25.
    pub stability_weight: Option<f64>,
    /// Overall-score weight of the maintainability component. Default: 0.20.
    pub maintainability_weight: Option<f64>,

    /// Score at or above which a capability is HEALTHY. Default: 70.
    pub healthy_threshold: Option<f64>,
    /// Score at or above which a capability is WARNING. Default: 40.
    pub warning_threshold: Option<f64>,

    /// Target average cyclomatic complexity. Default: 10.0.
    pub target_avg_complexity: Option<f64>,
    /// Target maximum cyclomatic complexity. Default: 25.0.
    pub target_max_complexity: Option<f64>,
    /// Target test coverage percentage. Default: 80.0.
    pub target_test_coverage: Option<f64>,
    /// Target documentation ratio in [0, 1]. Default: 0.8.
    pub target_documentation_ratio: Option<f64>,

    /// Absolute score delta beyond which the trend leaves STABLE.
    /// Default: 5.0.
    pub trend_delta_threshold: Option<f64>,
    /// Default history window for health queries. Default: 30.
    pub history_limit: Option<u32>,
}

impl HealthConfig {
    pub fn effective_complexity_weight(&self) -> f64 {
        self.complexity_weight.unwrap_or(0.25)
    }

    pub fn effective_quality_weight(&self) -> f64 {
        self.quality_weight.unwrap_or(0.30)
    }

    pub fn effective_stability_weight(&self) -> f64 {
        self.stability_weight.unwrap_or(0.25)
    }

    pub fn effective_maintainability_weight(&self) -> f64 {
        self.maintainability_weight.unwrap_or(0.20)
    }

    pub fn effective_healthy_threshold(&self) -> f64 {
        self.healthy_threshold.unwrap_or(70.0)
    }

    pub fn effective_warning_threshold(&self) -> f64 {
        self.warning_threshold.unwrap_or(40.0)
    }

    pub fn effective_target_avg_complexity(&self) -> f64 {
        self.target_avg_complexity.unwrap_or(10.0)
    }

    pub fn effective_target_max_complexity(&self) -> f64 {
        self.target_max_complexity.unwrap_or(25.0)
    }

    pub fn effective_target_test_coverage(&self) -> f64 {
        self.target_test_coverage.unwrap_or(80.0)
    }

    pub fn effective_target_documentation_ratio(&self) -> f64 {
        self.target_documentation_ratio.unwrap_or(0.8)
    }

    pub fn effective_trend_delta_threshold(&self) -> f64 {
        self.trend_delta_threshold.unwrap_or(5.0)
    }

    pub fn effective_history_limit(&self) -> u32 {
        self.history_limit.unwrap_or(30)
    }

    /// Sum of the four component weights. Validated to 1.0 ± epsilon.
    pub fn weight_sum(&self) -> f64 {
        self.effective_complexity_weight()
            + self.effective_quality_weight()
            + self.effective_stability_weight()
            + self.effective_maintainability_weight()
    }
}

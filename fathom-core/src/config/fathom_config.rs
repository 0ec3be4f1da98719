//! Top-level Fathom configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{EvolutionConfig, GraphConfig, HealthConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`FATHOM_*`)
/// 2. Project config (`fathom.toml` in project root)
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FathomConfig {
    pub graph: GraphConfig,
    pub health: HealthConfig,
    pub evolution: EvolutionConfig,
}

impl FathomConfig {
    /// Load configuration with layered resolution.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 2: project config
        let project_config_path = root.join("fathom.toml");
        if project_config_path.exists() {
            let text = std::fs::read_to_string(&project_config_path).map_err(|e| {
                ConfigError::ReadError {
                    path: project_config_path.display().to_string(),
                    message: e.to_string(),
                }
            })?;
            config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
                path: project_config_path.display().to_string(),
                message: e.to_string(),
            })?;
        }

        // Layer 1: environment variables
        Self::apply_env_overrides(&mut config);

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    fn apply_env_overrides(config: &mut Self) {
        if let Some(v) = env_parse::<u32>("FATHOM_GRAPH_MAX_DEPTH") {
            config.graph.max_depth = Some(v);
        }
        if let Some(v) = env_parse::<u64>("FATHOM_GRAPH_CACHE_TTL_SECS") {
            config.graph.cache_ttl_secs = Some(v);
        }
        if let Some(v) = env_parse::<f64>("FATHOM_HEALTH_HEALTHY_THRESHOLD") {
            config.health.healthy_threshold = Some(v);
        }
        if let Some(v) = env_parse::<f64>("FATHOM_HEALTH_WARNING_THRESHOLD") {
            config.health.warning_threshold = Some(v);
        }
        if let Some(v) = env_parse::<i64>("FATHOM_EVOLUTION_SPIKE_THRESHOLD") {
            config.evolution.complexity_spike_threshold = Some(v);
        }
    }

    fn validate(config: &Self) -> Result<(), ConfigError> {
        let weight_sum = config.health.weight_sum();
        if (weight_sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::InvalidValue {
                field: "health weights".to_string(),
                message: format!("component weights must sum to 1.0, got {weight_sum}"),
            });
        }

        let healthy = config.health.effective_healthy_threshold();
        let warning = config.health.effective_warning_threshold();
        if warning >= healthy {
            return Err(ConfigError::InvalidValue {
                field: "health thresholds".to_string(),
                message: format!(
                    "warning threshold ({warning}) must be below healthy threshold ({healthy})"
                ),
            });
        }

        if config.graph.effective_max_depth() == 0 {
            return Err(ConfigError::InvalidValue {
                field: "graph.max_depth".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = FathomConfig::default();
        assert!(FathomConfig::validate(&config).is_ok());
        assert_eq!(config.graph.effective_max_depth(), 3);
        assert_eq!(config.health.effective_healthy_threshold(), 70.0);
        assert_eq!(config.evolution.effective_complexity_spike_threshold(), 50);
    }

    #[test]
    fn test_from_toml_overrides() {
        let config = FathomConfig::from_toml(
            r#"
            [graph]
            max_depth = 5
            cache_ttl_secs = 60

            [health]
            healthy_threshold = 80.0
            "#,
        )
        .unwrap();
        assert_eq!(config.graph.effective_max_depth(), 5);
        assert_eq!(config.graph.effective_cache_ttl_secs(), 60);
        assert_eq!(config.health.effective_healthy_threshold(), 80.0);
        // Unspecified fields keep compiled defaults.
        assert_eq!(config.health.effective_warning_threshold(), 40.0);
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let result = FathomConfig::from_toml(
            r#"
            [health]
            complexity_weight = 0.5
            quality_weight = 0.5
            stability_weight = 0.5
            maintainability_weight = 0.5
            "#,
        );
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let result = FathomConfig::from_toml(
            r#"
            [health]
            healthy_threshold = 40.0
            warning_threshold = 70.0
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_without_project_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = FathomConfig::load(dir.path()).unwrap();
        assert_eq!(config.graph.effective_max_depth(), 3);
    }
}

//! Configuration system for Fathom.
//! TOML-based, layered resolution: env > project > defaults.

pub mod evolution_config;
pub mod fathom_config;
pub mod graph_config;
pub mod health_config;

pub use evolution_config::EvolutionConfig;
pub use fathom_config::FathomConfig;
pub use graph_config::GraphConfig;
pub use health_config::HealthConfig;

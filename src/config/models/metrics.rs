//! Metrics collection configuration

use serde::{Deserialize, Serialize};

/// Live metrics sampling and fleet aggregation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Sample live metrics and run the aggregator
    #[serde(default)]
    pub enabled: bool,
    /// Aggregation cycle in seconds
    #[serde(default = "default_metrics_interval")]
    pub interval_secs: u64,
    /// Error rate above which a component needs attention
    #[serde(default = "default_error_rate_threshold")]
    pub error_rate_threshold: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: default_metrics_interval(),
            error_rate_threshold: default_error_rate_threshold(),
        }
    }
}

fn default_metrics_interval() -> u64 {
    60
}

fn default_error_rate_threshold() -> f64 {
    0.1
}

//! Configuration management for the heartbeat monitor
//!
//! This module handles loading, validation, and management of all monitor configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{MonitorError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the heartbeat monitor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Registry endpoint
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Heartbeat scheduling
    #[serde(default)]
    pub monitor: MonitorConfig,
    /// Live metrics and fleet aggregation
    #[serde(default)]
    pub metrics: MetricsConfig,
    /// Auto-recovery limits
    #[serde(default)]
    pub recovery: RecoveryConfig,
    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Components registered at start-up
    #[serde(default)]
    pub components: Vec<ComponentConfig>,
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| MonitorError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml(&content)?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| MonitorError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from defaults overridden by `HEARTBEAT_*` variables
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("HEARTBEAT_REGISTRY_URL") {
            config.registry.base_url = url;
        }
        if let Some(v) = lookup("HEARTBEAT_REQUEST_TIMEOUT") {
            config.registry.request_timeout_secs = parse_var("HEARTBEAT_REQUEST_TIMEOUT", &v)?;
        }
        if let Some(v) = lookup("HEARTBEAT_DEFAULT_INTERVAL") {
            config.monitor.default_interval_secs = parse_var("HEARTBEAT_DEFAULT_INTERVAL", &v)?;
        }
        if let Some(v) = lookup("HEARTBEAT_RETRY_INTERVAL") {
            config.monitor.retry_interval_secs = parse_var("HEARTBEAT_RETRY_INTERVAL", &v)?;
        }
        if let Some(v) = lookup("HEARTBEAT_MAX_RETRIES") {
            config.monitor.max_retries = parse_var("HEARTBEAT_MAX_RETRIES", &v)?;
        }
        if let Some(v) = lookup("HEARTBEAT_STAGGER") {
            config.monitor.stagger_enabled = parse_var("HEARTBEAT_STAGGER", &v)?;
        }
        if let Some(v) = lookup("HEARTBEAT_METRICS_ENABLED") {
            config.metrics.enabled = parse_var("HEARTBEAT_METRICS_ENABLED", &v)?;
        }
        if let Some(v) = lookup("HEARTBEAT_METRICS_INTERVAL") {
            config.metrics.interval_secs = parse_var("HEARTBEAT_METRICS_INTERVAL", &v)?;
        }
        if let Some(level) = lookup("HEARTBEAT_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(v) = lookup("HEARTBEAT_LOG_JSON") {
            config.logging.json = parse_var("HEARTBEAT_LOG_JSON", &v)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.registry
            .validate()
            .map_err(|e| MonitorError::Config(format!("Registry config error: {}", e)))?;
        self.monitor
            .validate()
            .map_err(|e| MonitorError::Config(format!("Monitor config error: {}", e)))?;
        self.metrics
            .validate()
            .map_err(|e| MonitorError::Config(format!("Metrics config error: {}", e)))?;
        self.recovery
            .validate()
            .map_err(|e| MonitorError::Config(format!("Recovery config error: {}", e)))?;
        for component in &self.components {
            component
                .validate()
                .map_err(|e| MonitorError::Config(format!("Component config error: {}", e)))?;
        }

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| MonitorError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| MonitorError::Config(format!("Invalid {}: {}", key, e)))
}

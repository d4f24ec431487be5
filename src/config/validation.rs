//! Configuration validation
//!
//! This module provides validation logic for all configuration structures.

use super::models::*;
use url::Url;

/// Validation trait for configuration structures
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl Validate for RegistryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("Registry base_url cannot be empty".to_string());
        }
        let url = Url::parse(&self.base_url)
            .map_err(|e| format!("Registry base_url is not a valid URL: {}", e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "Registry base_url must use http:// or https://, got: {}",
                url.scheme()
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err("Registry request_timeout_secs must be greater than 0".to_string());
        }
        if self.health_timeout_secs == 0 {
            return Err("Registry health_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Validate for MonitorConfig {
    fn validate(&self) -> Result<(), String> {
        if self.min_interval_secs == 0 {
            return Err("Monitor min_interval_secs must be greater than 0".to_string());
        }
        if self.failure_threshold == 0 {
            return Err("Monitor failure_threshold must be greater than 0".to_string());
        }
        if !self.backoff_cap_multiplier.is_finite() || self.backoff_cap_multiplier < 1.0 {
            return Err("Monitor backoff_cap_multiplier must be at least 1.0".to_string());
        }
        Ok(())
    }
}

impl Validate for MetricsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.interval_secs == 0 {
            return Err("Metrics interval_secs must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.error_rate_threshold) {
            return Err("Metrics error_rate_threshold must be between 0.0 and 1.0".to_string());
        }
        Ok(())
    }
}

impl Validate for RecoveryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("Recovery max_attempts must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Validate for ComponentConfig {
    fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("Component id cannot be empty".to_string());
        }
        Ok(())
    }
}

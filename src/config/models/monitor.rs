//! Heartbeat scheduling configuration

use crate::monitoring::ComponentType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Heartbeat cadence, retry and backoff settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Global default heartbeat interval in seconds
    #[serde(default = "default_interval")]
    pub default_interval_secs: u64,
    /// Lower bound on the sleep after a failed heartbeat, in seconds
    #[serde(default = "default_retry_interval")]
    pub retry_interval_secs: u64,
    /// Consecutive failures tolerated before a scheduler gives up; negative is unlimited
    #[serde(default = "default_max_retries")]
    pub max_retries: i64,
    /// Spread first heartbeats over one interval
    #[serde(default = "super::default_true")]
    pub stagger_enabled: bool,
    /// Smallest interval any component may use, in seconds
    #[serde(default = "default_min_interval")]
    pub min_interval_secs: u64,
    /// Consecutive failures that trigger a reconnection
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,
    /// Backoff never exceeds this multiple of the base interval
    #[serde(default = "default_backoff_cap")]
    pub backoff_cap_multiplier: f64,
    /// Per-type interval overrides in seconds
    #[serde(default)]
    pub type_intervals: HashMap<ComponentType, u64>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            default_interval_secs: default_interval(),
            retry_interval_secs: default_retry_interval(),
            max_retries: default_max_retries(),
            stagger_enabled: true,
            min_interval_secs: default_min_interval(),
            failure_threshold: default_failure_threshold(),
            backoff_cap_multiplier: default_backoff_cap(),
            type_intervals: HashMap::new(),
        }
    }
}

fn default_interval() -> u64 {
    30
}

fn default_retry_interval() -> u64 {
    5
}

fn default_max_retries() -> i64 {
    -1
}

fn default_min_interval() -> u64 {
    1
}

fn default_failure_threshold() -> u32 {
    3
}

fn default_backoff_cap() -> f64 {
    4.0
}

//! Heartbeat interval resolution, staggering and failure backoff

use crate::config::MonitorConfig;
use crate::monitoring::types::ComponentType;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::time::Duration;

/// Resolves the interval a component actually heartbeats at
///
/// Precedence: per-component override, then the type table, then the
/// global default. The result is never below `min_interval_secs`.
#[derive(Debug, Clone)]
pub struct IntervalPolicy {
    default_secs: u64,
    min_secs: u64,
    retry_secs: u64,
    backoff_cap: f64,
    type_table: HashMap<ComponentType, u64>,
}

impl IntervalPolicy {
    /// Build the policy, layering configured type intervals over the built-in table
    pub fn new(config: &MonitorConfig) -> Self {
        let mut type_table: HashMap<ComponentType, u64> = [
            ComponentType::Database,
            ComponentType::Api,
            ComponentType::Worker,
            ComponentType::Ui,
            ComponentType::Service,
        ]
        .into_iter()
        .filter_map(|t| t.default_interval_secs().map(|secs| (t, secs)))
        .collect();
        type_table.extend(config.type_intervals.iter().map(|(t, s)| (t.clone(), *s)));

        let min_secs = config.min_interval_secs.max(1);
        Self {
            default_secs: config.default_interval_secs,
            min_secs,
            retry_secs: config.retry_interval_secs,
            backoff_cap: config.backoff_cap_multiplier.max(1.0),
            type_table,
        }
    }

    /// Smallest interval any component may use
    pub fn floor_secs(&self) -> u64 {
        self.min_secs
    }

    /// Global default interval, clamped to the floor
    pub fn default_interval(&self) -> Duration {
        Duration::from_secs(self.default_secs.max(self.min_secs))
    }

    /// Clamp a requested interval to the floor
    pub fn clamp(&self, seconds: i64) -> u64 {
        u64::try_from(seconds).unwrap_or(0).max(self.min_secs)
    }

    /// Effective interval for one component
    pub fn resolve(&self, override_secs: Option<u64>, component_type: &ComponentType) -> Duration {
        let secs = override_secs
            .or_else(|| self.type_table.get(component_type).copied())
            .unwrap_or(self.default_secs);
        Duration::from_secs(secs.max(self.min_secs))
    }

    /// Sleep after `consecutive_failures` failed heartbeats
    ///
    /// `base * (1 + 0.5 * failures)`, raised to the retry interval, then
    /// capped at `base * backoff_cap`. The cap always wins.
    pub fn backoff(&self, base: Duration, consecutive_failures: u32) -> Duration {
        let factor = 1.0 + 0.5 * f64::from(consecutive_failures);
        base.mul_f64(factor)
            .max(Duration::from_secs(self.retry_secs))
            .min(base.mul_f64(self.backoff_cap))
    }
}

/// Deterministic delay in `[0, interval)` derived from the component id
pub fn stagger_delay(component_id: &str, interval: Duration) -> Duration {
    let millis = interval.as_millis() as u64;
    if millis == 0 {
        return Duration::ZERO;
    }

    let digest = Sha256::digest(component_id.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    Duration::from_millis(u64::from_be_bytes(prefix) % millis)
}

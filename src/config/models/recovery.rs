//! Auto-recovery configuration

use crate::monitoring::ComponentType;
use serde::{Deserialize, Serialize};

/// Limits on automatic re-registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// Recovery attempts allowed per component
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Minimum time between two recoveries of one component, in seconds
    #[serde(default = "default_cooldown")]
    pub cooldown_secs: u64,
    /// Delay between components during a bulk reconnect, in milliseconds
    #[serde(default = "default_pacing")]
    pub reconnect_pacing_millis: u64,
    /// Types the aggregator may recover without an operator
    #[serde(default = "default_auto_recover_types")]
    pub auto_recover_types: Vec<ComponentType>,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            cooldown_secs: default_cooldown(),
            reconnect_pacing_millis: default_pacing(),
            auto_recover_types: default_auto_recover_types(),
        }
    }
}

fn default_max_attempts() -> u32 {
    5
}

fn default_cooldown() -> u64 {
    300
}

fn default_pacing() -> u64 {
    500
}

fn default_auto_recover_types() -> Vec<ComponentType> {
    vec![
        ComponentType::Api,
        ComponentType::Worker,
        ComponentType::Service,
    ]
}

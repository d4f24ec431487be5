//! Monitoring types and data structures

use crate::utils::error::{FailureKind, MonitorError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a monitored component
///
/// Drives the type-based default heartbeat interval and auto-recovery
/// eligibility. Unrecognised tags are kept verbatim in [`ComponentType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentType {
    /// Stateful storage component
    Database,
    /// Stateless request/response service
    Api,
    /// Background job runner
    Worker,
    /// User-facing front end
    Ui,
    /// Generic long-running service
    Service,
    /// Any other tag
    Other(String),
}

impl ComponentType {
    /// Tag as sent on the wire
    pub fn as_str(&self) -> &str {
        match self {
            ComponentType::Database => "database",
            ComponentType::Api => "api",
            ComponentType::Worker => "worker",
            ComponentType::Ui => "ui",
            ComponentType::Service => "service",
            ComponentType::Other(tag) => tag,
        }
    }

    /// Built-in heartbeat cadence for this type, in seconds
    ///
    /// Presence-style components ping often, stateful ones less often.
    /// `None` means the global default applies.
    pub fn default_interval_secs(&self) -> Option<u64> {
        match self {
            ComponentType::Ui => Some(15),
            ComponentType::Api | ComponentType::Worker | ComponentType::Service => Some(30),
            ComponentType::Database => Some(60),
            ComponentType::Other(_) => None,
        }
    }
}

impl From<&str> for ComponentType {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "database" | "db" => ComponentType::Database,
            "api" => ComponentType::Api,
            "worker" => ComponentType::Worker,
            "ui" => ComponentType::Ui,
            "service" => ComponentType::Service,
            other => ComponentType::Other(other.to_string()),
        }
    }
}

impl From<String> for ComponentType {
    fn from(value: String) -> Self {
        ComponentType::from(value.as_str())
    }
}

impl From<ComponentType> for String {
    fn from(value: ComponentType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a component
///
/// Informational only: heartbeats are sent in every state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentState {
    #[default]
    Healthy,
    Degraded,
    Error,
    Failed,
}

impl ComponentState {
    /// States the metrics aggregator treats as candidates for auto-recovery
    pub fn is_unhealthy(&self) -> bool {
        matches!(
            self,
            ComponentState::Degraded | ComponentState::Error | ComponentState::Failed
        )
    }
}

impl fmt::Display for ComponentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComponentState::Healthy => "healthy",
            ComponentState::Degraded => "degraded",
            ComponentState::Error => "error",
            ComponentState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Live resource sample for one component
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveMetrics {
    /// CPU usage percentage
    pub cpu_percent: f64,
    /// Resident memory in megabytes
    pub memory_mb: f64,
    /// Heartbeat round-trip latency in milliseconds
    pub latency_ms: f64,
    /// Fraction of failed heartbeats, 0.0..=1.0
    pub error_rate: f64,
}

/// Per-component health record
///
/// Written by the component's own heartbeat scheduler, except for
/// `recovery_attempts` and `last_recovery_at` which belong to the recovery
/// coordinator.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealthMetrics {
    /// Component identifier
    pub component_id: String,
    /// Current lifecycle state
    pub state: ComponentState,
    /// Last heartbeat sequence number handed out
    pub sequence: u64,
    /// Round-trip latency of the last successful heartbeat
    pub last_latency_ms: Option<f64>,
    /// Last heartbeat error message
    pub last_error: Option<String>,
    /// Class of the last heartbeat error
    pub last_error_kind: Option<FailureKind>,
    /// When the last heartbeat error happened
    pub last_error_at: Option<DateTime<Utc>>,
    /// When the last heartbeat succeeded
    pub last_success_at: Option<DateTime<Utc>>,
    /// Failures since the last success
    pub consecutive_failures: u32,
    /// Lifetime successful heartbeats
    pub total_successes: u64,
    /// Lifetime failed heartbeats
    pub total_failures: u64,
    /// Auto-recovery attempts made so far
    pub recovery_attempts: u32,
    /// When the last auto-recovery was attempted
    pub last_recovery_at: Option<DateTime<Utc>>,
    /// Latest live sample, when metrics collection is enabled
    pub live_metrics: Option<LiveMetrics>,
}

impl ComponentHealthMetrics {
    /// Fresh record for a newly registered component
    pub fn new(component_id: impl Into<String>) -> Self {
        Self {
            component_id: component_id.into(),
            state: ComponentState::Healthy,
            sequence: 0,
            last_latency_ms: None,
            last_error: None,
            last_error_kind: None,
            last_error_at: None,
            last_success_at: None,
            consecutive_failures: 0,
            total_successes: 0,
            total_failures: 0,
            recovery_attempts: 0,
            last_recovery_at: None,
            live_metrics: None,
        }
    }

    /// Reserve the next heartbeat sequence number
    pub fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }

    /// Record a successful heartbeat
    pub fn record_success(&mut self, latency_ms: f64) {
        self.last_latency_ms = Some(latency_ms);
        self.last_success_at = Some(Utc::now());
        self.consecutive_failures = 0;
        self.total_successes += 1;
        if matches!(self.state, ComponentState::Degraded | ComponentState::Error) {
            self.state = ComponentState::Healthy;
        }
    }

    /// Record a failed heartbeat, returning the consecutive failure count
    pub fn record_failure(&mut self, error: &MonitorError, threshold: u32) -> u32 {
        self.last_error = Some(error.to_string());
        self.last_error_kind = Some(error.kind());
        self.last_error_at = Some(Utc::now());
        self.consecutive_failures += 1;
        self.total_failures += 1;

        if self.state != ComponentState::Failed {
            self.state = if self.consecutive_failures >= threshold {
                ComponentState::Error
            } else {
                ComponentState::Degraded
            };
        }
        self.consecutive_failures
    }

    /// Fraction of heartbeats that failed over the component's lifetime
    pub fn heartbeat_error_rate(&self) -> f64 {
        let total = self.total_successes + self.total_failures;
        if total == 0 {
            0.0
        } else {
            self.total_failures as f64 / total as f64
        }
    }
}

/// Registration metadata embedded in every heartbeat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartbeatMetadata {
    pub component_type: ComponentType,
    pub version: String,
    pub uptime_seconds: u64,
    pub interval_seconds: u64,
}

/// Body of `POST /registration/heartbeat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartbeatPayload {
    pub component_id: String,
    pub component_type: ComponentType,
    pub instance_id: String,
    pub sequence: u64,
    pub state: ComponentState,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_metrics: Option<LiveMetrics>,
    pub metadata: HeartbeatMetadata,
}

/// Component flagged by the metrics aggregator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttentionItem {
    pub component_id: String,
    pub reason: String,
}

/// Fleet-wide health view computed on each aggregation cycle
#[derive(Debug, Clone, Serialize)]
pub struct FleetSnapshot {
    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,
    /// Number of registered components
    pub total_components: usize,
    pub avg_cpu_percent: f64,
    pub avg_memory_mb: f64,
    pub avg_latency_ms: f64,
    pub avg_error_rate: f64,
    /// Components that crossed a health threshold
    pub needs_attention: Vec<AttentionItem>,
}

/// Heartbeat view of one component
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHeartbeatStatus {
    pub component_id: String,
    pub component_type: ComponentType,
    pub state: ComponentState,
    pub sequence: u64,
    pub consecutive_failures: u32,
    pub last_latency_ms: Option<f64>,
    pub last_error: Option<String>,
    pub last_success_at: Option<DateTime<Utc>>,
    pub interval_seconds: u64,
    /// Whether a scheduler task is currently servicing this component
    pub scheduler_active: bool,
}

/// Heartbeat view of the whole fleet
#[derive(Debug, Clone, Serialize)]
pub struct HeartbeatStatusReport {
    pub running: bool,
    pub components: Vec<ComponentHeartbeatStatus>,
    pub healthy_count: usize,
    pub unhealthy_count: usize,
}

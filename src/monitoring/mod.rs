//! Component heartbeat monitoring
//!
//! Registered components are kept alive in the central registry by one
//! heartbeat scheduler each. An availability prober watches the registry
//! itself, and an optional metrics aggregator summarises fleet health and
//! triggers auto-recovery.

pub mod metrics;
pub mod registration;

mod client;
mod heartbeat;
mod interval;
mod monitor;
mod prober;
mod recovery;
mod store;
mod types;

pub use client::RegistryClient;
pub use interval::{IntervalPolicy, stagger_delay};
pub use metrics::{MetricsAggregator, MetricsSource, SystemMetricsSource};
pub use monitor::HeartbeatMonitor;
pub use prober::AvailabilityProber;
pub use recovery::RecoveryCoordinator;
pub use registration::{ComponentRegistration, HttpRegistrar, Registrar};
pub use types::{
    AttentionItem, ComponentHealthMetrics, ComponentHeartbeatStatus, ComponentState,
    ComponentType, FleetSnapshot, HeartbeatMetadata, HeartbeatPayload, HeartbeatStatusReport,
    LiveMetrics,
};

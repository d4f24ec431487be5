//! # heartbeat-rs
//!
//! Keeps a fleet of components registered with a central registry by sending
//! periodic heartbeats on their behalf.
//!
//! ## Features
//!
//! - **Per-component scheduling**: Each component heartbeats at its own interval
//! - **Failure backoff**: Capped multiplicative backoff while the registry keeps failing
//! - **Self-healing**: Re-registration after repeated failures or a registry outage
//! - **Fleet metrics**: Optional aggregation with auto-recovery of eligible components
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use heartbeat_rs::{ComponentRegistration, Config, HeartbeatMonitor, HttpRegistrar};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/heartbeat.yaml").await?;
//!     let registrar = Arc::new(HttpRegistrar::new(
//!         config.registry.base_url.clone(),
//!         Duration::from_secs(config.registry.request_timeout_secs),
//!     )?);
//!
//!     let monitor = HeartbeatMonitor::new(&config)?;
//!     let api = ComponentRegistration::new("orders-api", "api", "1.4.2", registrar);
//!     api.register().await?;
//!     monitor.register_component(api).await;
//!     monitor.start().await;
//!
//!     tokio::signal::ctrl_c().await?;
//!     monitor.stop().await;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod monitoring;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use monitoring::{
    ComponentHealthMetrics, ComponentRegistration, ComponentState, ComponentType, FleetSnapshot,
    HeartbeatMonitor, HeartbeatStatusReport, HttpRegistrar, LiveMetrics, MetricsSource,
    Registrar,
};
pub use utils::error::{FailureKind, MonitorError, Result};
pub use utils::logging::init_logging;

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Printed by `--version`; `-V` prints the bare crate version
pub const LONG_VERSION: &str =
    concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

/// What went into this build of the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    /// Short commit hash, `unknown` outside a git checkout
    pub git_hash: &'static str,
    /// Unix seconds
    pub build_time: &'static str,
    pub rust_version: &'static str,
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "v{} ({}, built at {} with {})",
            self.version, self.git_hash, self.build_time, self.rust_version
        )
    }
}

/// Build information stamped in by the build script
pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: VERSION,
        git_hash: env!("GIT_HASH"),
        build_time: env!("BUILD_TIME"),
        rust_version: env!("RUST_VERSION"),
    }
}

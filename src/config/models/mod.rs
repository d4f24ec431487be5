//! Configuration data models
//!
//! This module defines all configuration structures used by the monitor.

#![allow(missing_docs)]

pub mod component;
pub mod logging;
pub mod metrics;
pub mod monitor;
pub mod recovery;
pub mod registry;

// Re-export all configuration types
pub use component::*;
pub use logging::*;
pub use metrics::*;
pub use monitor::*;
pub use recovery::*;
pub use registry::*;

fn default_true() -> bool {
    true
}

//! Utility modules for the heartbeat monitor
//!
//! - **error**: Error types and failure classification
//! - **logging**: Tracing subscriber setup

pub mod error;
pub mod logging;

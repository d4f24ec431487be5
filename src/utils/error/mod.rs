//! Error handling for the heartbeat monitor
//!
//! This module defines all error types used throughout the crate.

#![allow(missing_docs)]

mod helpers;
mod types;

pub use types::{FailureKind, MonitorError, Result};

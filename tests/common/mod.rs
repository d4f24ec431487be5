//! Common test utilities for heartbeat-rs
//!
//! # Usage
//!
//! ```rust
//! use crate::common::{MockRegistry, RecordingRegistrar, fixtures};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let registry = MockRegistry::healthy().await;
//!     let config = fixtures::fast_config(&registry.uri());
//!     // ...
//! }
//! ```

pub mod assertions;
pub mod fixtures;
pub mod registry;

pub use fixtures::RecordingRegistrar;
pub use registry::MockRegistry;

use std::time::Duration;

/// Poll `condition` every 50ms until it holds or `timeout` elapses
pub async fn wait_until<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

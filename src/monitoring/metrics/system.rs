//! Host resource sampling using sysinfo crate
//!
//! These functions provide real system monitoring when the metrics feature is enabled

#[cfg(feature = "metrics")]
use once_cell::sync::Lazy;
#[cfg(feature = "metrics")]
use sysinfo::System;

#[cfg(feature = "metrics")]
static SYSTEM: Lazy<parking_lot::Mutex<System>> =
    Lazy::new(|| parking_lot::Mutex::new(System::new_all()));

#[cfg(feature = "metrics")]
pub(super) fn get_cpu_usage() -> f64 {
    let mut sys = SYSTEM.lock();
    sys.refresh_cpu_usage();
    sys.global_cpu_usage() as f64
}

#[cfg(not(feature = "metrics"))]
pub(super) fn get_cpu_usage() -> f64 {
    0.0
}

/// Used memory in megabytes
#[cfg(feature = "metrics")]
pub(super) fn get_memory_usage_mb() -> f64 {
    let mut sys = SYSTEM.lock();
    sys.refresh_memory();
    sys.used_memory() as f64 / (1024.0 * 1024.0)
}

#[cfg(not(feature = "metrics"))]
pub(super) fn get_memory_usage_mb() -> f64 {
    0.0
}

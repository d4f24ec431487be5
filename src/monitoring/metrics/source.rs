//! Live metrics sources

use super::system::{get_cpu_usage, get_memory_usage_mb};
use crate::monitoring::registration::ComponentRegistration;
use crate::monitoring::types::{ComponentHealthMetrics, LiveMetrics};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Samples resource, latency and error data for one component
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn sample(
        &self,
        registration: &ComponentRegistration,
        health: &ComponentHealthMetrics,
    ) -> Result<LiveMetrics>;
}

/// Host cpu/memory plus heartbeat latency and error rate from the health record
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemMetricsSource;

#[async_trait]
impl MetricsSource for SystemMetricsSource {
    async fn sample(
        &self,
        _registration: &ComponentRegistration,
        health: &ComponentHealthMetrics,
    ) -> Result<LiveMetrics> {
        Ok(LiveMetrics {
            cpu_percent: get_cpu_usage(),
            memory_mb: get_memory_usage_mb(),
            latency_ms: health.last_latency_ms.unwrap_or(0.0),
            error_rate: health.heartbeat_error_rate(),
        })
    }
}

//! Per-component heartbeat scheduling
//!
//! One scheduler task runs per registered component. It posts heartbeats at
//! the component's effective interval, backs off while the registry keeps
//! failing, and asks the recovery coordinator to reconnect the component once
//! the failure threshold is crossed.

use super::client::RegistryClient;
use super::interval::{IntervalPolicy, stagger_delay};
use super::metrics::MetricsSource;
use super::recovery::RecoveryCoordinator;
use super::registration::ComponentRegistration;
use super::store::ComponentStore;
use super::types::{ComponentState, HeartbeatMetadata, HeartbeatPayload, LiveMetrics};
use crate::utils::error::{MonitorError, Result};
use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Everything a scheduler task needs, shared across all of them
#[derive(Clone)]
pub(crate) struct SchedulerContext {
    pub store: Arc<ComponentStore>,
    pub client: Arc<RegistryClient>,
    pub coordinator: Arc<RecoveryCoordinator>,
    pub policy: Arc<IntervalPolicy>,
    pub metrics_source: Option<Arc<dyn MetricsSource>>,
    pub running: Arc<AtomicBool>,
    pub stagger: bool,
    pub failure_threshold: u32,
    pub max_retries: i64,
}

impl SchedulerContext {
    /// Effective interval for a component, `None` once it is unregistered
    pub fn effective_interval(&self, component_id: &str) -> Option<Duration> {
        let registration = self.store.registrations.get(component_id)?;
        let override_secs = self
            .store
            .interval_overrides
            .get(component_id)
            .map(|entry| *entry.value())
            .or(registration.heartbeat_interval);
        Some(self.policy.resolve(override_secs, &registration.component_type))
    }
}

/// Heartbeat loop for exactly one component
pub(crate) struct HeartbeatScheduler {
    ctx: SchedulerContext,
    component_id: String,
}

impl HeartbeatScheduler {
    pub fn new(ctx: SchedulerContext, component_id: impl Into<String>) -> Self {
        Self {
            ctx,
            component_id: component_id.into(),
        }
    }

    /// Run until the monitor stops, the component goes away, or retries run out
    pub async fn run(self) {
        let id = self.component_id.as_str();

        if self.ctx.stagger {
            if let Some(interval) = self.ctx.effective_interval(id) {
                let delay = stagger_delay(id, interval);
                debug!("Staggering first heartbeat of {} by {:?}", id, delay);
                tokio::time::sleep(delay).await;
            }
        }

        let mut consecutive_failures: u32 = 0;
        while self.ctx.running.load(Ordering::Acquire) {
            let Some(registration) = self.ctx.store.registration(id) else {
                break;
            };
            let Some(interval) = self.ctx.effective_interval(id) else {
                break;
            };

            let pause = match self.beat(&registration, interval).await {
                Ok(latency) => {
                    consecutive_failures = 0;
                    let latency_ms = latency.as_secs_f64() * 1000.0;
                    self.ctx
                        .store
                        .update_health(id, |h| h.record_success(latency_ms));
                    interval
                }
                Err(e) => {
                    let threshold = self.ctx.failure_threshold;
                    consecutive_failures = self
                        .ctx
                        .store
                        .update_health(id, |h| h.record_failure(&e, threshold))
                        .unwrap_or(consecutive_failures + 1);

                    if consecutive_failures == threshold {
                        error!(
                            "Heartbeat for {} failed {} times in a row ({}), reconnecting component",
                            id, consecutive_failures, e
                        );
                        let reconnected = self.ctx.coordinator.reconnect_component(id).await;
                        if reconnected {
                            info!("Reconnection of {} succeeded", id);
                        }
                    } else {
                        warn!(
                            "Heartbeat for {} failed ({} consecutive): {}",
                            id, consecutive_failures, e
                        );
                    }

                    if self.retries_exhausted(consecutive_failures) {
                        error!(
                            "Giving up heartbeats for {} after {} consecutive failures",
                            id, consecutive_failures
                        );
                        self.ctx
                            .store
                            .update_health(id, |h| h.state = ComponentState::Failed);
                        break;
                    }

                    self.ctx.policy.backoff(interval, consecutive_failures)
                }
            };

            tokio::time::sleep(pause).await;
        }

        debug!("Heartbeat scheduler for {} finished", id);
    }

    fn retries_exhausted(&self, consecutive_failures: u32) -> bool {
        self.ctx.max_retries >= 0 && i64::from(consecutive_failures) > self.ctx.max_retries
    }

    /// Build and send one heartbeat
    async fn beat(
        &self,
        registration: &ComponentRegistration,
        interval: Duration,
    ) -> Result<Duration> {
        let id = self.component_id.as_str();
        let metrics = self.sample_metrics(registration).await;

        let (sequence, state) = self
            .ctx
            .store
            .update_health(id, |h| {
                if metrics.is_some() {
                    h.live_metrics = metrics;
                }
                (h.next_sequence(), h.state)
            })
            .ok_or_else(|| MonitorError::not_found(format!("No health record for {}", id)))?;

        let payload = HeartbeatPayload {
            component_id: registration.component_id.clone(),
            component_type: registration.component_type.clone(),
            instance_id: registration.instance_id.clone(),
            sequence,
            state,
            timestamp: Utc::now(),
            health_metrics: metrics,
            metadata: HeartbeatMetadata {
                component_type: registration.component_type.clone(),
                version: registration.version.clone(),
                uptime_seconds: registration.uptime_seconds(),
                interval_seconds: interval.as_secs(),
            },
        };

        self.ctx.client.send_heartbeat(&payload).await
    }

    async fn sample_metrics(&self, registration: &ComponentRegistration) -> Option<LiveMetrics> {
        let source = self.ctx.metrics_source.as_ref()?;
        let health = self.ctx.store.health(&self.component_id)?;
        match source.sample(registration, &health).await {
            Ok(metrics) => Some(metrics),
            Err(e) => {
                debug!(
                    "Skipping metrics for {} heartbeat: {}",
                    self.component_id, e
                );
                None
            }
        }
    }
}

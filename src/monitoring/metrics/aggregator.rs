//! Fleet-wide metrics aggregation and proactive recovery

use super::source::MetricsSource;
use crate::config::MetricsConfig;
use crate::monitoring::recovery::RecoveryCoordinator;
use crate::monitoring::store::ComponentStore;
use crate::monitoring::types::{
    AttentionItem, ComponentHealthMetrics, ComponentState, FleetSnapshot, LiveMetrics,
};
use crate::utils::error::Result;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Periodically summarises every health record and recovers unhealthy components
#[derive(Clone)]
pub struct MetricsAggregator {
    store: Arc<ComponentStore>,
    coordinator: Arc<RecoveryCoordinator>,
    source: Option<Arc<dyn MetricsSource>>,
    config: MetricsConfig,
    last_snapshot: Arc<RwLock<Option<FleetSnapshot>>>,
    recoveries: Arc<Mutex<JoinSet<()>>>,
}

impl std::fmt::Debug for MetricsAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsAggregator")
            .field("config", &self.config)
            .field("has_source", &self.source.is_some())
            .field("recoveries", &self.recoveries.lock().len())
            .finish_non_exhaustive()
    }
}

/// Running sum for one averaged metric
#[derive(Default)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn value(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

impl MetricsAggregator {
    pub(crate) fn new(
        store: Arc<ComponentStore>,
        coordinator: Arc<RecoveryCoordinator>,
        source: Option<Arc<dyn MetricsSource>>,
        config: MetricsConfig,
    ) -> Self {
        Self {
            store,
            coordinator,
            source,
            config,
            last_snapshot: Arc::new(RwLock::new(None)),
            recoveries: Arc::new(Mutex::new(JoinSet::new())),
        }
    }

    /// Snapshot produced by the most recent cycle
    pub fn last_snapshot(&self) -> Option<FleetSnapshot> {
        self.last_snapshot.read().clone()
    }

    /// Compute a fleet snapshot from the current health records
    pub async fn collect(&self) -> Result<FleetSnapshot> {
        let ids = self.store.component_ids();

        let mut cpu = Mean::default();
        let mut memory = Mean::default();
        let mut latency = Mean::default();
        let mut error_rate = Mean::default();
        let mut needs_attention = Vec::new();

        for id in &ids {
            let Some(health) = self.store.health(id) else {
                continue;
            };

            let live = self.sample(id, &health).await;
            if let Some(live) = live {
                cpu.push(live.cpu_percent);
                memory.push(live.memory_mb);
            }

            let component_latency = live
                .map(|m| m.latency_ms)
                .or(health.last_latency_ms);
            if let Some(ms) = component_latency {
                latency.push(ms);
            }

            let component_error_rate = live
                .map(|m| m.error_rate)
                .unwrap_or_else(|| health.heartbeat_error_rate());
            error_rate.push(component_error_rate);

            if let Some(reason) = self.attention_reason(&health, component_error_rate) {
                needs_attention.push(AttentionItem {
                    component_id: id.clone(),
                    reason,
                });
            }
        }

        Ok(FleetSnapshot {
            timestamp: Utc::now(),
            total_components: ids.len(),
            avg_cpu_percent: cpu.value(),
            avg_memory_mb: memory.value(),
            avg_latency_ms: latency.value(),
            avg_error_rate: error_rate.value(),
            needs_attention,
        })
    }

    /// One aggregation cycle: collect, kick off eligible recoveries, publish
    ///
    /// Recoveries run on tasks owned by the aggregator; a slow handshake
    /// never delays the cycle and [`abort_recoveries`](Self::abort_recoveries)
    /// cancels whatever is still in flight.
    pub async fn run_cycle(&self) -> Result<FleetSnapshot> {
        let snapshot = self.collect().await?;
        self.spawn_recoveries(&snapshot);

        debug!(
            "Fleet snapshot: {} components, {} need attention",
            snapshot.total_components,
            snapshot.needs_attention.len()
        );
        *self.last_snapshot.write() = Some(snapshot.clone());
        Ok(snapshot)
    }

    fn spawn_recoveries(&self, snapshot: &FleetSnapshot) {
        let mut recoveries = self.recoveries.lock();
        while recoveries.try_join_next().is_some() {}

        for item in &snapshot.needs_attention {
            let unhealthy = self
                .store
                .health(&item.component_id)
                .is_some_and(|h| h.state.is_unhealthy());
            if !unhealthy || !self.coordinator.should_auto_recover(&item.component_id) {
                continue;
            }

            info!(
                "Auto-recovering {}: {}",
                item.component_id, item.reason
            );
            let coordinator = self.coordinator.clone();
            let component_id = item.component_id.clone();
            recoveries.spawn(async move {
                coordinator.attempt_component_recovery(&component_id).await;
            });
        }
    }

    /// Cancel every recovery still in flight
    pub(crate) fn abort_recoveries(&self) {
        let mut recoveries = self.recoveries.lock();
        if !recoveries.is_empty() {
            debug!("Aborting {} in-flight recoveries", recoveries.len());
        }
        recoveries.abort_all();
    }

    /// Aggregate every `interval_secs` until `running` is cleared or the task is aborted
    pub(crate) async fn run(self, running: Arc<AtomicBool>) {
        let interval = Duration::from_secs(self.config.interval_secs.max(1));
        while running.load(Ordering::Acquire) {
            if let Err(e) = self.run_cycle().await {
                warn!("Failed to aggregate metrics: {}", e);
            }
            tokio::time::sleep(interval).await;
        }
        debug!("Metrics aggregator stopped");
    }

    async fn sample(&self, component_id: &str, health: &ComponentHealthMetrics) -> Option<LiveMetrics> {
        let fresh = match (&self.source, self.store.registration(component_id)) {
            (Some(source), Some(registration)) => {
                match source.sample(&registration, health).await {
                    Ok(metrics) => Some(metrics),
                    Err(e) => {
                        warn!("Failed to sample metrics for {}: {}", component_id, e);
                        None
                    }
                }
            }
            _ => None,
        };
        fresh.or(health.live_metrics)
    }

    fn attention_reason(&self, health: &ComponentHealthMetrics, error_rate: f64) -> Option<String> {
        let mut reasons = Vec::new();
        if error_rate > self.config.error_rate_threshold {
            reasons.push(format!(
                "error rate {:.1}% above {:.1}%",
                error_rate * 100.0,
                self.config.error_rate_threshold * 100.0
            ));
        }
        if health.state.is_unhealthy() {
            reasons.push(format!("state is {}", health.state));
        }
        if let Some(error) = health.last_error.as_ref().filter(|_| health.state == ComponentState::Failed) {
            reasons.push(format!("last error: {}", error));
        }

        if reasons.is_empty() {
            None
        } else {
            Some(reasons.join("; "))
        }
    }
}

//! Public lifecycle API of the heartbeat monitor

use super::client::RegistryClient;
use super::heartbeat::{HeartbeatScheduler, SchedulerContext};
use super::interval::IntervalPolicy;
use super::metrics::{MetricsAggregator, MetricsSource, SystemMetricsSource};
use super::prober::AvailabilityProber;
use super::recovery::RecoveryCoordinator;
use super::registration::ComponentRegistration;
use super::store::ComponentStore;
use super::types::{
    ComponentHealthMetrics, ComponentHeartbeatStatus, ComponentState, FleetSnapshot,
    HeartbeatStatusReport,
};
use crate::config::Config;
use crate::utils::error::Result;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Handles of every task the monitor spawned
#[derive(Debug, Default)]
struct TaskSet {
    heartbeats: HashMap<String, JoinHandle<()>>,
    prober: Option<JoinHandle<()>>,
    aggregator: Option<JoinHandle<()>>,
}

/// Keeps registered components alive in the registry
///
/// Owns the component maps and every background task: one heartbeat
/// scheduler per component, the availability prober and, when metrics are
/// enabled, the metrics aggregator. Must be used from inside a Tokio runtime.
pub struct HeartbeatMonitor {
    ctx: SchedulerContext,
    prober: AvailabilityProber,
    aggregator: MetricsAggregator,
    metrics_enabled: bool,
    tasks: Mutex<TaskSet>,
}

impl std::fmt::Debug for HeartbeatMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeartbeatMonitor")
            .field("running", &self.is_running())
            .field("components", &self.ctx.store.registrations.len())
            .field("metrics_enabled", &self.metrics_enabled)
            .finish_non_exhaustive()
    }
}

impl HeartbeatMonitor {
    /// Create a monitor; samples host metrics when metrics collection is enabled
    pub fn new(config: &Config) -> Result<Self> {
        let source: Option<Arc<dyn MetricsSource>> = if config.metrics.enabled {
            Some(Arc::new(SystemMetricsSource))
        } else {
            None
        };
        Self::with_metrics_source(config, source)
    }

    /// Create a monitor with a custom live-metrics source
    ///
    /// The source is ignored when metrics collection is disabled.
    pub fn with_metrics_source(
        config: &Config,
        source: Option<Arc<dyn MetricsSource>>,
    ) -> Result<Self> {
        config.validate()?;

        let metrics_enabled = config.metrics.enabled;
        let source = source.filter(|_| metrics_enabled);
        let store = Arc::new(ComponentStore::default());
        let client = Arc::new(RegistryClient::new(&config.registry)?);
        let coordinator = Arc::new(RecoveryCoordinator::new(
            store.clone(),
            config.recovery.clone(),
        ));
        let policy = Arc::new(IntervalPolicy::new(&config.monitor));

        let prober = AvailabilityProber::new(
            client.clone(),
            coordinator.clone(),
            policy.default_interval() / 2,
        );
        let aggregator = MetricsAggregator::new(
            store.clone(),
            coordinator.clone(),
            source.clone(),
            config.metrics.clone(),
        );

        let ctx = SchedulerContext {
            store,
            client,
            coordinator,
            policy,
            metrics_source: source,
            running: Arc::new(AtomicBool::new(false)),
            stagger: config.monitor.stagger_enabled,
            failure_threshold: config.monitor.failure_threshold,
            max_retries: config.monitor.max_retries,
        };

        Ok(Self {
            ctx,
            prober,
            aggregator,
            metrics_enabled,
            tasks: Mutex::new(TaskSet::default()),
        })
    }

    /// Whether the monitor is running
    #[inline]
    pub fn is_running(&self) -> bool {
        self.ctx.running.load(Ordering::Acquire)
    }

    /// Add or replace a component
    ///
    /// Re-registering an id replaces the record and drops its interval
    /// override; the health record and sequence counter carry over. While
    /// running, the component gets a fresh scheduler immediately.
    pub async fn register_component(&self, registration: ComponentRegistration) {
        let id = registration.component_id.clone();
        let mut tasks = self.tasks.lock();

        if let Some(previous) = tasks.heartbeats.remove(&id) {
            debug!("Replacing scheduler for re-registered component {}", id);
            previous.abort();
        }

        info!(
            "Registering component {} ({}, v{})",
            id, registration.component_type, registration.version
        );
        self.ctx.store.interval_overrides.remove(&id);
        self.ctx
            .store
            .health
            .entry(id.clone())
            .or_insert_with(|| ComponentHealthMetrics::new(id.clone()));
        self.ctx.store.registrations.insert(id.clone(), registration);

        if self.is_running() {
            let handle = self.spawn_scheduler(&id);
            tasks.heartbeats.insert(id, handle);
        }
    }

    /// Drop a component and stop its scheduler; unknown ids are ignored
    pub async fn unregister_component(&self, component_id: &str) {
        if let Some(handle) = self.tasks.lock().heartbeats.remove(component_id) {
            handle.abort();
        }

        let known = self.ctx.store.registrations.remove(component_id).is_some();
        self.ctx.store.health.remove(component_id);
        self.ctx.store.interval_overrides.remove(component_id);

        if known {
            info!("Unregistered component {}", component_id);
        }
    }

    /// Start heartbeats for every component plus the prober and aggregator
    pub async fn start(&self) {
        let mut tasks = self.tasks.lock();
        self.ctx.running.store(true, Ordering::Release);

        for id in self.ctx.store.component_ids() {
            let alive = tasks
                .heartbeats
                .get(&id)
                .is_some_and(|handle| !handle.is_finished());
            if !alive {
                let handle = self.spawn_scheduler(&id);
                tasks.heartbeats.insert(id, handle);
            }
        }

        if tasks.prober.as_ref().is_none_or(|h| h.is_finished()) {
            let prober = self.prober.clone();
            let running = self.ctx.running.clone();
            tasks.prober = Some(tokio::spawn(prober.run(running)));
        }

        if self.metrics_enabled && tasks.aggregator.as_ref().is_none_or(|h| h.is_finished()) {
            let aggregator = self.aggregator.clone();
            let running = self.ctx.running.clone();
            tasks.aggregator = Some(tokio::spawn(aggregator.run(running)));
        }

        info!(
            "Heartbeat monitor started with {} components",
            tasks.heartbeats.len()
        );
    }

    /// Stop every task, including in-flight auto-recoveries
    ///
    /// Registrations are kept for a later `start`.
    pub async fn stop(&self) {
        let mut tasks = self.tasks.lock();
        self.ctx.running.store(false, Ordering::Release);

        for (_, handle) in tasks.heartbeats.drain() {
            handle.abort();
        }
        if let Some(handle) = tasks.prober.take() {
            handle.abort();
        }
        if let Some(handle) = tasks.aggregator.take() {
            handle.abort();
        }
        self.aggregator.abort_recoveries();

        info!("Heartbeat monitor stopped");
    }

    /// Override one component's interval, clamped to the positive floor
    ///
    /// Picked up on the component's next sleep.
    pub fn set_component_interval(&self, component_id: &str, seconds: i64) {
        if !self.ctx.store.registrations.contains_key(component_id) {
            warn!("Ignoring interval for unknown component {}", component_id);
            return;
        }

        let clamped = self.ctx.policy.clamp(seconds);
        if clamped as i64 != seconds {
            warn!(
                "Interval {}s for {} clamped to {}s",
                seconds, component_id, clamped
            );
        }
        self.ctx
            .store
            .interval_overrides
            .insert(component_id.to_string(), clamped);
    }

    /// Record the lifecycle state a component reports about itself
    pub fn set_component_state(&self, component_id: &str, state: ComponentState) {
        if self
            .ctx
            .store
            .update_health(component_id, |h| h.state = state)
            .is_none()
        {
            warn!("Ignoring state for unknown component {}", component_id);
        }
    }

    /// Registered component ids, sorted
    pub fn component_ids(&self) -> Vec<String> {
        self.ctx.store.component_ids()
    }

    /// Copy of one component's health record
    pub fn component_health(&self, component_id: &str) -> Option<ComponentHealthMetrics> {
        self.ctx.store.health(component_id)
    }

    /// Number of live scheduler tasks
    pub fn active_schedulers(&self) -> usize {
        self.tasks
            .lock()
            .heartbeats
            .values()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    /// Heartbeat view of every component
    pub fn heartbeat_status(&self) -> HeartbeatStatusReport {
        let tasks = self.tasks.lock();
        let mut components = Vec::new();

        for id in self.ctx.store.component_ids() {
            let (Some(registration), Some(health)) =
                (self.ctx.store.registration(&id), self.ctx.store.health(&id))
            else {
                continue;
            };
            let interval = self
                .ctx
                .effective_interval(&id)
                .unwrap_or_else(|| self.ctx.policy.default_interval());

            components.push(ComponentHeartbeatStatus {
                scheduler_active: tasks
                    .heartbeats
                    .get(&id)
                    .is_some_and(|handle| !handle.is_finished()),
                component_id: id,
                component_type: registration.component_type,
                state: health.state,
                sequence: health.sequence,
                consecutive_failures: health.consecutive_failures,
                last_latency_ms: health.last_latency_ms,
                last_error: health.last_error,
                last_success_at: health.last_success_at,
                interval_seconds: interval.as_secs(),
            });
        }

        let healthy_count = components
            .iter()
            .filter(|c| c.state == ComponentState::Healthy && c.consecutive_failures == 0)
            .count();
        HeartbeatStatusReport {
            running: self.is_running(),
            unhealthy_count: components.len() - healthy_count,
            healthy_count,
            components,
        }
    }

    /// Compute a fleet snapshot now, without waiting for the aggregator
    pub async fn fleet_snapshot(&self) -> Result<FleetSnapshot> {
        self.aggregator.collect().await
    }

    /// Run one aggregation cycle, including auto-recovery of eligible components
    pub async fn aggregate_now(&self) -> Result<FleetSnapshot> {
        self.aggregator.run_cycle().await
    }

    /// Snapshot from the aggregator's latest cycle
    pub fn last_fleet_snapshot(&self) -> Option<FleetSnapshot> {
        self.aggregator.last_snapshot()
    }

    /// Check registry availability once, reconnecting everything on outage
    pub async fn probe_registry(&self) -> bool {
        self.prober.probe_once().await
    }

    /// Whether a component may be auto-recovered right now
    pub fn should_auto_recover(&self, component_id: &str) -> bool {
        self.ctx.coordinator.should_auto_recover(component_id)
    }

    /// Count a recovery attempt and reconnect one component
    pub async fn attempt_component_recovery(&self, component_id: &str) -> bool {
        self.ctx
            .coordinator
            .attempt_component_recovery(component_id)
            .await
    }

    /// Re-run the registration handshake for one component
    pub async fn reconnect_component(&self, component_id: &str) -> bool {
        self.ctx.coordinator.reconnect_component(component_id).await
    }

    /// Re-register every component, paced to avoid a reconnect storm
    pub async fn reconnect_all_components(&self) -> HashMap<String, bool> {
        self.ctx.coordinator.reconnect_all_components().await
    }

    fn spawn_scheduler(&self, component_id: &str) -> JoinHandle<()> {
        debug!("Spawning heartbeat scheduler for {}", component_id);
        tokio::spawn(HeartbeatScheduler::new(self.ctx.clone(), component_id).run())
    }
}

impl Drop for HeartbeatMonitor {
    fn drop(&mut self) {
        self.ctx.running.store(false, Ordering::Release);
        let tasks = self.tasks.get_mut();
        for (_, handle) in tasks.heartbeats.drain() {
            handle.abort();
        }
        if let Some(handle) = tasks.prober.take() {
            handle.abort();
        }
        if let Some(handle) = tasks.aggregator.take() {
            handle.abort();
        }
        self.aggregator.abort_recoveries();
    }
}

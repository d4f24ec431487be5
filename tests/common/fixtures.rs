//! Test fixtures
//!
//! Provides a registrar that records handshakes and a configuration tuned
//! for second-scale test runs.

use async_trait::async_trait;
use heartbeat_rs::config::{MetricsConfig, MonitorConfig, RecoveryConfig, RegistryConfig};
use heartbeat_rs::{ComponentRegistration, ComponentType, Config, Registrar, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Registrar that records every handshake instead of calling a registry
pub struct RecordingRegistrar {
    calls: Mutex<Vec<String>>,
    accept: AtomicBool,
    delay: Option<Duration>,
    completed: AtomicUsize,
}

impl RecordingRegistrar {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            accept: AtomicBool::new(true),
            delay: None,
            completed: AtomicUsize::new(0),
        })
    }

    /// Registrar whose handshakes take `delay` to complete
    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            accept: AtomicBool::new(true),
            delay: Some(delay),
            completed: AtomicUsize::new(0),
        })
    }

    /// Registrar whose handshakes are refused
    pub fn refusing() -> Arc<Self> {
        let registrar = Self::new();
        registrar.accept.store(false, Ordering::SeqCst);
        registrar
    }

    /// Handshakes performed for one component
    pub fn count(&self, component_id: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|id| id.as_str() == component_id)
            .count()
    }

    pub fn total(&self) -> usize {
        self.calls.lock().len()
    }

    /// Handshakes that ran to completion
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Registrar for RecordingRegistrar {
    async fn register(&self, registration: &ComponentRegistration) -> Result<bool> {
        self.calls.lock().push(registration.component_id.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(self.accept.load(Ordering::SeqCst))
    }
}

/// Configuration with one-second intervals, no stagger and no retry floor
pub fn fast_config(registry_url: &str) -> Config {
    let mut monitor = MonitorConfig {
        default_interval_secs: 1,
        retry_interval_secs: 0,
        stagger_enabled: false,
        ..Default::default()
    };
    for component_type in [
        ComponentType::Database,
        ComponentType::Api,
        ComponentType::Worker,
        ComponentType::Ui,
        ComponentType::Service,
    ] {
        monitor.type_intervals.insert(component_type, 1);
    }

    Config {
        registry: RegistryConfig {
            base_url: registry_url.to_string(),
            request_timeout_secs: 2,
            health_timeout_secs: 1,
        },
        monitor,
        metrics: MetricsConfig {
            enabled: false,
            ..Default::default()
        },
        recovery: RecoveryConfig {
            reconnect_pacing_millis: 10,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Registration bound to `registrar`
pub fn component(
    id: &str,
    component_type: &str,
    registrar: &Arc<RecordingRegistrar>,
) -> ComponentRegistration {
    ComponentRegistration::new(id, component_type, "1.0.0", registrar.clone())
}

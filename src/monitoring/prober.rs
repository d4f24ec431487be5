//! Registry-wide availability probing

use crate::monitoring::client::RegistryClient;
use crate::monitoring::recovery::RecoveryCoordinator;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// Tells "the registry is down" apart from "one component is failing"
#[derive(Debug, Clone)]
pub struct AvailabilityProber {
    client: Arc<RegistryClient>,
    coordinator: Arc<RecoveryCoordinator>,
    interval: Duration,
}

impl AvailabilityProber {
    /// `interval` is the pause between checks, roughly half the heartbeat default
    pub fn new(
        client: Arc<RegistryClient>,
        coordinator: Arc<RecoveryCoordinator>,
        interval: Duration,
    ) -> Self {
        Self {
            client,
            coordinator,
            interval,
        }
    }

    /// One availability check; on outage reconnects every component
    ///
    /// Returns whether the registry was reachable.
    pub async fn probe_once(&self) -> bool {
        match self.client.check_health().await {
            Ok(()) => {
                debug!("Registry at {} is reachable", self.client.base_url());
                true
            }
            Err(e) => {
                warn!(
                    "Registry at {} unreachable ({}), reconnecting all components",
                    self.client.base_url(),
                    e
                );
                self.coordinator.reconnect_all_components().await;
                false
            }
        }
    }

    /// Probe until `running` is cleared or the task is aborted
    pub(crate) async fn run(self, running: Arc<AtomicBool>) {
        while running.load(Ordering::Acquire) {
            self.probe_once().await;
            tokio::time::sleep(self.interval).await;
        }
        debug!("Availability prober stopped");
    }
}

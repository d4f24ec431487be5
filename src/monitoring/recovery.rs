//! Re-registration of single components and of the whole fleet

use crate::config::RecoveryConfig;
use crate::monitoring::store::ComponentStore;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Decides when a component may be recovered and performs the reconnection
#[derive(Debug, Clone)]
pub struct RecoveryCoordinator {
    store: Arc<ComponentStore>,
    config: RecoveryConfig,
}

impl RecoveryCoordinator {
    pub(crate) fn new(store: Arc<ComponentStore>, config: RecoveryConfig) -> Self {
        Self { store, config }
    }

    /// Whether the component is eligible for an automatic recovery right now
    ///
    /// False once the attempt cap is reached, inside the cooldown window,
    /// or when the component type is not in the auto-recover allow-list.
    pub fn should_auto_recover(&self, component_id: &str) -> bool {
        let Some(registration) = self.store.registration(component_id) else {
            return false;
        };
        let Some(health) = self.store.health(component_id) else {
            return false;
        };

        if health.recovery_attempts >= self.config.max_attempts {
            debug!(
                "{} reached the recovery cap ({} attempts)",
                component_id, health.recovery_attempts
            );
            return false;
        }

        if let Some(last) = health.last_recovery_at {
            let elapsed = (Utc::now() - last).num_seconds();
            if elapsed < self.config.cooldown_secs as i64 {
                debug!(
                    "{} recovered {}s ago, cooldown is {}s",
                    component_id, elapsed, self.config.cooldown_secs
                );
                return false;
            }
        }

        self.config
            .auto_recover_types
            .contains(&registration.component_type)
    }

    /// Count an attempt, stamp its time and reconnect the component
    pub async fn attempt_component_recovery(&self, component_id: &str) -> bool {
        let attempt = self.store.update_health(component_id, |health| {
            health.recovery_attempts += 1;
            health.last_recovery_at = Some(Utc::now());
            health.recovery_attempts
        });

        let Some(attempt) = attempt else {
            warn!("Cannot recover unknown component {}", component_id);
            return false;
        };

        info!(
            "Attempting recovery of {} (attempt {}/{})",
            component_id, attempt, self.config.max_attempts
        );
        let recovered = self.reconnect_component(component_id).await;
        if recovered {
            info!("Recovered {}", component_id);
        } else {
            error!("Recovery attempt {} for {} failed", attempt, component_id);
        }
        recovered
    }

    /// Run the registration handshake again for one component
    pub async fn reconnect_component(&self, component_id: &str) -> bool {
        let Some(registration) = self.store.registration(component_id) else {
            warn!("Cannot reconnect unknown component {}", component_id);
            return false;
        };

        match registration.register().await {
            Ok(true) => {
                info!("Reconnected {} to registry", component_id);
                true
            }
            Ok(false) => {
                warn!("Registry refused reconnection of {}", component_id);
                false
            }
            Err(e) => {
                warn!("Reconnection of {} failed: {}", component_id, e);
                false
            }
        }
    }

    /// Reconnect every registered component, pacing the calls
    pub async fn reconnect_all_components(&self) -> HashMap<String, bool> {
        let ids = self.store.component_ids();
        let pacing = Duration::from_millis(self.config.reconnect_pacing_millis);
        info!("Reconnecting {} components to registry", ids.len());

        let mut results = HashMap::with_capacity(ids.len());
        for (index, id) in ids.into_iter().enumerate() {
            if index > 0 && !pacing.is_zero() {
                tokio::time::sleep(pacing).await;
            }
            let ok = self.reconnect_component(&id).await;
            results.insert(id, ok);
        }

        let failed = results.values().filter(|ok| !**ok).count();
        if failed > 0 {
            warn!(
                "Bulk reconnect finished with {}/{} failures",
                failed,
                results.len()
            );
        }
        results
    }
}

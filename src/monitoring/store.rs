//! Shared per-component bookkeeping

use crate::monitoring::registration::ComponentRegistration;
use crate::monitoring::types::ComponentHealthMetrics;
use dashmap::DashMap;

/// Maps keyed by component id, shared by the monitor and its tasks
///
/// Each health record is written by its component's scheduler, the two
/// recovery fields by the recovery coordinator, and entries are created or
/// dropped only by register/unregister. DashMap's per-shard locking keeps
/// those writers from tearing each other's updates.
#[derive(Debug, Default)]
pub(crate) struct ComponentStore {
    pub registrations: DashMap<String, ComponentRegistration>,
    pub health: DashMap<String, ComponentHealthMetrics>,
    pub interval_overrides: DashMap<String, u64>,
}

impl ComponentStore {
    pub fn registration(&self, component_id: &str) -> Option<ComponentRegistration> {
        self.registrations
            .get(component_id)
            .map(|entry| entry.value().clone())
    }

    pub fn health(&self, component_id: &str) -> Option<ComponentHealthMetrics> {
        self.health.get(component_id).map(|entry| entry.value().clone())
    }

    /// Apply `f` to a health record if the component is still registered
    pub fn update_health<R>(
        &self,
        component_id: &str,
        f: impl FnOnce(&mut ComponentHealthMetrics) -> R,
    ) -> Option<R> {
        self.health
            .get_mut(component_id)
            .map(|mut entry| f(entry.value_mut()))
    }

    pub fn component_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .registrations
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        ids.sort();
        ids
    }
}

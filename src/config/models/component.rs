//! Statically configured components

use crate::monitoring::{ComponentRegistration, ComponentType, Registrar};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A component the binary registers on start-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentConfig {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub instance_id: Option<String>,
    /// Custom heartbeat interval in seconds
    #[serde(default)]
    pub interval_secs: Option<u64>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

impl ComponentConfig {
    /// Registration record for this component, bound to `registrar`
    pub fn to_registration(&self, registrar: Arc<dyn Registrar>) -> ComponentRegistration {
        let mut registration = ComponentRegistration::new(
            self.id.clone(),
            self.component_type.clone(),
            self.version.clone(),
            registrar,
        )
        .with_capabilities(self.capabilities.clone());

        if let Some(name) = &self.name {
            registration = registration.with_name(name.clone());
        }
        if let Some(instance_id) = &self.instance_id {
            registration = registration.with_instance_id(instance_id.clone());
        }
        if let Some(seconds) = self.interval_secs {
            registration = registration.with_interval(seconds);
        }
        if let Some(endpoint) = &self.endpoint {
            registration = registration.with_endpoint(endpoint.clone());
        }
        registration
    }
}

fn default_version() -> String {
    "0.1.0".to_string()
}

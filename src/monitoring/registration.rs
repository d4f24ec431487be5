//! Component registration records and the registration handshake

use crate::monitoring::types::ComponentType;
use crate::utils::error::{MonitorError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Registration handshake with the registry
///
/// Invoked for first-time registration and for every reconnection attempt.
/// Returns `Ok(false)` when the registry rejected the component.
#[async_trait]
pub trait Registrar: Send + Sync {
    async fn register(&self, registration: &ComponentRegistration) -> Result<bool>;
}

/// Description of one monitored component
///
/// Built by the component owner and handed to the monitor. The identity is
/// fixed; the heartbeat interval can later be overridden through the monitor.
#[derive(Clone)]
pub struct ComponentRegistration {
    /// Unique component id
    pub component_id: String,
    /// Human readable name
    pub name: String,
    /// Component category
    pub component_type: ComponentType,
    /// Component version string
    pub version: String,
    /// Identity of the running instance
    pub instance_id: String,
    /// Process start time
    pub started_at: DateTime<Utc>,
    /// Custom heartbeat interval in seconds
    pub heartbeat_interval: Option<u64>,
    /// Address the component serves on, if any
    pub endpoint: Option<String>,
    /// Advertised capabilities
    pub capabilities: Vec<String>,
    /// Free-form metadata forwarded to the registry
    pub metadata: HashMap<String, serde_json::Value>,
    registrar: Arc<dyn Registrar>,
}

impl ComponentRegistration {
    /// Create a registration with the given handshake capability
    pub fn new(
        component_id: impl Into<String>,
        component_type: impl Into<ComponentType>,
        version: impl Into<String>,
        registrar: Arc<dyn Registrar>,
    ) -> Self {
        let component_id = component_id.into();
        Self {
            name: component_id.clone(),
            instance_id: format!("{}-{}", component_id, std::process::id()),
            component_id,
            component_type: component_type.into(),
            version: version.into(),
            started_at: Utc::now(),
            heartbeat_interval: None,
            endpoint: None,
            capabilities: Vec::new(),
            metadata: HashMap::new(),
            registrar,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_instance_id(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = instance_id.into();
        self
    }

    pub fn with_interval(mut self, seconds: u64) -> Self {
        self.heartbeat_interval = Some(seconds);
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_capabilities(mut self, capabilities: Vec<String>) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_started_at(mut self, started_at: DateTime<Utc>) -> Self {
        self.started_at = started_at;
        self
    }

    /// Seconds since the component process started
    pub fn uptime_seconds(&self) -> u64 {
        (Utc::now() - self.started_at).num_seconds().max(0) as u64
    }

    /// Run the registration handshake
    pub async fn register(&self) -> Result<bool> {
        self.registrar.register(self).await
    }
}

impl fmt::Debug for ComponentRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistration")
            .field("component_id", &self.component_id)
            .field("component_type", &self.component_type)
            .field("version", &self.version)
            .field("instance_id", &self.instance_id)
            .field("started_at", &self.started_at)
            .field("heartbeat_interval", &self.heartbeat_interval)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    component_id: &'a str,
    name: &'a str,
    #[serde(rename = "type")]
    component_type: &'a str,
    version: &'a str,
    instance_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    endpoint: Option<&'a str>,
    capabilities: &'a [String],
    metadata: &'a HashMap<String, serde_json::Value>,
}

/// Registrar that talks to the registry's HTTP registration API
#[derive(Debug, Clone)]
pub struct HttpRegistrar {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpRegistrar {
    /// Create a registrar for the given registry base URL
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MonitorError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Tell the registry a component is going away
    pub async fn deregister(&self, component_id: &str) -> Result<()> {
        let url = format!("{}/registration/unregister", self.base_url);
        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&serde_json::json!({ "component_id": component_id }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!("Unregistered {} from registry", component_id);
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(MonitorError::transport(status.as_u16(), body))
        }
    }
}

#[async_trait]
impl Registrar for HttpRegistrar {
    async fn register(&self, registration: &ComponentRegistration) -> Result<bool> {
        let url = format!("{}/registration/register", self.base_url);
        let request = RegisterRequest {
            component_id: &registration.component_id,
            name: &registration.name,
            component_type: registration.component_type.as_str(),
            version: &registration.version,
            instance_id: &registration.instance_id,
            endpoint: registration.endpoint.as_deref(),
            capabilities: &registration.capabilities,
            metadata: &registration.metadata,
        };

        debug!("Registering {} at {}", registration.component_id, url);
        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!("Registered {} with registry", registration.component_id);
            Ok(true)
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!(
                "Registry rejected registration of {}: HTTP {} {}",
                registration.component_id, status, body
            );
            Ok(false)
        }
    }
}

//! HTTP client for the registry's heartbeat and health endpoints

use crate::config::RegistryConfig;
use crate::monitoring::types::HeartbeatPayload;
use crate::utils::error::{MonitorError, Result};
use std::time::{Duration, Instant};
use tracing::debug;

/// Thin wrapper over `reqwest` bound to one registry
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
    health_timeout: Duration,
}

impl RegistryClient {
    /// Create a client from registry configuration
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| MonitorError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            health_timeout: Duration::from_secs(config.health_timeout_secs),
        })
    }

    /// Registry base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Post one heartbeat, returning the round-trip latency on a 2xx answer
    pub async fn send_heartbeat(&self, payload: &HeartbeatPayload) -> Result<Duration> {
        let url = format!("{}/registration/heartbeat", self.base_url);
        let body = serde_json::to_vec(payload)
            .map_err(|e| MonitorError::unexpected(format!("Failed to encode heartbeat: {}", e)))?;

        let started = Instant::now();
        let response = self
            .client
            .post(&url)
            .timeout(self.request_timeout)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let latency = started.elapsed();

        let status = response.status();
        if status.is_success() {
            debug!(
                "Heartbeat {} for {} acknowledged in {:?}",
                payload.sequence, payload.component_id, latency
            );
            Ok(latency)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(MonitorError::transport(status.as_u16(), body))
        }
    }

    /// Check whether the registry answers `GET /health` with 200
    pub async fn check_health(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(self.health_timeout)
            .send()
            .await
            .map_err(|e| MonitorError::registry_unavailable(e.to_string()))?;

        if response.status() == reqwest::StatusCode::OK {
            Ok(())
        } else {
            Err(MonitorError::registry_unavailable(format!(
                "health check returned HTTP {}",
                response.status()
            )))
        }
    }

    fn map_send_error(&self, error: reqwest::Error) -> MonitorError {
        if error.is_timeout() {
            MonitorError::timeout(format!(
                "no answer within {}s",
                self.request_timeout.as_secs_f64()
            ))
        } else {
            MonitorError::HttpClient(error)
        }
    }
}

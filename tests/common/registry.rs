//! Mock registry server
//!
//! Wraps a wiremock server exposing the registry's heartbeat and health
//! endpoints, and decodes the heartbeats it received.

use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Registry double for integration tests
pub struct MockRegistry {
    pub server: MockServer,
}

impl MockRegistry {
    /// Registry that accepts heartbeats and reports healthy
    pub async fn healthy() -> Self {
        let registry = Self {
            server: MockServer::start().await,
        };
        registry.heartbeats_respond(200).await;
        registry.health_responds(200).await;
        registry
    }

    /// Registry whose heartbeat endpoint always answers with `status`
    pub async fn failing_heartbeats(status: u16) -> Self {
        let registry = Self {
            server: MockServer::start().await,
        };
        registry.heartbeats_respond(status).await;
        registry.health_responds(200).await;
        registry
    }

    /// Registry whose health endpoint reports an outage
    pub async fn down() -> Self {
        let registry = Self {
            server: MockServer::start().await,
        };
        registry.heartbeats_respond(503).await;
        registry.health_responds(503).await;
        registry
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub async fn heartbeats_respond(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/registration/heartbeat"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    pub async fn health_responds(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Answer the next `times` heartbeats with `status`, ahead of other mocks
    pub async fn fail_next_heartbeats(&self, status: u16, times: u64) {
        Mock::given(method("POST"))
            .and(path("/registration/heartbeat"))
            .respond_with(ResponseTemplate::new(status))
            .up_to_n_times(times)
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    /// Every heartbeat body received so far, in arrival order
    pub async fn heartbeats(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() == "/registration/heartbeat")
            .filter_map(|request| serde_json::from_slice(&request.body).ok())
            .collect()
    }

    /// Sequence numbers received for one component, in arrival order
    pub async fn sequences_for(&self, component_id: &str) -> Vec<u64> {
        self.heartbeats()
            .await
            .into_iter()
            .filter(|body| body["component_id"] == component_id)
            .filter_map(|body| body["sequence"].as_u64())
            .collect()
    }
}

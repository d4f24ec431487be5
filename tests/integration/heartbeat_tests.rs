//! Heartbeat scheduling integration tests
//!
//! Sequencing, payload shape, backoff and threshold reconnection against a
//! mock registry.

#[cfg(test)]
mod tests {
    use crate::common::assertions::assert_strictly_increasing;
    use crate::common::fixtures::{component, fast_config};
    use crate::common::{MockRegistry, RecordingRegistrar, wait_until};
    use heartbeat_rs::{ComponentState, FailureKind, HeartbeatMonitor};
    use std::time::Duration;

    // ==================== Sequencing ====================

    /// Each component's sequence numbers start at 1 and only grow
    #[tokio::test]
    async fn test_sequences_strictly_increase_per_component() {
        let registry = MockRegistry::healthy().await;
        let registrar = RecordingRegistrar::new();
        let monitor = HeartbeatMonitor::new(&fast_config(&registry.uri())).unwrap();
        monitor.register_component(component("orders", "api", &registrar)).await;
        monitor.register_component(component("jobs", "worker", &registrar)).await;

        monitor.start().await;
        tokio::time::sleep(Duration::from_millis(2600)).await;
        monitor.stop().await;

        for id in ["orders", "jobs"] {
            let sequences = registry.sequences_for(id).await;
            assert!(sequences.len() >= 2, "{} sent {:?}", id, sequences);
            assert_eq!(sequences[0], 1);
            assert_strictly_increasing(&sequences);
        }
        assert_eq!(registrar.total(), 0);
    }

    /// The wire payload carries identity, state and metadata
    #[tokio::test]
    async fn test_payload_shape() {
        let registry = MockRegistry::healthy().await;
        let registrar = RecordingRegistrar::new();
        let monitor = HeartbeatMonitor::new(&fast_config(&registry.uri())).unwrap();
        monitor
            .register_component(component("jobs", "worker", &registrar).with_instance_id("jobs-7"))
            .await;

        monitor.start().await;
        assert!(wait_until(Duration::from_secs(2), || monitor.component_health("jobs").unwrap().sequence >= 1).await);
        monitor.stop().await;

        let heartbeats = registry.heartbeats().await;
        let body = &heartbeats[0];
        assert_eq!(body["component_id"], "jobs");
        assert_eq!(body["component_type"], "worker");
        assert_eq!(body["instance_id"], "jobs-7");
        assert_eq!(body["sequence"], 1);
        assert_eq!(body["state"], "healthy");
        assert_eq!(body["metadata"]["version"], "1.0.0");
        assert_eq!(body["metadata"]["interval_seconds"], 1);
        assert!(body["timestamp"].is_string());
        assert!(body.get("health_metrics").is_none());
    }

    // ==================== Failure handling ====================

    /// Three failed heartbeats trigger exactly one reconnection, later failures none
    #[tokio::test]
    async fn test_threshold_triggers_single_reconnect() {
        let registry = MockRegistry::failing_heartbeats(500).await;
        let registrar = RecordingRegistrar::new();
        let monitor = HeartbeatMonitor::new(&fast_config(&registry.uri())).unwrap();
        monitor.register_component(component("orders", "api", &registrar)).await;

        monitor.start().await;
        assert!(
            wait_until(Duration::from_secs(8), || registrar.count("orders") >= 1).await,
            "no reconnection after repeated failures"
        );
        let reconnected_at = monitor.component_health("orders").unwrap().consecutive_failures;
        assert_eq!(reconnected_at, 3);

        // Failures 4 and 5 land at roughly 6s and 9s of backed-off attempts
        assert!(
            wait_until(Duration::from_secs(8), || {
                monitor.component_health("orders").unwrap().consecutive_failures >= 5
            })
            .await,
            "scheduler stopped retrying after the threshold"
        );
        monitor.stop().await;

        assert_eq!(registrar.count("orders"), 1);
        let health = monitor.component_health("orders").unwrap();
        assert!(health.total_failures >= 5);
        assert_eq!(health.state, ComponentState::Error);
        assert_eq!(health.last_error_kind, Some(FailureKind::Transport));
        assert!(health.last_error.unwrap().contains("500"));
        assert_eq!(health.recovery_attempts, 0);
    }

    /// A success after transient failures restores the healthy state
    #[tokio::test]
    async fn test_recovers_after_transient_failures() {
        let registry = MockRegistry::healthy().await;
        registry.fail_next_heartbeats(503, 2).await;
        let registrar = RecordingRegistrar::new();
        let monitor = HeartbeatMonitor::new(&fast_config(&registry.uri())).unwrap();
        monitor.register_component(component("orders", "api", &registrar)).await;

        monitor.start().await;
        assert!(
            wait_until(Duration::from_secs(6), || {
                monitor.component_health("orders").unwrap().total_successes >= 1
            })
            .await
        );
        monitor.stop().await;

        let health = monitor.component_health("orders").unwrap();
        assert_eq!(health.total_failures, 2);
        assert_eq!(health.consecutive_failures, 0);
        assert_eq!(health.state, ComponentState::Healthy);
        assert!(health.last_success_at.is_some());
        assert_eq!(registrar.count("orders"), 0);
    }

    /// Failed heartbeats back off instead of retrying every interval
    #[tokio::test]
    async fn test_failures_back_off() {
        let registry = MockRegistry::failing_heartbeats(500).await;
        let registrar = RecordingRegistrar::new();
        let monitor = HeartbeatMonitor::new(&fast_config(&registry.uri())).unwrap();
        monitor.register_component(component("orders", "api", &registrar)).await;

        monitor.start().await;
        tokio::time::sleep(Duration::from_millis(3000)).await;
        monitor.stop().await;

        // Attempts at roughly 0s, 1.5s and 3.5s; without backoff there would be four
        let sent = registry.sequences_for("orders").await;
        assert_eq!(sent, vec![1, 2]);
    }

    /// Exhausted retries mark the component failed and end its scheduler
    #[tokio::test]
    async fn test_max_retries_stops_scheduler() {
        let registry = MockRegistry::failing_heartbeats(500).await;
        let registrar = RecordingRegistrar::new();
        let mut config = fast_config(&registry.uri());
        config.monitor.max_retries = 1;
        let monitor = HeartbeatMonitor::new(&config).unwrap();
        monitor.register_component(component("orders", "api", &registrar)).await;

        monitor.start().await;
        assert!(
            wait_until(Duration::from_secs(5), || {
                monitor.component_health("orders").unwrap().state == ComponentState::Failed
            })
            .await
        );
        assert!(wait_until(Duration::from_secs(1), || monitor.active_schedulers() == 0).await);

        let status = monitor.heartbeat_status();
        assert!(status.running);
        assert!(!status.components[0].scheduler_active);
        assert_eq!(status.unhealthy_count, 1);
        assert_eq!(registry.sequences_for("orders").await.len(), 2);
        monitor.stop().await;
    }

    /// Timeouts are classified separately from HTTP errors
    #[tokio::test]
    async fn test_slow_registry_counts_as_timeout() {
        let registry = MockRegistry {
            server: wiremock::MockServer::start().await,
        };
        wiremock::Mock::given(wiremock::matchers::path("/registration/heartbeat"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&registry.server)
            .await;
        let registrar = RecordingRegistrar::new();
        let mut config = fast_config(&registry.uri());
        config.registry.request_timeout_secs = 1;
        let monitor = HeartbeatMonitor::new(&config).unwrap();
        monitor.register_component(component("orders", "api", &registrar)).await;

        monitor.start().await;
        assert!(
            wait_until(Duration::from_secs(4), || {
                monitor.component_health("orders").unwrap().total_failures >= 1
            })
            .await
        );
        monitor.stop().await;

        let health = monitor.component_health("orders").unwrap();
        assert_eq!(health.last_error_kind, Some(FailureKind::Timeout));
        assert_eq!(health.state, ComponentState::Degraded);
    }
}

//! Registry availability probing integration tests

#[cfg(test)]
mod tests {
    use crate::common::fixtures::{component, fast_config};
    use crate::common::{MockRegistry, RecordingRegistrar, wait_until};
    use heartbeat_rs::HeartbeatMonitor;
    use std::time::Duration;

    async fn monitor_with_components(
        registry_url: &str,
        registrar: &std::sync::Arc<RecordingRegistrar>,
    ) -> HeartbeatMonitor {
        let monitor = HeartbeatMonitor::new(&fast_config(registry_url)).unwrap();
        for (id, kind) in [("primary-db", "database"), ("orders", "api"), ("jobs", "worker")] {
            monitor.register_component(component(id, kind, registrar)).await;
        }
        monitor
    }

    /// An outage reconnects every component exactly once
    #[tokio::test]
    async fn test_outage_reconnects_all_components() {
        let registry = MockRegistry::down().await;
        let registrar = RecordingRegistrar::new();
        let monitor = monitor_with_components(&registry.uri(), &registrar).await;

        assert!(!monitor.probe_registry().await);
        assert_eq!(registrar.total(), 3);
        for id in ["primary-db", "orders", "jobs"] {
            assert_eq!(registrar.count(id), 1);
        }
    }

    /// A reachable registry triggers no reconnection
    #[tokio::test]
    async fn test_reachable_registry_is_left_alone() {
        let registry = MockRegistry::healthy().await;
        let registrar = RecordingRegistrar::new();
        let monitor = monitor_with_components(&registry.uri(), &registrar).await;

        assert!(monitor.probe_registry().await);
        assert_eq!(registrar.total(), 0);
    }

    /// Only a 200 counts as available
    #[tokio::test]
    async fn test_non_200_health_is_an_outage() {
        let registry = MockRegistry {
            server: wiremock::MockServer::start().await,
        };
        registry.health_responds(204).await;
        let registrar = RecordingRegistrar::new();
        let monitor = monitor_with_components(&registry.uri(), &registrar).await;

        assert!(!monitor.probe_registry().await);
        assert_eq!(registrar.total(), 3);
    }

    /// Connection refused is treated as an outage
    #[tokio::test]
    async fn test_unreachable_registry() {
        let registrar = RecordingRegistrar::new();
        let monitor = monitor_with_components("http://127.0.0.1:1", &registrar).await;

        assert!(!monitor.probe_registry().await);
        assert_eq!(registrar.total(), 3);
    }

    /// The background prober runs once the monitor starts
    #[tokio::test]
    async fn test_background_prober_detects_outage() {
        let registry = MockRegistry::down().await;
        let registrar = RecordingRegistrar::new();
        let monitor = monitor_with_components(&registry.uri(), &registrar).await;

        monitor.start().await;
        assert!(
            wait_until(Duration::from_secs(2), || {
                ["primary-db", "orders", "jobs"]
                    .iter()
                    .all(|id| registrar.count(id) >= 1)
            })
            .await
        );
        monitor.stop().await;
    }
}

//! Configuration loading integration tests

#[cfg(test)]
mod tests {
    use heartbeat_rs::{ComponentType, Config, MonitorError};
    use std::io::Write;

    const SAMPLE: &str = r#"
registry:
  base_url: http://registry.internal:8001
monitor:
  default_interval_secs: 20
  max_retries: 10
  type_intervals:
    database: 45
components:
  - id: primary-db
    type: database
  - id: orders
    type: api
    version: 2.1.0
    interval_secs: 5
"#;

    /// A YAML file loads with defaults filled in
    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = Config::from_file(file.path()).await.unwrap();
        assert_eq!(config.registry.base_url, "http://registry.internal:8001");
        assert_eq!(config.registry.request_timeout_secs, 10);
        assert_eq!(config.monitor.default_interval_secs, 20);
        assert_eq!(config.monitor.max_retries, 10);
        assert_eq!(config.monitor.type_intervals[&ComponentType::Database], 45);
        assert!(config.monitor.stagger_enabled);
        assert!(!config.metrics.enabled);
        assert_eq!(config.components.len(), 2);
        assert_eq!(config.components[1].version, "2.1.0");
        assert_eq!(config.components[1].interval_secs, Some(5));
    }

    /// Missing files surface as configuration errors
    #[tokio::test]
    async fn test_missing_file() {
        let err = Config::from_file("/nonexistent/heartbeat.yaml").await.unwrap_err();
        assert!(matches!(err, MonitorError::Config(_)));
    }

    /// A component without an id is rejected
    #[test]
    fn test_component_without_id_rejected() {
        let err = Config::from_yaml("components:\n  - id: ''\n    type: api\n").unwrap_err();
        assert!(err.to_string().contains("Component"));
    }

    /// Serialized configuration loads back unchanged
    #[test]
    fn test_yaml_round_trip() {
        let config = Config::from_yaml(SAMPLE).unwrap();
        let reloaded = Config::from_yaml(&config.to_yaml().unwrap()).unwrap();
        assert_eq!(reloaded.components[0].component_type, ComponentType::Database);
        assert_eq!(reloaded.monitor.default_interval_secs, 20);
    }
}

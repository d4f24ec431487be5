//! Error types for the heartbeat monitor

use thiserror::Error;

/// Result type alias for the heartbeat monitor
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Main error type for the heartbeat monitor
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Registry answered with a non-2xx status
    #[error("Registry returned HTTP {status}: {body}")]
    Transport { status: u16, body: String },

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Serialization or programming faults while building a request
    #[error("Unexpected error: {0}")]
    Unexpected(String),

    /// Registry-wide outage detected by the availability prober
    #[error("Registry unavailable: {0}")]
    RegistryUnavailable(String),

    /// Unknown component id
    #[error("Not found: {0}")]
    NotFound(String),

    /// Live metrics sampling errors
    #[error("Metrics error: {0}")]
    Metrics(String),
}

/// Coarse failure classes used when recording and logging heartbeat outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Non-2xx answer or connection error
    Transport,
    /// The request did not complete within its deadline
    Timeout,
    /// Anything else: serialization, sampling, programming faults
    Unexpected,
    /// The registry as a whole is unreachable
    RegistryUnavailable,
}

impl MonitorError {
    /// Classify this error into a [`FailureKind`]
    pub fn kind(&self) -> FailureKind {
        match self {
            MonitorError::Transport { .. } => FailureKind::Transport,
            MonitorError::HttpClient(e) if e.is_timeout() => FailureKind::Timeout,
            MonitorError::HttpClient(_) => FailureKind::Transport,
            MonitorError::Timeout(_) => FailureKind::Timeout,
            MonitorError::RegistryUnavailable(_) => FailureKind::RegistryUnavailable,
            _ => FailureKind::Unexpected,
        }
    }
}

//! Helper functions for creating specific error types

use super::types::MonitorError;

/// Helper functions for creating specific errors
impl MonitorError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn transport<S: Into<String>>(status: u16, body: S) -> Self {
        Self::Transport {
            status,
            body: body.into(),
        }
    }

    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    pub fn unexpected<S: Into<String>>(message: S) -> Self {
        Self::Unexpected(message.into())
    }

    pub fn registry_unavailable<S: Into<String>>(message: S) -> Self {
        Self::RegistryUnavailable(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn metrics<S: Into<String>>(message: S) -> Self {
        Self::Metrics(message.into())
    }
}

//! Error types for the remote store.

use thiserror::Error;

/// Result type for transport operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors raised while talking to the remote service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Network or transport error.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
        /// Whether the request can be retried.
        retryable: bool,
    },

    /// The service answered with a non-success status.
    #[error("remote returned status {code}: {message}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Response body or reason.
        message: String,
    },

    /// The response could not be understood.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The remote configuration is unusable.
    #[error("invalid remote configuration: {0}")]
    InvalidConfig(String),

    /// The transport was closed.
    #[error("not connected to remote")]
    NotConnected,
}

impl SyncError {
    /// Creates a retryable transport error.
    pub fn transport_retryable(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable transport error.
    pub fn transport_fatal(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: false,
        }
    }

    /// Creates a status error.
    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self::Status {
            code,
            message: message.into(),
        }
    }

    /// Returns true if the request can be retried.
    ///
    /// Rate limiting (429) and server errors (5xx) are retryable; other
    /// statuses mean the request itself is wrong.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Transport { retryable, .. } => *retryable,
            SyncError::Status { code, .. } => *code == 429 || *code >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_errors() {
        assert!(SyncError::transport_retryable("connection reset").is_retryable());
        assert!(!SyncError::transport_fatal("invalid certificate").is_retryable());
        assert!(SyncError::status(503, "unavailable").is_retryable());
        assert!(SyncError::status(429, "slow down").is_retryable());
        assert!(!SyncError::status(403, "bad key").is_retryable());
        assert!(!SyncError::NotConnected.is_retryable());
    }

    #[test]
    fn error_display() {
        assert_eq!(SyncError::NotConnected.to_string(), "not connected to remote");
        let err = SyncError::status(404, "Requested entity was not found.");
        assert_eq!(
            err.to_string(),
            "remote returned status 404: Requested entity was not found."
        );
    }
}

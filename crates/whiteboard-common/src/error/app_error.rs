//! Application error types
//!
//! Unified error handling for the binaries.

use crate::config::ConfigError;
use crate::telemetry::TracingError;
use std::fmt;
use whiteboard_core::{DomainError, RemoteError};

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Tracing(#[from] TracingError),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Broker link errors
    #[error(transparent)]
    Remote(#[from] RemoteError),

    // I/O errors (binding, accepting)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Internal errors
    #[error("Internal error")]
    Internal(#[source] anyhow::Error),
}

impl AppError {
    /// Get error code for logs and exit reporting
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Tracing(_) => "TRACING_ERROR",
            Self::Domain(e) => e.code(),
            Self::Remote(RemoteError::Timeout(_)) => "REMOTE_TIMEOUT",
            Self::Remote(RemoteError::NotBound(_)) => "REMOTE_NOT_BOUND",
            Self::Remote(_) => "REMOTE_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if the error is caused by bad configuration
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::Config(_) => true,
            Self::Domain(e) => e.is_configuration(),
            _ => false,
        }
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }

    /// Create an internal error from a message
    #[must_use]
    pub fn msg(message: impl fmt::Display) -> Self {
        Self::Internal(anyhow::anyhow!(message.to_string()))
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_error_codes() {
        let err = AppError::from(ConfigError::MissingVar("PUBLISHER_HOST"));
        assert_eq!(err.error_code(), "CONFIG_ERROR");

        let err = AppError::from(DomainError::UnknownChannel("pink".to_string()));
        assert_eq!(err.error_code(), "UNKNOWN_CHANNEL");

        let err = AppError::from(RemoteError::Timeout(Duration::from_secs(5)));
        assert_eq!(err.error_code(), "REMOTE_TIMEOUT");

        let err = AppError::from(RemoteError::Closed);
        assert_eq!(err.error_code(), "REMOTE_ERROR");
    }

    #[test]
    fn test_is_configuration() {
        assert!(AppError::from(DomainError::EmptyPalette).is_configuration());
        assert!(AppError::from(ConfigError::InvalidValue("APP_ENV", "x".to_string())).is_configuration());
        assert!(!AppError::from(RemoteError::Closed).is_configuration());
    }

    #[test]
    fn test_helper_methods() {
        let err = AppError::msg("demo channel not configured");
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        assert_eq!(err.to_string(), "Internal error");
    }

    #[test]
    fn test_display_is_transparent() {
        let err = AppError::from(RemoteError::NotBound("publisher".to_string()));
        assert_eq!(err.to_string(), "Name not bound at broker: publisher");
    }
}

//! Remote-call errors

use std::time::Duration;
use thiserror::Error;

use crate::value_objects::ListenerId;

/// Failure of a call across the broker link
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Name not bound at broker: {0}")]
    NotBound(String),

    #[error("Broker rejected call: {0}")]
    Rejected(String),

    #[error("Remote call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Broker link closed")]
    Closed,

    #[error("No such exported object: {0}")]
    NoSuchObject(ListenerId),

    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl RemoteError {
    /// Create a connection error from any displayable cause
    pub fn connection(cause: impl std::fmt::Display) -> Self {
        Self::Connection(cause.to_string())
    }

    /// Check if the failure means the broker cannot be reached at all
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Closed | Self::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_unreachable() {
        assert!(RemoteError::Closed.is_unreachable());
        assert!(RemoteError::Timeout(Duration::from_secs(1)).is_unreachable());
        assert!(RemoteError::connection("refused").is_unreachable());
        assert!(!RemoteError::Rejected("nope".to_string()).is_unreachable());
        assert!(!RemoteError::NotBound("publisher".to_string()).is_unreachable());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            RemoteError::NotBound("publisher".to_string()).to_string(),
            "Name not bound at broker: publisher"
        );
    }
}

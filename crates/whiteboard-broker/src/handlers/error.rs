//! Handler error types

use thiserror::Error;
use whiteboard_core::protocol::{OpCode, ReplyPayload};
use whiteboard_core::DomainError;

/// Handler error type
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Invalid payload received
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Session has not looked up the publisher binding
    #[error("Session is not bound to the publisher")]
    NotBound,

    /// Lookup of a name the broker does not serve
    #[error("Name not bound: {0}")]
    UnknownBinding(String),

    /// Broker-only op code sent by a client
    #[error("Unexpected op code from client: {0}")]
    UnexpectedOp(OpCode),

    /// Domain error (from the property publisher)
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl HandlerError {
    /// Convert to the Reply sent back to the client
    pub fn to_reply(&self) -> ReplyPayload {
        match self {
            Self::NotBound | Self::UnknownBinding(_) => ReplyPayload::not_bound(self.to_string()),
            Self::InvalidPayload(_) | Self::UnexpectedOp(_) | Self::Domain(_) => {
                ReplyPayload::rejected(self.to_string())
            }
        }
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;

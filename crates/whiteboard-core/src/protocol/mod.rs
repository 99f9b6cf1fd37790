//! Broker wire protocol
//!
//! JSON text frames exchanged over the `/publisher` WebSocket.

mod messages;
mod opcodes;
mod payloads;

pub use messages::BrokerMessage;
pub use opcodes::OpCode;
pub use payloads::{
    InformPayload, LookupPayload, PropertyChangedPayload, RegisterPayload, ReplyPayload,
    ReplyStatus, SubscriptionPayload, UnsubscribeAllPayload,
};

/// Path of the broker WebSocket endpoint
pub const PUBLISHER_PATH: &str = "/publisher";

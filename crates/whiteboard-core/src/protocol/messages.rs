//! Broker message format
//!
//! Defines the envelope for all frames on the publisher WebSocket.

use super::{
    InformPayload, LookupPayload, OpCode, PropertyChangedPayload, RegisterPayload, ReplyPayload,
    SubscriptionPayload, UnsubscribeAllPayload,
};
use crate::events::PropertyChangeEvent;
use crate::value_objects::ListenerId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Broker message envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerMessage {
    /// Operation code
    pub op: OpCode,

    /// Request id (client requests and the matching Reply)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Operation payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<Value>,
}

fn encode<T: Serialize>(payload: T) -> Option<Value> {
    Some(serde_json::to_value(payload).unwrap_or_default())
}

impl BrokerMessage {
    fn request<T: Serialize>(op: OpCode, id: u64, payload: T) -> Self {
        Self {
            op,
            id: Some(id),
            d: encode(payload),
        }
    }

    // === Client Requests ===

    /// Create a Lookup request (op=1)
    #[must_use]
    pub fn lookup(id: u64, binding_name: impl Into<String>) -> Self {
        Self::request(
            OpCode::Lookup,
            id,
            LookupPayload {
                binding_name: binding_name.into(),
            },
        )
    }

    /// Create a RegisterProperty request (op=2)
    #[must_use]
    pub fn register_property(id: u64, property: impl Into<String>) -> Self {
        Self::request(
            OpCode::RegisterProperty,
            id,
            RegisterPayload {
                property: property.into(),
            },
        )
    }

    /// Create an Inform request (op=3)
    #[must_use]
    pub fn inform(
        id: u64,
        property: impl Into<String>,
        old_value: Option<Value>,
        new_value: Option<Value>,
    ) -> Self {
        Self::request(
            OpCode::Inform,
            id,
            InformPayload {
                property: property.into(),
                old_value,
                new_value,
            },
        )
    }

    /// Create a Subscribe request (op=4)
    #[must_use]
    pub fn subscribe(id: u64, listener: ListenerId, property: impl Into<String>) -> Self {
        Self::request(
            OpCode::Subscribe,
            id,
            SubscriptionPayload {
                listener,
                property: property.into(),
            },
        )
    }

    /// Create an Unsubscribe request (op=5)
    #[must_use]
    pub fn unsubscribe(id: u64, listener: ListenerId, property: impl Into<String>) -> Self {
        Self::request(
            OpCode::Unsubscribe,
            id,
            SubscriptionPayload {
                listener,
                property: property.into(),
            },
        )
    }

    /// Create an UnsubscribeAll request (op=6)
    #[must_use]
    pub fn unsubscribe_all(id: u64, listener: ListenerId) -> Self {
        Self::request(OpCode::UnsubscribeAll, id, UnsubscribeAllPayload { listener })
    }

    // === Broker Messages ===

    /// Create a Reply (op=10) to request `id`
    #[must_use]
    pub fn reply(id: Option<u64>, payload: ReplyPayload) -> Self {
        Self {
            op: OpCode::Reply,
            id,
            d: encode(payload),
        }
    }

    /// Create a PropertyChanged push (op=11)
    #[must_use]
    pub fn property_changed(listener: ListenerId, event: PropertyChangeEvent) -> Self {
        Self {
            op: OpCode::PropertyChanged,
            id: None,
            d: encode(PropertyChangedPayload { listener, event }),
        }
    }

    // === Parsing ===

    fn payload<T: DeserializeOwned>(&self, op: OpCode) -> Option<T> {
        if self.op != op {
            return None;
        }
        self.d.as_ref().and_then(|d| T::deserialize(d).ok())
    }

    /// Try to parse as a Lookup payload (op=1)
    pub fn as_lookup(&self) -> Option<LookupPayload> {
        self.payload(OpCode::Lookup)
    }

    /// Try to parse as a RegisterProperty payload (op=2)
    pub fn as_register_property(&self) -> Option<RegisterPayload> {
        self.payload(OpCode::RegisterProperty)
    }

    /// Try to parse as an Inform payload (op=3)
    pub fn as_inform(&self) -> Option<InformPayload> {
        self.payload(OpCode::Inform)
    }

    /// Try to parse as a Subscribe or Unsubscribe payload (op=4, op=5)
    pub fn as_subscription(&self) -> Option<SubscriptionPayload> {
        match self.op {
            OpCode::Subscribe | OpCode::Unsubscribe => self.payload(self.op),
            _ => None,
        }
    }

    /// Try to parse as an UnsubscribeAll payload (op=6)
    pub fn as_unsubscribe_all(&self) -> Option<UnsubscribeAllPayload> {
        self.payload(OpCode::UnsubscribeAll)
    }

    /// Try to parse as a Reply payload (op=10)
    pub fn as_reply(&self) -> Option<ReplyPayload> {
        self.payload(OpCode::Reply)
    }

    /// Try to parse as a PropertyChanged payload (op=11)
    pub fn as_property_changed(&self) -> Option<PropertyChangedPayload> {
        self.payload(OpCode::PropertyChanged)
    }

    // === Utilities ===

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl std::fmt::Display for BrokerMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "BrokerMessage(op={}, id={id})", self.op),
            None => write!(f, "BrokerMessage(op={})", self.op),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ReplyStatus;

    #[test]
    fn test_inform_wire_format() {
        let msg = BrokerMessage::inform(7, "red", None, Some(serde_json::json!({"x": 1.0, "y": 2.0})));
        let json: Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();

        assert_eq!(json["op"], 3);
        assert_eq!(json["id"], 7);
        assert_eq!(json["d"]["property"], "red");
        assert_eq!(json["d"]["new_value"]["x"], 1.0);
        assert!(json["d"].get("old_value").is_none());
    }

    #[test]
    fn test_parse_client_request() {
        let listener = ListenerId::generate();
        let json = BrokerMessage::subscribe(3, listener, "blue").to_json().unwrap();
        let msg = BrokerMessage::from_json(&json).unwrap();

        let payload = msg.as_subscription().unwrap();
        assert_eq!(payload.listener, listener);
        assert_eq!(payload.property, "blue");
        assert!(msg.as_unsubscribe_all().is_none());
    }

    #[test]
    fn test_parse_wrong_op_is_none() {
        let msg = BrokerMessage::lookup(1, "publisher");
        assert!(msg.as_register_property().is_none());
        assert_eq!(msg.as_lookup().unwrap().binding_name, "publisher");
    }

    #[test]
    fn test_reply_echoes_id() {
        let msg = BrokerMessage::reply(Some(42), ReplyPayload::rejected("no such property"));
        let parsed = BrokerMessage::from_json(&msg.to_json().unwrap()).unwrap();

        assert_eq!(parsed.id, Some(42));
        let reply = parsed.as_reply().unwrap();
        assert_eq!(reply.status, ReplyStatus::Rejected);
        assert_eq!(reply.reason.as_deref(), Some("no such property"));
    }

    #[test]
    fn test_unknown_op_fails_to_parse() {
        assert!(BrokerMessage::from_json(r#"{"op": 99}"#).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            BrokerMessage::unsubscribe_all(5, ListenerId::generate()).to_string(),
            "BrokerMessage(op=UnsubscribeAll (6), id=5)"
        );
    }
}

//! Payload definitions for broker messages

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::events::PropertyChangeEvent;
use crate::value_objects::ListenerId;

/// Payload for op 1 (Lookup)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupPayload {
    pub binding_name: String,
}

/// Payload for op 2 (RegisterProperty)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterPayload {
    pub property: String,
}

/// Payload for op 3 (Inform)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InformPayload {
    pub property: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
}

/// Payload for ops 4 and 5 (Subscribe, Unsubscribe)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionPayload {
    pub listener: ListenerId,
    pub property: String,
}

/// Payload for op 6 (UnsubscribeAll)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsubscribeAllPayload {
    pub listener: ListenerId,
}

/// Outcome carried by a Reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyStatus {
    Ok,
    /// The session has not looked up a valid binding name
    NotBound,
    /// The broker refused the request
    Rejected,
}

/// Payload for op 10 (Reply)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyPayload {
    pub status: ReplyStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ReplyPayload {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: ReplyStatus::Ok,
            reason: None,
        }
    }

    #[must_use]
    pub fn not_bound(reason: impl Into<String>) -> Self {
        Self {
            status: ReplyStatus::NotBound,
            reason: Some(reason.into()),
        }
    }

    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            status: ReplyStatus::Rejected,
            reason: Some(reason.into()),
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == ReplyStatus::Ok
    }
}

/// Payload for op 11 (PropertyChanged)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyChangedPayload {
    pub listener: ListenerId,
    #[serde(flatten)]
    pub event: PropertyChangeEvent,
}

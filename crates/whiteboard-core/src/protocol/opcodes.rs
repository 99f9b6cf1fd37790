//! Broker operation codes

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Broker operation codes
///
/// Client ops are requests and carry an `id` the broker echoes in its Reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    /// Resolve the publisher by binding name (client only)
    Lookup = 1,
    /// Register a property (client only)
    RegisterProperty = 2,
    /// Publish a property change (client only)
    Inform = 3,
    /// Subscribe a listener to a property (client only)
    Subscribe = 4,
    /// Unsubscribe a listener from a property (client only)
    Unsubscribe = 5,
    /// Unsubscribe a listener from every property (client only)
    UnsubscribeAll = 6,
    /// Result of a client request (broker only)
    Reply = 10,
    /// Push of a property change to a listener (broker only)
    PropertyChanged = 11,
}

impl OpCode {
    /// Create an `OpCode` from a raw integer value
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Lookup),
            2 => Some(Self::RegisterProperty),
            3 => Some(Self::Inform),
            4 => Some(Self::Subscribe),
            5 => Some(Self::Unsubscribe),
            6 => Some(Self::UnsubscribeAll),
            10 => Some(Self::Reply),
            11 => Some(Self::PropertyChanged),
            _ => None,
        }
    }

    /// Get the raw integer value
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Check if this op code can be sent by the client
    #[must_use]
    pub const fn is_client_op(self) -> bool {
        matches!(
            self,
            Self::Lookup
                | Self::RegisterProperty
                | Self::Inform
                | Self::Subscribe
                | Self::Unsubscribe
                | Self::UnsubscribeAll
        )
    }

    /// Check if this op code can be sent by the broker
    #[must_use]
    pub const fn is_broker_op(self) -> bool {
        matches!(self, Self::Reply | Self::PropertyChanged)
    }

    /// Get the name of this op code
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Lookup => "Lookup",
            Self::RegisterProperty => "RegisterProperty",
            Self::Inform => "Inform",
            Self::Subscribe => "Subscribe",
            Self::Unsubscribe => "Unsubscribe",
            Self::UnsubscribeAll => "UnsubscribeAll",
            Self::Reply => "Reply",
            Self::PropertyChanged => "PropertyChanged",
        }
    }
}

impl Serialize for OpCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for OpCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        Self::from_u8(value).ok_or_else(|| serde::de::Error::custom(format!("invalid op code: {value}")))
    }
}

impl std::fmt::Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.as_u8())
    }
}

//! Listener identifier - the address of an exported listener endpoint
//!
//! The broker never holds a reference to a client object. It holds a `ListenerId`
//! and pushes events addressed to it over the session that subscribed it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier of an exported listener endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListenerId(Uuid);

impl ListenerId {
    /// Generate a fresh random identifier
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// Error parsing a `ListenerId` from a string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid listener id: {0}")]
pub struct ListenerIdParseError(String);

impl FromStr for ListenerId {
    type Err = ListenerIdParseError;

    /// Accepts both the bare UUID and the `listener-` display form
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("listener-").unwrap_or(s);
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| ListenerIdParseError(s.to_string()))
    }
}

//! Property change event

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::{Channel, DrawEvent};

/// A change of a published property
///
/// Values are opaque to the broker; whiteboard clients put a [`DrawEvent`] in
/// `new_value` and leave `old_value` empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyChangeEvent {
    pub property: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
}

impl PropertyChangeEvent {
    #[must_use]
    pub fn new(property: impl Into<String>, old_value: Option<Value>, new_value: Option<Value>) -> Self {
        Self {
            property: property.into(),
            old_value,
            new_value,
        }
    }

    /// Event announcing a new dot on `channel`
    pub fn draw(channel: &Channel, event: DrawEvent) -> Result<Self, serde_json::Error> {
        Ok(Self::new(channel.name(), None, Some(event.to_value()?)))
    }

    /// Channel this event was published on
    #[must_use]
    pub fn channel(&self) -> Channel {
        Channel::new(self.property.clone())
    }

    /// Decode the new value as a dot
    ///
    /// Returns `None` if there is no new value or it is not a draw event.
    #[must_use]
    pub fn draw_event(&self) -> Option<DrawEvent> {
        self.new_value
            .as_ref()
            .and_then(|value| DrawEvent::from_value(value).ok())
    }
}

//! Channel entity and the local channel registry

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::Color;
use crate::error::DomainError;

/// Named logical drawing layer
///
/// Channels double as broker property names. They are created at startup from
/// configuration and never renamed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Channel(String);

impl Channel {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Property name used at the broker
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Channel {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Channel {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for Channel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed mapping from channel to display color
///
/// Built once from two parallel sequences and immutable afterwards.
#[derive(Debug, Clone)]
pub struct ChannelPalette {
    channels: Vec<Channel>,
    colors: HashMap<Channel, Color>,
}

impl ChannelPalette {
    /// Build a palette from parallel name and color sequences
    ///
    /// # Errors
    /// Fails if the sequences differ in length, are empty, or repeat a name.
    pub fn new(channels: Vec<Channel>, colors: Vec<Color>) -> Result<Self, DomainError> {
        if channels.len() != colors.len() {
            return Err(DomainError::PaletteMismatch {
                channels: channels.len(),
                colors: colors.len(),
            });
        }
        if channels.is_empty() {
            return Err(DomainError::EmptyPalette);
        }

        let mut map = HashMap::with_capacity(channels.len());
        for (channel, color) in channels.iter().zip(colors) {
            if map.insert(channel.clone(), color).is_some() {
                return Err(DomainError::DuplicateChannel(channel.to_string()));
            }
        }

        Ok(Self {
            channels,
            colors: map,
        })
    }

    /// Build a palette from configuration strings
    pub fn from_names<S: AsRef<str>>(channels: &[S], colors: &[S]) -> Result<Self, DomainError> {
        let channels = channels.iter().map(|c| Channel::new(c.as_ref().trim())).collect();
        let colors = colors
            .iter()
            .map(|c| c.as_ref().parse())
            .collect::<Result<Vec<Color>, _>>()?;
        Self::new(channels, colors)
    }

    /// Color bound to `channel`
    pub fn color_for(&self, channel: &Channel) -> Result<Color, DomainError> {
        self.colors
            .get(channel)
            .copied()
            .ok_or_else(|| DomainError::UnknownChannel(channel.to_string()))
    }

    /// Channels in configured order
    #[must_use]
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    #[must_use]
    pub fn contains(&self, channel: &Channel) -> bool {
        self.colors.contains_key(channel)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl Default for ChannelPalette {
    /// black, red, green and blue
    fn default() -> Self {
        let entries = [
            ("black", Color::BLACK),
            ("red", Color::RED),
            ("green", Color::GREEN),
            ("blue", Color::BLUE),
        ];

        Self {
            channels: entries.iter().map(|(name, _)| Channel::from(*name)).collect(),
            colors: entries
                .iter()
                .map(|(name, color)| (Channel::from(*name), *color))
                .collect(),
        }
    }
}

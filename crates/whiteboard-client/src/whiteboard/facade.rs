//! Whiteboard facade
//!
//! Owns the surface and the UI queue, so it must live on the drawing thread.
//! Pointer input draws locally and is broadcast; inbound dots are rendered
//! when the owner calls [`Whiteboard::process_pending`].

use super::{DrawRequest, DrawingSurface, UiQueue};
use crate::communicator::Communicator;
use std::collections::BTreeSet;
use std::sync::Arc;
use whiteboard_core::{Channel, ChannelPalette, DomainError, DrawEvent};

pub struct Whiteboard<S> {
    palette: ChannelPalette,
    publish_channel: Channel,
    subscribed: BTreeSet<Channel>,
    surface: S,
    ui: UiQueue,
    communicator: Arc<Communicator>,
}

impl<S: DrawingSurface> Whiteboard<S> {
    /// The first palette channel is the initial publish channel; nothing is
    /// subscribed yet.
    pub fn new(
        palette: ChannelPalette,
        surface: S,
        ui: UiQueue,
        communicator: Arc<Communicator>,
    ) -> Result<Self, DomainError> {
        let publish_channel = palette
            .channels()
            .first()
            .cloned()
            .ok_or(DomainError::EmptyPalette)?;

        Ok(Self {
            palette,
            publish_channel,
            subscribed: BTreeSet::new(),
            surface,
            ui,
            communicator,
        })
    }

    pub fn palette(&self) -> &ChannelPalette {
        &self.palette
    }

    pub fn communicator(&self) -> &Arc<Communicator> {
        &self.communicator
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn publish_channel(&self) -> &Channel {
        &self.publish_channel
    }

    /// Choose the channel pointer input is drawn and published on
    pub fn select_publish_channel(&mut self, channel: &Channel) -> Result<(), DomainError> {
        self.known(channel)?;
        self.publish_channel = channel.clone();
        Ok(())
    }

    /// Toggle the subscribe checkbox of `channel`
    pub fn set_subscribed(&mut self, channel: &Channel, subscribed: bool) -> Result<(), DomainError> {
        self.known(channel)?;
        if subscribed {
            self.subscribed.insert(channel.clone());
            self.communicator.subscribe_async(channel);
        } else {
            self.subscribed.remove(channel);
            self.communicator.unsubscribe_async(channel);
        }
        Ok(())
    }

    pub fn is_subscribed(&self, channel: &Channel) -> bool {
        self.subscribed.contains(channel)
    }

    /// Connect, register every channel and re-subscribe the checked ones
    pub async fn connect_to_publisher(&self) -> bool {
        if !self.communicator.connect().await {
            return false;
        }

        for channel in self.palette.channels() {
            self.communicator.register_async(channel);
        }
        for channel in self.palette.channels() {
            if self.subscribed.contains(channel) {
                self.communicator.subscribe_async(channel);
            }
        }
        true
    }

    pub fn pointer_pressed(&mut self, x: f64, y: f64) {
        self.draw_and_publish(x, y);
    }

    pub fn pointer_dragged(&mut self, x: f64, y: f64) {
        self.draw_and_publish(x, y);
    }

    /// Render every queued inbound dot
    ///
    /// Returns the number of dots rendered.
    pub fn process_pending(&mut self) -> usize {
        let mut rendered = 0;
        while let Some(request) = self.ui.try_next() {
            rendered += usize::from(self.render_request(&request));
        }
        rendered
    }

    /// Wait for the next inbound dot and render it with anything else queued
    ///
    /// Returns `None` once the UI context is closed.
    pub async fn process_next(&mut self) -> Option<usize> {
        let request = self.ui.next().await?;
        let rendered = usize::from(self.render_request(&request));
        Some(rendered + self.process_pending())
    }

    pub fn clear_panel(&mut self) {
        self.surface.clear();
    }

    pub async fn stop(&self) {
        self.communicator.stop().await;
    }

    fn known(&self, channel: &Channel) -> Result<(), DomainError> {
        if self.palette.contains(channel) {
            Ok(())
        } else {
            Err(DomainError::UnknownChannel(channel.name().to_string()))
        }
    }

    fn render_request(&mut self, request: &DrawRequest) -> bool {
        match self.palette.color_for(&request.channel) {
            Ok(color) => {
                self.surface.render(color, request.event.x, request.event.y);
                true
            }
            Err(e) => {
                tracing::warn!(channel = %request.channel, error = %e, "Dot on unknown channel skipped");
                false
            }
        }
    }

    fn draw_and_publish(&mut self, x: f64, y: f64) {
        // The publish channel always comes from the palette
        if let Ok(color) = self.palette.color_for(&self.publish_channel) {
            self.surface.render(color, x, y);
        }
        self.communicator
            .broadcast_async(&self.publish_channel, DrawEvent::new(x, y));
    }
}

impl<S> std::fmt::Debug for Whiteboard<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Whiteboard")
            .field("publish_channel", &self.publish_channel)
            .field("subscribed", &self.subscribed)
            .field("communicator", &self.communicator)
            .finish_non_exhaustive()
    }
}

//! Inbound listener endpoint

use crate::whiteboard::UiHandle;
use whiteboard_core::{PropertyChangeEvent, RemotePropertyListener};

/// Endpoint the broker pushes property changes to
///
/// Runs on the link's reader task and only forwards to the UI context.
#[derive(Debug, Clone)]
pub struct InboundListener {
    ui: UiHandle,
}

impl InboundListener {
    pub fn new(ui: UiHandle) -> Self {
        Self { ui }
    }
}

impl RemotePropertyListener for InboundListener {
    fn on_property_changed(&self, event: PropertyChangeEvent) {
        let Some(dot) = event.draw_event() else {
            tracing::warn!(property = %event.property, "Property change is not a draw event, dropped");
            return;
        };

        if !self.ui.request_draw_dot(event.channel(), dot) {
            tracing::debug!(property = %event.property, "UI context gone, draw event dropped");
        }
    }
}

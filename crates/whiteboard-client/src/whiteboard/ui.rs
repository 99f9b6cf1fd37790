//! UI execution context
//!
//! Draw requests posted from any thread are queued and drained, in posting
//! order, by the thread that owns the drawing surface.

use tokio::sync::mpsc;
use whiteboard_core::{Channel, DrawEvent};

/// A dot to render on the owner of the surface
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRequest {
    pub channel: Channel,
    pub event: DrawEvent,
}

/// Cloneable, non-blocking poster of draw requests
#[derive(Debug, Clone)]
pub struct UiHandle {
    tx: mpsc::UnboundedSender<DrawRequest>,
}

impl UiHandle {
    /// Post a dot to the UI context
    ///
    /// Returns `false` if the UI context has gone away.
    pub fn request_draw_dot(&self, channel: Channel, event: DrawEvent) -> bool {
        self.tx.send(DrawRequest { channel, event }).is_ok()
    }
}

/// Receiving end, owned by the drawing thread
#[derive(Debug)]
pub struct UiQueue {
    rx: mpsc::UnboundedReceiver<DrawRequest>,
}

impl UiQueue {
    /// Take the next request without waiting
    pub fn try_next(&mut self) -> Option<DrawRequest> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next request; `None` once every handle is dropped
    pub async fn next(&mut self) -> Option<DrawRequest> {
        self.rx.recv().await
    }
}

/// Create a UI context
pub fn ui_context() -> (UiHandle, UiQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (UiHandle { tx }, UiQueue { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_keep_posting_order() {
        let (ui, mut queue) = ui_context();
        let poster = ui.clone();
        assert!(ui.request_draw_dot("red".into(), DrawEvent::new(1.0, 1.0)));
        assert!(poster.request_draw_dot("blue".into(), DrawEvent::new(2.0, 2.0)));

        assert_eq!(queue.try_next().unwrap().channel, Channel::from("red"));
        assert_eq!(queue.try_next().unwrap().event, DrawEvent::new(2.0, 2.0));
        assert!(queue.try_next().is_none());
    }

    #[test]
    fn test_post_after_queue_dropped() {
        let (ui, queue) = ui_context();
        drop(queue);
        assert!(!ui.request_draw_dot("red".into(), DrawEvent::new(0.0, 0.0)));
    }
}

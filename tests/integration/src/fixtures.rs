//! Test fixtures
//!
//! Whiteboards wired to a broker over the real WebSocket transport.

use std::sync::Arc;

use whiteboard_client::{ui_context, Communicator, RasterCanvas, Whiteboard, WsConnector};
use whiteboard_common::{DispatcherConfig, PublisherConfig, WhiteboardConfig};

/// Canvas side used by every fixture board
pub const CANVAS_SIZE: u32 = 200;

/// Build a whiteboard with the default palette reaching `publisher`
///
/// Must be called within a tokio runtime.
pub fn whiteboard(publisher: &PublisherConfig) -> anyhow::Result<Whiteboard<RasterCanvas>> {
    let palette = WhiteboardConfig::default().palette()?;
    let (ui, queue) = ui_context();
    let communicator = Communicator::new(
        &DispatcherConfig::default(),
        Arc::new(WsConnector::from_config(publisher)),
        ui,
    );

    Ok(Whiteboard::new(
        palette,
        RasterCanvas::new(CANVAS_SIZE, CANVAS_SIZE),
        queue,
        Arc::new(communicator),
    )?)
}

//! Whiteboard facade
//!
//! The drawing side of a client: the UI execution context, the drawing
//! surface, and the facade tying them to a communicator.

mod canvas;
mod facade;
mod ui;

pub use canvas::{DrawingSurface, RasterCanvas};
pub use facade::Whiteboard;
pub use ui::{ui_context, DrawRequest, UiHandle, UiQueue};

//! Domain entities

mod channel;
mod color;
mod draw_event;

pub use channel::{Channel, ChannelPalette};
pub use color::Color;
pub use draw_event::DrawEvent;

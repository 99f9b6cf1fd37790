//! # whiteboard-client
//!
//! Client side of the collaborative whiteboard: the broker transport, the
//! communicator that drives it from the drawing thread, and a thin
//! whiteboard facade over a raster canvas.

pub mod communicator;
pub mod transport;
pub mod whiteboard;

pub use communicator::{Communicator, ConnectionManager, ConnectionState, Dispatcher, InboundListener};
pub use transport::{BrokerConnector, BrokerHandles, ListenerExports, RemoteLink, WsConnector};
pub use whiteboard::{ui_context, DrawRequest, DrawingSurface, RasterCanvas, UiHandle, UiQueue, Whiteboard};

//! Broker transport
//!
//! WebSocket link to the broker, the table of exported listeners it pushes
//! events to, and the connector that resolves both broker references.

mod connector;
mod exports;
mod link;

pub use connector::{BrokerConnector, BrokerHandles, WsConnector};
pub use exports::ListenerExports;
pub use link::RemoteLink;

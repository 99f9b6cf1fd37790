//! Communicator
//!
//! Keeps the broker link, runs outbound remote calls on a fixed worker pool
//! and hands inbound events to the UI context.

mod communicator;
mod connection;
mod dispatcher;
mod listener;
#[cfg(test)]
pub(crate) mod testing;

pub use communicator::Communicator;
pub use connection::{ConnectionManager, ConnectionState};
pub use dispatcher::Dispatcher;
pub use listener::InboundListener;

//! Connection management
//!
//! Tracks WebSocket sessions and the listeners each of them hosts.

mod connection;
mod manager;

pub use connection::Connection;
pub use manager::ConnectionManager;

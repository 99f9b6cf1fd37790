//! # whiteboard-broker
//!
//! Reference broker: keeps a registry of named properties, the listeners
//! subscribed to each, and pushes every published change to those listeners
//! over their owning WebSocket session.

pub mod broadcast;
pub mod connection;
pub mod handlers;
pub mod server;

pub use server::{create_app, create_broker_state, run, serve, BrokerState};

//! Integration test utilities for the whiteboard
//!
//! Spawns a real broker on a loopback port and builds whiteboards wired to
//! it over WebSocket.

pub mod helpers;
pub mod fixtures;

pub use helpers::*;
pub use fixtures::*;

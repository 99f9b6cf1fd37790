//! # whiteboard-core
//!
//! Domain layer containing channels, draw events, the broker contracts and the wire protocol.
//! This crate has zero dependencies on infrastructure (sockets, runtimes, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod protocol;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Channel, ChannelPalette, Color, DrawEvent};
pub use error::{DomainError, RemoteError};
pub use events::PropertyChangeEvent;
pub use traits::{
    RemotePropertyListener, RemotePublisherForDomain, RemotePublisherForListener, RemoteResult,
};
pub use value_objects::ListenerId;

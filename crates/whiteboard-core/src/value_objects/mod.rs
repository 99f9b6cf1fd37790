//! Value objects - immutable types that represent domain concepts

mod listener_id;

pub use listener_id::{ListenerId, ListenerIdParseError};

//! Broker contracts (ports)

mod publisher;

pub use publisher::{
    RemotePropertyListener, RemotePublisherForDomain, RemotePublisherForListener, RemoteResult,
};

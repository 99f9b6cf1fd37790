//! Broker state
//!
//! Application state for the broker server.

use crate::broadcast::PropertyPublisher;
use crate::connection::ConnectionManager;
use std::sync::Arc;

/// Broker application state
///
/// Holds all shared dependencies for the broker server.
#[derive(Clone)]
pub struct BrokerState {
    /// Connection manager for WebSocket sessions
    connection_manager: Arc<ConnectionManager>,
    /// Property registry and fan-out
    publisher: Arc<PropertyPublisher>,
    /// Name clients must look up before issuing requests
    binding_name: Arc<str>,
}

impl BrokerState {
    /// Create a new broker state serving `binding_name`
    pub fn new(binding_name: impl Into<Arc<str>>) -> Self {
        Self {
            connection_manager: ConnectionManager::new_shared(),
            publisher: PropertyPublisher::new_shared(),
            binding_name: binding_name.into(),
        }
    }

    /// Get the connection manager
    pub fn connection_manager(&self) -> &ConnectionManager {
        &self.connection_manager
    }

    /// Get the property publisher
    pub fn publisher(&self) -> &PropertyPublisher {
        &self.publisher
    }

    pub fn binding_name(&self) -> &str {
        &self.binding_name
    }
}

impl std::fmt::Debug for BrokerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrokerState")
            .field("connection_manager", &self.connection_manager)
            .field("publisher", &self.publisher)
            .field("binding_name", &self.binding_name)
            .finish()
    }
}

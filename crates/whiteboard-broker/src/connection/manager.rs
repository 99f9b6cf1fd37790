//! Connection manager
//!
//! Manages all active WebSocket sessions using DashMap for thread-safe access.

use super::Connection;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use whiteboard_core::protocol::BrokerMessage;

/// Manages all active WebSocket sessions
pub struct ConnectionManager {
    /// Active connections by session ID
    connections: DashMap<String, Arc<Connection>>,
}

impl ConnectionManager {
    /// Create a new connection manager
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Create a new connection manager wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a new connection
    pub fn add_connection(
        &self,
        session_id: String,
        sender: mpsc::Sender<BrokerMessage>,
    ) -> Arc<Connection> {
        let connection = Connection::new(session_id.clone(), sender);
        self.connections.insert(session_id.clone(), connection.clone());

        tracing::debug!(session_id = %session_id, "Connection added");

        connection
    }

    /// Remove a connection, returning it if it was present
    pub fn remove_connection(&self, session_id: &str) -> Option<Arc<Connection>> {
        let removed = self.connections.remove(session_id).map(|(_, c)| c);
        if removed.is_some() {
            tracing::debug!(session_id = %session_id, "Connection removed");
        }
        removed
    }

    /// Get the total number of active connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connections", &self.connections.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove_connection() {
        let manager = ConnectionManager::new();
        let (tx, _rx) = mpsc::channel(10);

        let conn = manager.add_connection("session1".to_string(), tx);
        assert_eq!(manager.connection_count(), 1);

        let removed = manager.remove_connection("session1").unwrap();
        assert!(Arc::ptr_eq(&removed, &conn));
        assert!(manager.remove_connection("session1").is_none());
        assert_eq!(manager.connection_count(), 0);
    }
}

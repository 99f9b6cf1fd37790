//! Broker connection state

use crate::transport::{BrokerConnector, BrokerHandles, ListenerExports};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Link state as seen by the communicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionState {
    Disconnected = 0,
    Connected = 1,
}

impl ConnectionState {
    const fn from_u8(value: u8) -> Self {
        if value == Self::Connected as u8 {
            Self::Connected
        } else {
            Self::Disconnected
        }
    }
}

/// Owns the broker references and the connected flag
///
/// The references and the flag change together under the write lock; the
/// flag is also readable without any lock.
pub struct ConnectionManager {
    connector: Arc<dyn BrokerConnector>,
    state: AtomicU8,
    handles: RwLock<Option<BrokerHandles>>,
}

impl ConnectionManager {
    pub fn new(connector: Arc<dyn BrokerConnector>) -> Self {
        Self {
            connector,
            state: AtomicU8::new(ConnectionState::Disconnected as u8),
            handles: RwLock::new(None),
        }
    }

    /// Locate the broker and resolve both references
    ///
    /// Failures are logged and leave the manager disconnected. Connecting
    /// while connected replaces the references.
    pub async fn connect(&self, exports: Arc<ListenerExports>) -> bool {
        match self.connector.locate(exports).await {
            Ok(handles) => {
                let mut guard = self.handles.write();
                *guard = Some(handles);
                self.state.store(ConnectionState::Connected as u8, Ordering::Release);
                drop(guard);

                tracing::info!("Connected to publisher");
                true
            }
            Err(e) => {
                let mut guard = self.handles.write();
                *guard = None;
                self.state.store(ConnectionState::Disconnected as u8, Ordering::Release);
                drop(guard);

                tracing::warn!(error = %e, "Cannot connect to publisher");
                false
            }
        }
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Current references, `None` while disconnected
    pub fn handles(&self) -> Option<BrokerHandles> {
        self.handles.read().clone()
    }

    /// Drop the references and mark the link disconnected
    pub fn disconnect(&self) -> Option<BrokerHandles> {
        let mut guard = self.handles.write();
        self.state.store(ConnectionState::Disconnected as u8, Ordering::Release);
        guard.take()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::communicator::testing::{SpyBroker, SpyConnector};

    #[tokio::test]
    async fn test_connect_and_disconnect() {
        let broker = SpyBroker::new_shared();
        let manager = ConnectionManager::new(SpyConnector::reachable(broker.clone()));
        assert_eq!(manager.state(), ConnectionState::Disconnected);
        assert!(manager.handles().is_none());

        assert!(manager.connect(ListenerExports::new_shared()).await);
        assert!(manager.is_connected());
        assert!(manager.handles().is_some());

        // Reconnecting while connected locates again
        assert!(manager.connect(ListenerExports::new_shared()).await);
        assert_eq!(broker.locate_count(), 2);

        assert!(manager.disconnect().is_some());
        assert!(!manager.is_connected());
        assert!(manager.handles().is_none());
    }

    #[tokio::test]
    async fn test_failed_connect_stays_disconnected() {
        let manager = ConnectionManager::new(SpyConnector::unreachable());
        assert!(!manager.connect(ListenerExports::new_shared()).await);
        assert_eq!(manager.state(), ConnectionState::Disconnected);
        assert!(manager.handles().is_none());
    }

    #[tokio::test]
    async fn test_failed_reconnect_drops_old_references() {
        let broker = SpyBroker::new_shared();
        let connector = SpyConnector::reachable(broker);
        let manager = ConnectionManager::new(connector.clone());
        assert!(manager.connect(ListenerExports::new_shared()).await);

        connector.set_reachable(false);
        assert!(!manager.connect(ListenerExports::new_shared()).await);
        assert!(!manager.is_connected());
        assert!(manager.handles().is_none());
    }
}

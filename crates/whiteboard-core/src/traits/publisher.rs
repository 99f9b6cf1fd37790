//! Broker contracts - the two faces of the remote publisher and the listener callback
//!
//! The broker exposes one interface to publishers ("domain" side) and one to
//! listeners. Clients hold a reference to each; in the shipped transport both
//! are backed by the same link.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::RemoteError;
use crate::events::PropertyChangeEvent;
use crate::value_objects::ListenerId;

/// Result type for remote calls
pub type RemoteResult<T> = Result<T, RemoteError>;

// ============================================================================
// Domain side
// ============================================================================

#[async_trait]
pub trait RemotePublisherForDomain: Send + Sync {
    /// Register a property; registering an existing property changes nothing
    async fn register_property(&self, property: &str) -> RemoteResult<()>;

    /// Publish a change of `property` to every subscribed listener
    async fn inform(
        &self,
        property: &str,
        old_value: Option<Value>,
        new_value: Option<Value>,
    ) -> RemoteResult<()>;
}

// ============================================================================
// Listener side
// ============================================================================

#[async_trait]
pub trait RemotePublisherForListener: Send + Sync {
    /// Subscribe `listener` to changes of `property`
    async fn subscribe_remote_listener(
        &self,
        listener: ListenerId,
        property: &str,
    ) -> RemoteResult<()>;

    /// Unsubscribe `listener` from `property`
    async fn unsubscribe_remote_listener(
        &self,
        listener: ListenerId,
        property: &str,
    ) -> RemoteResult<()>;

    /// Unsubscribe `listener` from every property
    async fn unsubscribe_remote_listener_all(&self, listener: ListenerId) -> RemoteResult<()>;
}

// ============================================================================
// Listener callback
// ============================================================================

/// Inbound endpoint invoked when a subscribed property changes
///
/// Called on the network callback context. Implementations must return
/// promptly and hand any real work to their own execution context.
pub trait RemotePropertyListener: Send + Sync {
    fn on_property_changed(&self, event: PropertyChangeEvent);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct InMemoryPublisher {
        subscriptions: Mutex<HashMap<String, Vec<ListenerId>>>,
    }

    #[async_trait]
    impl RemotePublisherForListener for InMemoryPublisher {
        async fn subscribe_remote_listener(
            &self,
            listener: ListenerId,
            property: &str,
        ) -> RemoteResult<()> {
            self.subscriptions
                .lock()
                .unwrap()
                .entry(property.to_string())
                .or_default()
                .push(listener);
            Ok(())
        }

        async fn unsubscribe_remote_listener(
            &self,
            listener: ListenerId,
            property: &str,
        ) -> RemoteResult<()> {
            if let Some(listeners) = self.subscriptions.lock().unwrap().get_mut(property) {
                listeners.retain(|l| *l != listener);
            }
            Ok(())
        }

        async fn unsubscribe_remote_listener_all(&self, listener: ListenerId) -> RemoteResult<()> {
            for listeners in self.subscriptions.lock().unwrap().values_mut() {
                listeners.retain(|l| *l != listener);
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_listener_contract_as_trait_object() {
        let publisher = Arc::new(InMemoryPublisher::default());
        let side: Arc<dyn RemotePublisherForListener> = publisher.clone();
        let listener = ListenerId::generate();

        side.subscribe_remote_listener(listener, "red").await.unwrap();
        side.subscribe_remote_listener(listener, "blue").await.unwrap();
        side.unsubscribe_remote_listener(listener, "red").await.unwrap();
        assert_eq!(publisher.subscriptions.lock().unwrap()["blue"], vec![listener]);
        assert!(publisher.subscriptions.lock().unwrap()["red"].is_empty());

        side.unsubscribe_remote_listener_all(listener).await.unwrap();
        assert!(publisher.subscriptions.lock().unwrap()["blue"].is_empty());
    }
}

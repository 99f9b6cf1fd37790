//! Property publisher
//!
//! Registry of properties and their subscribed listeners. Published changes
//! are fanned out as `PropertyChanged` frames on the session that hosts each
//! listener.

use crate::connection::Connection;
use dashmap::DashMap;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use whiteboard_core::protocol::BrokerMessage;
use whiteboard_core::{DomainError, ListenerId, PropertyChangeEvent};

/// Property registry and fan-out
pub struct PropertyPublisher {
    /// Registered properties and the listeners subscribed to each
    properties: DashMap<String, HashSet<ListenerId>>,

    /// Session hosting each known listener
    routes: DashMap<ListenerId, Arc<Connection>>,
}

impl PropertyPublisher {
    #[must_use]
    pub fn new() -> Self {
        Self {
            properties: DashMap::new(),
            routes: DashMap::new(),
        }
    }

    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a property
    ///
    /// Returns `true` if the property was not registered before.
    pub fn register(&self, property: &str) -> bool {
        let mut created = false;
        self.properties.entry(property.to_string()).or_insert_with(|| {
            created = true;
            HashSet::new()
        });

        if created {
            tracing::debug!(property = %property, "Property registered");
        }
        created
    }

    pub fn is_registered(&self, property: &str) -> bool {
        self.properties.contains_key(property)
    }

    /// Subscribe `listener`, hosted by `connection`, to `property`
    ///
    /// An unregistered property is registered on the way.
    pub fn subscribe(&self, connection: &Arc<Connection>, listener: ListenerId, property: &str) {
        self.properties
            .entry(property.to_string())
            .or_default()
            .insert(listener);

        self.routes.insert(listener, connection.clone());
        connection.add_listener(listener);

        tracing::trace!(
            session_id = %connection.session_id(),
            listener = %listener,
            property = %property,
            "Listener subscribed"
        );
    }

    /// Unsubscribe `listener` from `property`
    ///
    /// Returns `false` if the listener was not subscribed.
    pub fn unsubscribe(&self, listener: ListenerId, property: &str) -> bool {
        let removed = self
            .properties
            .get_mut(property)
            .is_some_and(|mut listeners| listeners.remove(&listener));

        tracing::trace!(listener = %listener, property = %property, removed, "Listener unsubscribed");
        removed
    }

    /// Unsubscribe `listener` from every property and forget its route
    ///
    /// Returns the number of subscriptions removed.
    pub fn unsubscribe_all(&self, listener: ListenerId) -> usize {
        let mut removed = 0;
        for mut entry in self.properties.iter_mut() {
            if entry.value_mut().remove(&listener) {
                removed += 1;
            }
        }

        if let Some((_, connection)) = self.routes.remove(&listener) {
            connection.remove_listener(listener);
        }

        tracing::debug!(listener = %listener, removed, "Listener unsubscribed from all properties");
        removed
    }

    /// Publish a change of `property` to every subscribed listener
    ///
    /// Returns the number of listeners the change was delivered to.
    pub async fn inform(
        &self,
        property: &str,
        old_value: Option<Value>,
        new_value: Option<Value>,
    ) -> Result<usize, DomainError> {
        let listeners: Vec<ListenerId> = self
            .properties
            .get(property)
            .ok_or_else(|| DomainError::PropertyNotRegistered(property.to_string()))?
            .iter()
            .copied()
            .collect();

        let targets: Vec<(ListenerId, Arc<Connection>)> = listeners
            .into_iter()
            .filter_map(|listener| self.routes.get(&listener).map(|c| (listener, c.clone())))
            .collect();

        let event = PropertyChangeEvent::new(property, old_value, new_value);
        let mut sent = 0;

        for (listener, connection) in targets {
            let message = BrokerMessage::property_changed(listener, event.clone());
            if connection.send(message).await.is_ok() {
                sent += 1;
            } else {
                tracing::debug!(
                    session_id = %connection.session_id(),
                    listener = %listener,
                    "Listener session closed, change dropped"
                );
            }
        }

        tracing::trace!(property = %property, sent, "Property change published");
        Ok(sent)
    }

    /// Drop every listener hosted by a closed session
    pub fn remove_session(&self, connection: &Connection) -> usize {
        let listeners = connection.listeners();
        for listener in &listeners {
            self.unsubscribe_all(*listener);
        }
        listeners.len()
    }

    /// Number of listeners subscribed to `property`
    pub fn subscriber_count(&self, property: &str) -> usize {
        self.properties.get(property).map_or(0, |l| l.len())
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }
}

impl Default for PropertyPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PropertyPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyPublisher")
            .field("properties", &self.properties.len())
            .field("listeners", &self.routes.len())
            .finish()
    }
}

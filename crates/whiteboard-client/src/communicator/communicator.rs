//! Communicator
//!
//! Entry point used by the drawing thread. Every outbound operation returns
//! immediately; the remote call runs later on the dispatcher pool and is
//! dropped outright while the link is down.

use super::{ConnectionManager, Dispatcher, InboundListener};
use crate::transport::{BrokerConnector, BrokerHandles, ListenerExports};
use crate::whiteboard::UiHandle;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use whiteboard_common::DispatcherConfig;
use whiteboard_core::{Channel, DrawEvent, ListenerId, RemoteResult};

/// Client side of the whiteboard's publish/subscribe channel
pub struct Communicator {
    connection: Arc<ConnectionManager>,
    dispatcher: Dispatcher,
    exports: Arc<ListenerExports>,
    listener_id: ListenerId,
    stopped: AtomicBool,
}

impl Communicator {
    /// Export the inbound endpoint for `ui` and start the worker pool
    ///
    /// Must be called within a tokio runtime.
    pub fn new(config: &DispatcherConfig, connector: Arc<dyn BrokerConnector>, ui: UiHandle) -> Self {
        let exports = ListenerExports::new_shared();
        let listener_id = exports.export(Arc::new(InboundListener::new(ui)));

        Self {
            connection: Arc::new(ConnectionManager::new(connector)),
            dispatcher: Dispatcher::new(config.worker_threads),
            exports,
            listener_id,
            stopped: AtomicBool::new(false),
        }
    }

    /// Stable id the broker addresses this client's endpoint by
    pub fn listener_id(&self) -> ListenerId {
        self.listener_id
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Locate the broker; failures are logged, never returned
    pub async fn connect(&self) -> bool {
        if self.stopped.load(Ordering::Acquire) {
            tracing::warn!("Communicator stopped, connect refused");
            return false;
        }
        if !self.connection.connect(Arc::clone(&self.exports)).await {
            return false;
        }

        // A stop that ran while locating has already passed its disconnect
        if self.stopped.load(Ordering::Acquire) {
            self.connection.disconnect();
            tracing::warn!("Communicator stopped while connecting, link dropped");
            return false;
        }
        true
    }

    pub fn register_async(&self, channel: &Channel) {
        let property = channel.clone();
        self.submit_remote("register", channel, move |handles| async move {
            handles.domain.register_property(property.name()).await
        });
    }

    pub fn subscribe_async(&self, channel: &Channel) {
        let (property, listener) = (channel.clone(), self.listener_id);
        self.submit_remote("subscribe", channel, move |handles| async move {
            handles
                .listener
                .subscribe_remote_listener(listener, property.name())
                .await
        });
    }

    pub fn unsubscribe_async(&self, channel: &Channel) {
        let (property, listener) = (channel.clone(), self.listener_id);
        self.submit_remote("unsubscribe", channel, move |handles| async move {
            handles
                .listener
                .unsubscribe_remote_listener(listener, property.name())
                .await
        });
    }

    /// Publish a dot on `channel`
    pub fn broadcast_async(&self, channel: &Channel, event: DrawEvent) {
        if !self.is_connected() {
            tracing::trace!(channel = %channel, "Not connected, broadcast dropped");
            return;
        }

        let value = match event.to_value() {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(channel = %channel, error = %e, "Cannot encode draw event");
                return;
            }
        };

        let property = channel.clone();
        self.submit_remote("broadcast", channel, move |handles| async move {
            handles.domain.inform(property.name(), None, Some(value)).await
        });
    }

    /// Tear down: unsubscribe everywhere, unexport, drain the pool, disconnect
    ///
    /// Each step logs its failure and the next step still runs. Only the
    /// first call has any effect.
    pub async fn stop(&self) {
        if self.stopped.swap(true, Ordering::AcqRel) {
            tracing::debug!("Communicator already stopped");
            return;
        }

        if let Some(handles) = self.connection.handles() {
            if let Err(e) = handles
                .listener
                .unsubscribe_remote_listener_all(self.listener_id)
                .await
            {
                tracing::error!(listener = %self.listener_id, error = %e, "Cannot unsubscribe from publisher");
            }
        }

        if let Err(e) = self.exports.unexport(self.listener_id) {
            tracing::error!(listener = %self.listener_id, error = %e, "Cannot unexport listener");
        }

        if !self.dispatcher.shutdown().await {
            tracing::warn!("Dispatcher was already shut down");
        }

        self.connection.disconnect();
        tracing::info!(listener = %self.listener_id, "Communicator stopped");
    }

    /// Submit a remote call if connected
    ///
    /// The job re-reads the references when it runs and is skipped if the
    /// link went away in the meantime.
    fn submit_remote<F, Fut>(&self, task: &'static str, channel: &Channel, call: F)
    where
        F: FnOnce(BrokerHandles) -> Fut + Send + 'static,
        Fut: Future<Output = RemoteResult<()>> + Send + 'static,
    {
        if !self.is_connected() {
            tracing::trace!(task, channel = %channel, "Not connected, call dropped");
            return;
        }

        let connection = Arc::clone(&self.connection);
        let channel = channel.clone();
        self.dispatcher.submit(task, async move {
            let Some(handles) = connection.handles() else {
                tracing::debug!(task, channel = %channel, "Link dropped before job ran, skipped");
                return;
            };

            if let Err(e) = call(handles).await {
                tracing::error!(task, channel = %channel, error = %e, "Remote call failed");
            }
        });
    }
}

impl std::fmt::Debug for Communicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Communicator")
            .field("listener_id", &self.listener_id)
            .field("connection", &self.connection)
            .field("dispatcher", &self.dispatcher)
            .field("stopped", &self.stopped.load(Ordering::Relaxed))
            .finish()
    }
}

//! In-memory broker double for communicator tests

use crate::transport::{BrokerConnector, BrokerHandles, ListenerExports};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use whiteboard_core::{
    ListenerId, PropertyChangeEvent, RemoteError, RemotePublisherForDomain,
    RemotePublisherForListener, RemoteResult,
};

/// A recorded broker invocation
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Register(String),
    Inform(String, Option<Value>),
    Subscribe(ListenerId, String),
    Unsubscribe(ListenerId, String),
    UnsubscribeAll(ListenerId),
}

/// Records every call and fans informs out to subscribed exports
#[derive(Default)]
pub struct SpyBroker {
    calls: Mutex<Vec<Call>>,
    subscriptions: Mutex<HashMap<String, HashSet<ListenerId>>>,
    exports: Mutex<Option<Arc<ListenerExports>>>,
    locates: AtomicUsize,
    failing: AtomicBool,
    delay: Mutex<Option<Duration>>,
}

impl SpyBroker {
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn informs(&self) -> Vec<(String, Option<Value>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Inform(property, value) => Some((property, value)),
                _ => None,
            })
            .collect()
    }

    pub fn locate_count(&self) -> usize {
        self.locates.load(Ordering::SeqCst)
    }

    /// Make every later call fail with `Rejected`
    pub fn fail_calls(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Make every later call take `delay`
    pub fn slow_calls(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// Push a change to the subscribers of `property`, as the broker would
    pub fn push(&self, property: &str, new_value: Value) -> usize {
        let Some(exports) = self.exports.lock().clone() else {
            return 0;
        };
        let listeners: Vec<ListenerId> = self
            .subscriptions
            .lock()
            .get(property)
            .map(|l| l.iter().copied().collect())
            .unwrap_or_default();

        listeners
            .into_iter()
            .filter(|listener| {
                exports.deliver(
                    *listener,
                    PropertyChangeEvent::new(property, None, Some(new_value.clone())),
                )
            })
            .count()
    }

    async fn record(&self, call: Call) -> RemoteResult<()> {
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(RemoteError::Rejected("spy failure".to_string()));
        }
        self.calls.lock().push(call);
        Ok(())
    }
}

#[async_trait]
impl RemotePublisherForDomain for SpyBroker {
    async fn register_property(&self, property: &str) -> RemoteResult<()> {
        self.record(Call::Register(property.to_string())).await
    }

    async fn inform(
        &self,
        property: &str,
        _old_value: Option<Value>,
        new_value: Option<Value>,
    ) -> RemoteResult<()> {
        self.record(Call::Inform(property.to_string(), new_value)).await
    }
}

#[async_trait]
impl RemotePublisherForListener for SpyBroker {
    async fn subscribe_remote_listener(&self, listener: ListenerId, property: &str) -> RemoteResult<()> {
        self.record(Call::Subscribe(listener, property.to_string())).await?;
        self.subscriptions
            .lock()
            .entry(property.to_string())
            .or_default()
            .insert(listener);
        Ok(())
    }

    async fn unsubscribe_remote_listener(&self, listener: ListenerId, property: &str) -> RemoteResult<()> {
        self.record(Call::Unsubscribe(listener, property.to_string())).await?;
        if let Some(listeners) = self.subscriptions.lock().get_mut(property) {
            listeners.remove(&listener);
        }
        Ok(())
    }

    async fn unsubscribe_remote_listener_all(&self, listener: ListenerId) -> RemoteResult<()> {
        self.record(Call::UnsubscribeAll(listener)).await?;
        for listeners in self.subscriptions.lock().values_mut() {
            listeners.remove(&listener);
        }
        Ok(())
    }
}

/// Connector handing out a [`SpyBroker`], or failing while unreachable
pub struct SpyConnector {
    broker: Arc<SpyBroker>,
    reachable: AtomicBool,
    locate_delay: Mutex<Option<Duration>>,
}

impl SpyConnector {
    pub fn reachable(broker: Arc<SpyBroker>) -> Arc<Self> {
        Arc::new(Self {
            broker,
            reachable: AtomicBool::new(true),
            locate_delay: Mutex::new(None),
        })
    }

    pub fn unreachable() -> Arc<Self> {
        let connector = Self::reachable(SpyBroker::new_shared());
        connector.set_reachable(false);
        connector
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Make every later locate take `delay`
    pub fn slow_locate(&self, delay: Duration) {
        *self.locate_delay.lock() = Some(delay);
    }
}

#[async_trait]
impl BrokerConnector for SpyConnector {
    async fn locate(&self, exports: Arc<ListenerExports>) -> RemoteResult<BrokerHandles> {
        let delay = *self.locate_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if !self.reachable.load(Ordering::SeqCst) {
            return Err(RemoteError::connection("connection refused"));
        }

        self.broker.locates.fetch_add(1, Ordering::SeqCst);
        *self.broker.exports.lock() = Some(exports);
        Ok(BrokerHandles {
            domain: self.broker.clone(),
            listener: self.broker.clone(),
        })
    }
}

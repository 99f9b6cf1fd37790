//! Request/response link over a broker WebSocket
//!
//! One writer task owns the sink, one reader task owns the stream. Calls
//! are correlated with their Reply through the request id.

use super::ListenerExports;
use async_trait::async_trait;
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use whiteboard_core::protocol::{BrokerMessage, OpCode, ReplyPayload, ReplyStatus};
use whiteboard_core::{
    ListenerId, RemoteError, RemotePublisherForDomain, RemotePublisherForListener, RemoteResult,
};

type PendingCalls = DashMap<u64, oneshot::Sender<ReplyPayload>>;

/// Live link to the broker
///
/// Implements both broker contracts. Dropping the last reference closes the
/// socket once queued frames are written.
pub struct RemoteLink {
    outbound: mpsc::UnboundedSender<BrokerMessage>,
    pending: Arc<PendingCalls>,
    next_id: AtomicU64,
    closed: Arc<AtomicBool>,
    call_timeout: Duration,
    reader: JoinHandle<()>,
}

impl RemoteLink {
    /// Open a link to `url`, routing pushed events to `exports`
    pub async fn connect(
        url: &str,
        exports: Arc<ListenerExports>,
        call_timeout: Duration,
    ) -> RemoteResult<Arc<Self>> {
        let (socket, _) = tokio::time::timeout(call_timeout, tokio_tungstenite::connect_async(url))
            .await
            .map_err(|_| RemoteError::Timeout(call_timeout))?
            .map_err(RemoteError::connection)?;

        tracing::debug!(url = %url, "Broker socket open");

        let (mut sink, mut stream) = socket.split();
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<BrokerMessage>();
        let pending: Arc<PendingCalls> = Arc::new(DashMap::new());
        let closed = Arc::new(AtomicBool::new(false));

        tokio::spawn(async move {
            while let Some(message) = outbound_rx.recv().await {
                let json = match message.to_json() {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to encode request");
                        continue;
                    }
                };
                if let Err(e) = sink.send(Message::Text(json.into())).await {
                    tracing::warn!(error = %e, "Failed to write to broker socket");
                    break;
                }
            }
            let _ = sink.close().await;
        });

        let reader = {
            let pending = Arc::clone(&pending);
            let closed = Arc::clone(&closed);
            tokio::spawn(async move {
                while let Some(frame) = stream.next().await {
                    match frame {
                        Ok(Message::Text(text)) => route_frame(&text, &pending, &exports),
                        Ok(Message::Close(_)) => break,
                        Ok(_) => {}
                        Err(e) => {
                            tracing::warn!(error = %e, "Broker socket error");
                            break;
                        }
                    }
                }

                // Closed first, so a call registering after the clear sees it
                closed.store(true, Ordering::Release);
                pending.clear();
                tracing::debug!("Broker socket closed");
            })
        };

        Ok(Arc::new(Self {
            outbound,
            pending,
            next_id: AtomicU64::new(0),
            closed,
            call_timeout,
            reader,
        }))
    }

    /// Resolve `binding_name` on the broker for this session
    pub async fn lookup(&self, binding_name: &str) -> RemoteResult<()> {
        self.call(|id| BrokerMessage::lookup(id, binding_name)).await
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    async fn call(&self, build: impl FnOnce(u64) -> BrokerMessage) -> RemoteResult<()> {
        if self.is_closed() {
            return Err(RemoteError::Closed);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let (tx, rx) = oneshot::channel();
        self.pending.insert(id, tx);

        if self.is_closed() || self.outbound.send(build(id)).is_err() {
            self.pending.remove(&id);
            return Err(RemoteError::Closed);
        }

        let reply = match tokio::time::timeout(self.call_timeout, rx).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(_)) => return Err(RemoteError::Closed),
            Err(_) => {
                self.pending.remove(&id);
                return Err(RemoteError::Timeout(self.call_timeout));
            }
        };

        let reason = reply.reason.unwrap_or_default();
        match reply.status {
            ReplyStatus::Ok => Ok(()),
            ReplyStatus::NotBound => Err(RemoteError::NotBound(reason)),
            ReplyStatus::Rejected => Err(RemoteError::Rejected(reason)),
        }
    }
}

/// Handle one frame on the network callback context
fn route_frame(text: &str, pending: &PendingCalls, exports: &ListenerExports) {
    let message = match BrokerMessage::from_json(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(error = %e, "Unparseable frame from broker");
            return;
        }
    };

    match message.op {
        OpCode::Reply => {
            let (Some(id), Some(reply)) = (message.id, message.as_reply()) else {
                tracing::warn!("Malformed reply from broker");
                return;
            };
            match pending.remove(&id) {
                Some((_, waiter)) => {
                    let _ = waiter.send(reply);
                }
                None => tracing::debug!(id, "Reply for a call that is no longer waiting"),
            }
        }
        OpCode::PropertyChanged => match message.as_property_changed() {
            Some(payload) => {
                tracing::trace!(listener = %payload.listener, property = %payload.event.property, "Property changed");
                exports.deliver(payload.listener, payload.event);
            }
            None => tracing::warn!("Malformed property change from broker"),
        },
        op => tracing::warn!(op = %op, "Unexpected op code from broker"),
    }
}

impl Drop for RemoteLink {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

impl std::fmt::Debug for RemoteLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteLink")
            .field("pending", &self.pending.len())
            .field("closed", &self.is_closed())
            .field("call_timeout", &self.call_timeout)
            .finish()
    }
}

#[async_trait]
impl RemotePublisherForDomain for RemoteLink {
    async fn register_property(&self, property: &str) -> RemoteResult<()> {
        self.call(|id| BrokerMessage::register_property(id, property)).await
    }

    async fn inform(
        &self,
        property: &str,
        old_value: Option<Value>,
        new_value: Option<Value>,
    ) -> RemoteResult<()> {
        self.call(|id| BrokerMessage::inform(id, property, old_value, new_value))
            .await
    }
}

#[async_trait]
impl RemotePublisherForListener for RemoteLink {
    async fn subscribe_remote_listener(
        &self,
        listener: ListenerId,
        property: &str,
    ) -> RemoteResult<()> {
        self.call(|id| BrokerMessage::subscribe(id, listener, property)).await
    }

    async fn unsubscribe_remote_listener(
        &self,
        listener: ListenerId,
        property: &str,
    ) -> RemoteResult<()> {
        self.call(|id| BrokerMessage::unsubscribe(id, listener, property)).await
    }

    async fn unsubscribe_remote_listener_all(&self, listener: ListenerId) -> RemoteResult<()> {
        self.call(|id| BrokerMessage::unsubscribe_all(id, listener)).await
    }
}

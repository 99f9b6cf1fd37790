//! Individual WebSocket session
//!
//! Represents a single client link and the listeners reachable through it.

use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use whiteboard_core::protocol::BrokerMessage;
use whiteboard_core::ListenerId;

/// A single WebSocket session
pub struct Connection {
    /// Unique session ID
    session_id: String,

    /// Channel to send messages to the WebSocket
    sender: mpsc::Sender<BrokerMessage>,

    /// Whether the session looked up the publisher binding
    bound: AtomicBool,

    /// Listeners hosted by the client on the other end of this session
    listeners: RwLock<HashSet<ListenerId>>,

    /// Connection creation time
    created_at: Instant,
}

impl Connection {
    /// Create a new connection
    pub fn new(session_id: String, sender: mpsc::Sender<BrokerMessage>) -> Arc<Self> {
        Arc::new(Self {
            session_id,
            sender,
            bound: AtomicBool::new(false),
            listeners: RwLock::new(HashSet::new()),
            created_at: Instant::now(),
        })
    }

    /// Generate a new session ID
    #[must_use]
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Get the session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Mark the publisher binding as looked up
    pub fn bind(&self) {
        self.bound.store(true, Ordering::Release);
    }

    pub fn is_bound(&self) -> bool {
        self.bound.load(Ordering::Acquire)
    }

    /// Record a listener hosted by this session
    pub fn add_listener(&self, listener: ListenerId) {
        self.listeners.write().insert(listener);
    }

    /// Forget a listener hosted by this session
    pub fn remove_listener(&self, listener: ListenerId) -> bool {
        self.listeners.write().remove(&listener)
    }

    /// Get all hosted listeners
    pub fn listeners(&self) -> Vec<ListenerId> {
        self.listeners.read().iter().copied().collect()
    }

    /// Get connection age
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Send a message to this connection
    pub async fn send(&self, message: BrokerMessage) -> Result<(), mpsc::error::SendError<BrokerMessage>> {
        self.sender.send(message).await
    }

    /// Check if the sender channel is closed
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("session_id", &self.session_id)
            .field("bound", &self.is_bound())
            .field("listeners", &self.listeners.read().len())
            .field("created_at", &self.created_at)
            .finish()
    }
}

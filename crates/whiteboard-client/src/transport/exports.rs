//! Exported listener table

use dashmap::DashMap;
use std::sync::Arc;
use whiteboard_core::{ListenerId, PropertyChangeEvent, RemoteError, RemotePropertyListener, RemoteResult};

/// Listeners reachable by the broker, keyed by their stable id
#[derive(Default)]
pub struct ListenerExports {
    objects: DashMap<ListenerId, Arc<dyn RemotePropertyListener>>,
}

impl ListenerExports {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Export a listener under a freshly generated id
    pub fn export(&self, listener: Arc<dyn RemotePropertyListener>) -> ListenerId {
        let id = ListenerId::generate();
        self.objects.insert(id, listener);
        tracing::debug!(listener = %id, "Listener exported");
        id
    }

    /// Stop routing events to `id`
    pub fn unexport(&self, id: ListenerId) -> RemoteResult<()> {
        self.objects
            .remove(&id)
            .map(|_| tracing::debug!(listener = %id, "Listener unexported"))
            .ok_or(RemoteError::NoSuchObject(id))
    }

    /// Route a pushed event to its listener
    ///
    /// Returns `false` if `id` is not exported; the event is dropped.
    pub fn deliver(&self, id: ListenerId, event: PropertyChangeEvent) -> bool {
        // Clone out of the map so the callback runs without holding the shard lock
        let Some(listener) = self.objects.get(&id).map(|l| Arc::clone(l.value())) else {
            tracing::debug!(listener = %id, property = %event.property, "Event for unknown listener dropped");
            return false;
        };

        listener.on_property_changed(event);
        true
    }

    pub fn is_exported(&self, id: ListenerId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl std::fmt::Debug for ListenerExports {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerExports")
            .field("objects", &self.objects.len())
            .finish()
    }
}

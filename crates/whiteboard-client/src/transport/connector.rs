//! Broker discovery

use super::{ListenerExports, RemoteLink};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use whiteboard_common::PublisherConfig;
use whiteboard_core::protocol::PUBLISHER_PATH;
use whiteboard_core::{RemotePublisherForDomain, RemotePublisherForListener, RemoteResult};

/// The two broker references a client works with
#[derive(Clone)]
pub struct BrokerHandles {
    pub domain: Arc<dyn RemotePublisherForDomain>,
    pub listener: Arc<dyn RemotePublisherForListener>,
}

impl std::fmt::Debug for BrokerHandles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrokerHandles").finish_non_exhaustive()
    }
}

/// Locates the broker and resolves both references
#[async_trait]
pub trait BrokerConnector: Send + Sync {
    /// Pushed events for listeners in `exports` are delivered through the
    /// returned references' transport.
    async fn locate(&self, exports: Arc<ListenerExports>) -> RemoteResult<BrokerHandles>;
}

/// Connector for the WebSocket broker at a fixed location
#[derive(Debug, Clone)]
pub struct WsConnector {
    host: String,
    port: u16,
    binding_name: String,
    call_timeout: Duration,
}

impl WsConnector {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        binding_name: impl Into<String>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            binding_name: binding_name.into(),
            call_timeout,
        }
    }

    pub fn from_config(config: &PublisherConfig) -> Self {
        Self::new(
            config.host.clone(),
            config.port,
            config.binding_name.clone(),
            config.call_timeout(),
        )
    }

    #[must_use]
    pub fn url(&self) -> String {
        format!("ws://{}:{}{}", self.host, self.port, PUBLISHER_PATH)
    }
}

#[async_trait]
impl BrokerConnector for WsConnector {
    async fn locate(&self, exports: Arc<ListenerExports>) -> RemoteResult<BrokerHandles> {
        let url = self.url();
        let link = RemoteLink::connect(&url, exports, self.call_timeout).await?;

        // One lookup per reference; both resolve to the same link
        link.lookup(&self.binding_name).await?;
        let domain: Arc<dyn RemotePublisherForDomain> = link.clone();
        link.lookup(&self.binding_name).await?;
        let listener: Arc<dyn RemotePublisherForListener> = link;

        tracing::debug!(url = %url, binding_name = %self.binding_name, "Broker located");
        Ok(BrokerHandles { domain, listener })
    }
}

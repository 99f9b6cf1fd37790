//! Test helpers for integration tests
//!
//! Provides a broker that lives for the duration of a test and polling
//! helpers for state that settles asynchronously.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, Response};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use whiteboard_broker::{serve, BrokerState};
use whiteboard_common::PublisherConfig;

/// Binding name the test broker answers lookups for
pub const TEST_BINDING: &str = "WhiteboardPublisher";

/// Broker instance that manages lifecycle
pub struct TestBroker {
    pub addr: SocketAddr,
    pub state: BrokerState,
    pub client: Client,
    handle: JoinHandle<()>,
}

impl TestBroker {
    /// Start a broker on an ephemeral loopback port
    pub async fn start() -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = BrokerState::new(TEST_BINDING);

        let served = state.clone();
        let handle = tokio::spawn(async move {
            serve(listener, served).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            state,
            client,
            handle,
        })
    }

    /// Get base URL for the broker's HTTP routes
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Client configuration pointing at this broker
    pub fn publisher_config(&self) -> PublisherConfig {
        self.publisher_config_for(TEST_BINDING)
    }

    /// Client configuration pointing at this broker under another name
    pub fn publisher_config_for(&self, binding_name: &str) -> PublisherConfig {
        PublisherConfig {
            host: self.addr.ip().to_string(),
            port: self.addr.port(),
            binding_name: binding_name.to_string(),
            call_timeout_ms: 2000,
        }
    }
}

impl Drop for TestBroker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A loopback port nothing is listening on
pub async fn closed_port() -> Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    drop(listener);
    Ok(port)
}

/// Poll `check` until it holds or `within` elapses
pub async fn eventually<F>(within: Duration, mut check: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + within;
    loop {
        if check() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

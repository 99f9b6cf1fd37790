//! Broker server setup
//!
//! Provides the WebSocket server configuration and routes.

mod handler;
mod state;

pub use handler::publisher_handler;
pub use state::BrokerState;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use whiteboard_common::{AppConfig, AppError};
use whiteboard_core::protocol::PUBLISHER_PATH;

/// Create the broker router
pub fn create_router() -> Router<BrokerState> {
    Router::new()
        .route(PUBLISHER_PATH, get(publisher_handler))
        .route("/health", get(health_check))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Build the complete application
pub fn create_app(state: BrokerState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Create `BrokerState` from configuration
pub fn create_broker_state(config: &AppConfig) -> BrokerState {
    BrokerState::new(config.publisher.binding_name.as_str())
}

/// Serve the broker on an already bound listener until it fails
pub async fn serve(listener: TcpListener, state: BrokerState) -> Result<(), AppError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Broker listening on ws://{}{}", addr, PUBLISHER_PATH);
    }

    axum::serve(listener, create_app(state)).await?;
    Ok(())
}

/// Run the broker with configuration until Ctrl-C
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let address = config.broker.address();
    tracing::info!("Starting broker on {}", address);

    let listener = TcpListener::bind(&address).await?;
    let state = create_broker_state(&config);

    tokio::select! {
        result = serve(listener, state) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
            Ok(())
        }
    }
}

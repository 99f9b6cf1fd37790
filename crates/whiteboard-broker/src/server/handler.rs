//! WebSocket handler
//!
//! Handles WebSocket sessions and request processing.

use crate::connection::Connection;
use crate::handlers::RequestDispatcher;
use crate::server::BrokerState;
use axum::{
    extract::{ws::Message, State, WebSocketUpgrade},
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use whiteboard_core::protocol::{BrokerMessage, ReplyPayload};

/// Channel buffer size for outgoing messages
const MESSAGE_BUFFER_SIZE: usize = 256;

/// WebSocket publisher handler
pub async fn publisher_handler(
    State(state): State<BrokerState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: BrokerState, socket: axum::extract::ws::WebSocket) {
    let session_id = Connection::generate_id();

    // Create message channel for outgoing messages
    let (tx, mut rx) = mpsc::channel::<BrokerMessage>(MESSAGE_BUFFER_SIZE);

    let connection = state
        .connection_manager()
        .add_connection(session_id.clone(), tx);

    tracing::info!(session_id = %session_id, "WebSocket session established");

    let (mut ws_sink, mut ws_stream) = socket.split();

    // Session state for the receive task
    let state_recv = state.clone();
    let session_id_recv = session_id.clone();
    let connection_recv = connection.clone();

    // Requests are handled one at a time so a sender's informs keep their order
    let recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    if handle_text_message(&state_recv, &connection_recv, &text)
                        .await
                        .is_err()
                    {
                        tracing::debug!(session_id = %session_id_recv, "Outbound channel closed");
                        break;
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::debug!(session_id = %session_id_recv, "Binary frames not supported");
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {
                    tracing::trace!(session_id = %session_id_recv, "Ping/pong received");
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(session_id = %session_id_recv, "Client closed connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!(session_id = %session_id_recv, error = %e, "WebSocket error");
                    break;
                }
            }
        }
    });

    let session_id_send = session_id.clone();

    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match msg.to_json() {
                Ok(json) => {
                    if ws_sink.send(Message::Text(json.into())).await.is_err() {
                        tracing::warn!(
                            session_id = %session_id_send,
                            "Failed to send message to WebSocket"
                        );
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(session_id = %session_id_send, error = %e, "Failed to encode message");
                }
            }
        }

        // Close the WebSocket when channel is closed
        let _ = ws_sink.close().await;
    });

    // Wait for either task to complete
    tokio::select! {
        _ = recv_task => {
            tracing::debug!(session_id = %session_id, "Receive task ended");
        }
        _ = send_task => {
            tracing::debug!(session_id = %session_id, "Send task ended");
        }
    }

    cleanup_connection(&state, &connection);
}

/// Handle a text frame from the client
///
/// Returns `Err` only when the reply cannot be queued.
async fn handle_text_message(
    state: &BrokerState,
    connection: &Arc<Connection>,
    text: &str,
) -> Result<(), mpsc::error::SendError<BrokerMessage>> {
    let message = match BrokerMessage::from_json(text) {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!(
                session_id = %connection.session_id(),
                error = %e,
                "Failed to parse message, ignoring"
            );
            return Ok(());
        }
    };

    tracing::trace!(
        session_id = %connection.session_id(),
        op = %message.op,
        id = ?message.id,
        "Received message"
    );

    let id = message.id;
    let reply = match RequestDispatcher::dispatch(state, connection, message).await {
        Ok(()) => ReplyPayload::ok(),
        Err(e) => {
            tracing::debug!(
                session_id = %connection.session_id(),
                error = %e,
                "Request refused"
            );
            e.to_reply()
        }
    };

    connection.send(BrokerMessage::reply(id, reply)).await
}

/// Clean up a session on disconnect
fn cleanup_connection(state: &BrokerState, connection: &Arc<Connection>) {
    let removed = state.publisher().remove_session(connection);
    state.connection_manager().remove_connection(connection.session_id());

    tracing::info!(
        session_id = %connection.session_id(),
        listeners_removed = removed,
        age_ms = connection.age().as_millis(),
        "Session cleaned up"
    );
}

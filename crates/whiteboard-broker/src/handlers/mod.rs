//! Op code handlers
//!
//! Handles incoming client requests based on their operation code. Every
//! request is answered with a Reply echoing its id.

mod error;
mod lookup;
mod property;
mod subscription;

pub use error::{HandlerError, HandlerResult};
pub use lookup::LookupHandler;
pub use property::PropertyHandler;
pub use subscription::SubscriptionHandler;

use crate::connection::Connection;
use crate::server::BrokerState;
use std::sync::Arc;
use whiteboard_core::protocol::{BrokerMessage, OpCode};

/// Dispatch incoming client requests to appropriate handlers
pub struct RequestDispatcher;

impl RequestDispatcher {
    /// Handle an incoming client request
    pub async fn dispatch(
        state: &BrokerState,
        connection: &Arc<Connection>,
        message: BrokerMessage,
    ) -> HandlerResult<()> {
        if !message.op.is_client_op() {
            tracing::warn!(
                session_id = %connection.session_id(),
                op = %message.op,
                "Received broker-only op code from client"
            );
            return Err(HandlerError::UnexpectedOp(message.op));
        }

        if message.op != OpCode::Lookup && !connection.is_bound() {
            return Err(HandlerError::NotBound);
        }

        match message.op {
            OpCode::Lookup => {
                let payload = message.as_lookup().ok_or_else(|| invalid(message.op))?;
                LookupHandler::handle(state, connection, payload)
            }
            OpCode::RegisterProperty => {
                let payload = message.as_register_property().ok_or_else(|| invalid(message.op))?;
                PropertyHandler::register(state, payload);
                Ok(())
            }
            OpCode::Inform => {
                let payload = message.as_inform().ok_or_else(|| invalid(message.op))?;
                PropertyHandler::inform(state, payload).await
            }
            OpCode::Subscribe => {
                let payload = message.as_subscription().ok_or_else(|| invalid(message.op))?;
                SubscriptionHandler::subscribe(state, connection, payload);
                Ok(())
            }
            OpCode::Unsubscribe => {
                let payload = message.as_subscription().ok_or_else(|| invalid(message.op))?;
                SubscriptionHandler::unsubscribe(state, payload);
                Ok(())
            }
            OpCode::UnsubscribeAll => {
                let payload = message.as_unsubscribe_all().ok_or_else(|| invalid(message.op))?;
                SubscriptionHandler::unsubscribe_all(state, payload);
                Ok(())
            }
            // These ops never reach here due to the is_client_op check
            OpCode::Reply | OpCode::PropertyChanged => Err(HandlerError::UnexpectedOp(message.op)),
        }
    }
}

fn invalid(op: OpCode) -> HandlerError {
    HandlerError::InvalidPayload(format!("Invalid {} payload", op.name()))
}

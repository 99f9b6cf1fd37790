//! Lookup handler (op 1)

use super::{HandlerError, HandlerResult};
use crate::connection::Connection;
use crate::server::BrokerState;
use std::sync::Arc;
use whiteboard_core::protocol::LookupPayload;

/// Resolves the publisher binding for a session
pub struct LookupHandler;

impl LookupHandler {
    /// Bind the session if the name matches the served binding
    ///
    /// A failed lookup leaves an already bound session bound.
    pub fn handle(
        state: &BrokerState,
        connection: &Arc<Connection>,
        payload: LookupPayload,
    ) -> HandlerResult<()> {
        if payload.binding_name != state.binding_name() {
            tracing::debug!(
                session_id = %connection.session_id(),
                binding_name = %payload.binding_name,
                "Lookup of unknown name"
            );
            return Err(HandlerError::UnknownBinding(payload.binding_name));
        }

        connection.bind();
        tracing::debug!(
            session_id = %connection.session_id(),
            binding_name = %payload.binding_name,
            "Session bound"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_lookup() {
        let state = BrokerState::new("publisher");
        let (tx, _rx) = mpsc::channel(4);
        let conn = Connection::new("s".to_string(), tx);

        let wrong = LookupPayload {
            binding_name: "registry".to_string(),
        };
        assert!(matches!(
            LookupHandler::handle(&state, &conn, wrong),
            Err(HandlerError::UnknownBinding(name)) if name == "registry"
        ));
        assert!(!conn.is_bound());

        let right = LookupPayload {
            binding_name: "publisher".to_string(),
        };
        LookupHandler::handle(&state, &conn, right).unwrap();
        assert!(conn.is_bound());
    }
}

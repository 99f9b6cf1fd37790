//! Subscribe (op 4), Unsubscribe (op 5) and UnsubscribeAll (op 6) handlers

use crate::connection::Connection;
use crate::server::BrokerState;
use std::sync::Arc;
use whiteboard_core::protocol::{SubscriptionPayload, UnsubscribeAllPayload};

/// Handles listener subscriptions
pub struct SubscriptionHandler;

impl SubscriptionHandler {
    /// Subscribe a listener hosted by `connection`
    pub fn subscribe(state: &BrokerState, connection: &Arc<Connection>, payload: SubscriptionPayload) {
        state
            .publisher()
            .subscribe(connection, payload.listener, &payload.property);
    }

    /// Unsubscribing a listener that is not subscribed succeeds
    pub fn unsubscribe(state: &BrokerState, payload: SubscriptionPayload) {
        state.publisher().unsubscribe(payload.listener, &payload.property);
    }

    pub fn unsubscribe_all(state: &BrokerState, payload: UnsubscribeAllPayload) {
        state.publisher().unsubscribe_all(payload.listener);
    }
}

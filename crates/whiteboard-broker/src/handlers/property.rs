//! RegisterProperty (op 2) and Inform (op 3) handlers

use super::HandlerResult;
use crate::server::BrokerState;
use whiteboard_core::protocol::{InformPayload, RegisterPayload};

/// Handles property registration and publication
pub struct PropertyHandler;

impl PropertyHandler {
    /// Register a property; repeated registration is a no-op
    pub fn register(state: &BrokerState, payload: RegisterPayload) {
        state.publisher().register(&payload.property);
    }

    /// Publish a change to the property's subscribers
    pub async fn inform(state: &BrokerState, payload: InformPayload) -> HandlerResult<()> {
        state
            .publisher()
            .inform(&payload.property, payload.old_value, payload.new_value)
            .await?;
        Ok(())
    }
}

//! Connection handle — one agent card bound to one transport
//!
//! Bound at construction and immutable for the handle's lifetime; there is
//! no rebinding or reconnect. A new handle is constructed per distinct
//! endpoint. The handle holds no mutable state between calls, so it is safe
//! to reuse across sequential sends.

use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use crate::error::A2aError;
use crate::protocol::{AgentCard, SendMessageRequest, SendMessageResponse};
use crate::transport::AuthenticatedTransport;

/// A bound connection to one remote seller agent
#[derive(Debug, Clone)]
pub struct RemoteAgentConnection {
    card: AgentCard,
    transport: AuthenticatedTransport,
}

impl RemoteAgentConnection {
    pub fn new(card: AgentCard, transport: AuthenticatedTransport) -> Self {
        Self { card, transport }
    }

    /// The bound endpoint descriptor
    pub fn card(&self) -> &AgentCard {
        &self.card
    }

    /// Send one request envelope and return the typed response envelope.
    ///
    /// A missing or empty correlation id is replaced with a fresh v4 UUID
    /// before sending; every outbound request carries a non-empty id.
    pub async fn send(
        &self,
        mut request: SendMessageRequest,
    ) -> Result<SendMessageResponse, A2aError> {
        if request.id.as_deref().is_none_or(str::is_empty) {
            request.id = Some(Uuid::new_v4().to_string());
        }

        debug!(
            agent = %self.card.name,
            id = request.id.as_deref().unwrap_or(""),
            "Sending message to remote agent"
        );

        let payload = serde_json::to_value(&request).map_err(|e| A2aError::Decode {
            endpoint: self.card.url.clone(),
            detail: format!("failed to serialize request envelope: {e}"),
        })?;

        let raw = self
            .transport
            .call(&self.card.url, &payload, &HashMap::new())
            .await?;

        self.validate_response(raw)
    }

    /// Validate raw JSON into the response envelope shape. The transport
    /// already guarantees the body is JSON; a mismatch here means the
    /// endpoint speaks valid JSON of the wrong shape.
    fn validate_response(&self, raw: Value) -> Result<SendMessageResponse, A2aError> {
        let response: SendMessageResponse =
            serde_json::from_value(raw).map_err(|e| A2aError::Decode {
                endpoint: self.card.url.clone(),
                detail: format!("response shape mismatch: {e}"),
            })?;

        if response.result.is_none() && response.error.is_none() {
            return Err(A2aError::Decode {
                endpoint: self.card.url.clone(),
                detail: "response shape mismatch: neither result nor error present".to_string(),
            });
        }

        Ok(response)
    }
}

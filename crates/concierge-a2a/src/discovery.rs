//! Agent-card discovery — fetch a remote agent's descriptor
//!
//! Cards live at `/.well-known/agent.json`. The fetch goes through the same
//! authenticated path and error taxonomy as message sends: when a token
//! provider is configured, the card request carries a fresh bearer token
//! scoped to the agent's base URL.

use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::auth::TokenProvider;
use crate::error::A2aError;
use crate::protocol::{AGENT_CARD_PATH, AgentCard};
use crate::transport::DEFAULT_TIMEOUT;

/// Fetches agent cards from remote endpoints
#[derive(Clone)]
pub struct AgentCardClient {
    http: Client,
    token_provider: Option<Arc<dyn TokenProvider>>,
    timeout: Duration,
}

impl std::fmt::Debug for AgentCardClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentCardClient")
            .field("authenticated", &self.token_provider.is_some())
            .finish()
    }
}

impl AgentCardClient {
    pub fn new(token_provider: Option<Arc<dyn TokenProvider>>) -> Self {
        Self::with_timeout(token_provider, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(token_provider: Option<Arc<dyn TokenProvider>>, timeout: Duration) -> Self {
        Self {
            http: Client::builder()
                .timeout(timeout)
                .build()
                .expect("failed to build HTTP client"),
            token_provider,
            timeout,
        }
    }

    /// Fetch the card advertised at `<base_url>/.well-known/agent.json`
    pub async fn fetch(&self, base_url: &str) -> Result<AgentCard, A2aError> {
        let base = base_url.trim_end_matches('/');
        let url = format!("{base}{AGENT_CARD_PATH}");
        debug!("Fetching agent card from {}", url);

        let token = match &self.token_provider {
            Some(provider) => Some(provider.fetch_token(base).await?),
            None => None,
        };

        let mut request = self.http.get(&url);
        if let Some(token) = &token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                A2aError::Timeout {
                    endpoint: url.clone(),
                    timeout: self.timeout,
                }
            } else {
                A2aError::Transport {
                    endpoint: url.clone(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(A2aError::Http {
                endpoint: url,
                status: status.as_u16(),
                detail,
            });
        }

        let card: AgentCard = response.json().await.map_err(|e| A2aError::Decode {
            endpoint: url.clone(),
            detail: format!("invalid agent card: {e}"),
        })?;

        info!(
            "Fetched agent card: {} ({} skills)",
            card.name,
            card.skills.len()
        );
        Ok(card)
    }
}

//! Authenticated transport — one HTTP call per invocation
//!
//! Fetches a fresh audience-scoped token, attaches it as a bearer header,
//! POSTs the payload, and classifies the outcome into the [`A2aError`]
//! taxonomy. Exactly one attempt per invocation; retry policy belongs to
//! the caller.

use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::auth::TokenProvider;
use crate::error::A2aError;

/// One consistent timeout bound for every remote-agent call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Issues authenticated unary JSON calls to remote agent endpoints.
///
/// Stateless apart from its immutable configuration, so one instance is
/// safe to reuse across sequential calls.
#[derive(Clone)]
pub struct AuthenticatedTransport {
    http: Client,
    token_provider: Option<Arc<dyn TokenProvider>>,
    timeout: Duration,
}

impl std::fmt::Debug for AuthenticatedTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedTransport")
            .field("authenticated", &self.token_provider.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AuthenticatedTransport {
    /// Transport with the default 30 second timeout. Pass `None` for the
    /// unauthenticated local-development path.
    pub fn new(token_provider: Option<Arc<dyn TokenProvider>>) -> Self {
        Self::with_timeout(token_provider, DEFAULT_TIMEOUT)
    }

    /// Transport with an explicit timeout
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

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send `payload` to `endpoint` as one HTTP POST and return the parsed
    /// JSON body.
    ///
    /// When a token provider is configured, a fresh token scoped to
    /// `endpoint` is fetched first; failure there aborts the call before any
    /// request is issued. Caller-supplied headers are preserved, except that
    /// a caller `Authorization` header never overrides the injected one.
    pub async fn call(
        &self,
        endpoint: &str,
        payload: &Value,
        extra_headers: &HashMap<String, String>,
    ) -> Result<Value, A2aError> {
        let token = match &self.token_provider {
            Some(provider) => Some(provider.fetch_token(endpoint).await?),
            None => None,
        };

        debug!(
            endpoint = endpoint,
            authenticated = token.is_some(),
            "Sending A2A request"
        );

        let mut request = self.http.post(endpoint).json(payload);
        for (name, value) in extra_headers {
            if token.is_some() && name.eq_ignore_ascii_case("authorization") {
                warn!("Dropping caller Authorization header; the fetched token takes precedence");
                continue;
            }
            request = request.header(name, value);
        }
        if let Some(token) = &token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.classify_send_error(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(A2aError::Http {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                detail,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.classify_send_error(endpoint, e))?;

        serde_json::from_str(&body).map_err(|e| A2aError::Decode {
            endpoint: endpoint.to_string(),
            detail: format!("response body is not JSON: {e}"),
        })
    }

    fn classify_send_error(&self, endpoint: &str, error: reqwest::Error) -> A2aError {
        if error.is_timeout() {
            A2aError::Timeout {
                endpoint: endpoint.to_string(),
                timeout: self.timeout,
            }
        } else {
            A2aError::Transport {
                endpoint: endpoint.to_string(),
                detail: error.to_string(),
            }
        }
    }
}

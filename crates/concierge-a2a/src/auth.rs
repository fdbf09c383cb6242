//! Token providers — short-lived bearer credentials scoped to an audience
//!
//! A token is fetched fresh on every call and discarded after use; there is
//! no caching or refresh-before-expiry logic. Any failure here aborts the
//! enclosing call — the transport never sends without a token.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::error::A2aError;

/// Obtains a bearer token valid for the given audience (the exact URL the
/// request will be sent to).
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn fetch_token(&self, audience: &str) -> Result<String, A2aError>;
}

/// Fixed bearer token, for local runs and tests
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn fetch_token(&self, _audience: &str) -> Result<String, A2aError> {
        Ok(self.token.clone())
    }
}

/// Default identity endpoint on the platform metadata server
const METADATA_IDENTITY_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/identity";

/// Timeout for the metadata server round trip. The metadata server is
/// link-local; anything slower than this is a misconfiguration.
const METADATA_TIMEOUT: Duration = Duration::from_secs(5);

/// Fetches an audience-scoped identity token from the platform metadata
/// server, as available on managed cloud runtimes.
#[derive(Debug, Clone)]
pub struct MetadataTokenProvider {
    http: Client,
    identity_url: String,
}

impl MetadataTokenProvider {
    pub fn new() -> Self {
        Self::with_identity_url(METADATA_IDENTITY_URL)
    }

    /// Point at a non-default identity endpoint (used by tests)
    pub fn with_identity_url(identity_url: impl Into<String>) -> Self {
        Self {
            http: Client::builder()
                .timeout(METADATA_TIMEOUT)
                .build()
                .expect("failed to build HTTP client"),
            identity_url: identity_url.into(),
        }
    }

    fn auth_err(&self, audience: &str, detail: impl Into<String>) -> A2aError {
        A2aError::Auth {
            audience: audience.to_string(),
            detail: detail.into(),
        }
    }
}

impl Default for MetadataTokenProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenProvider for MetadataTokenProvider {
    async fn fetch_token(&self, audience: &str) -> Result<String, A2aError> {
        debug!("Fetching identity token for audience {}", audience);

        let response = self
            .http
            .get(&self.identity_url)
            .query(&[("audience", audience)])
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| self.auth_err(audience, format!("metadata server unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.auth_err(
                audience,
                format!("metadata server answered {status}: {body}"),
            ));
        }

        let token = response
            .text()
            .await
            .map_err(|e| self.auth_err(audience, format!("failed to read token body: {e}")))?;

        if token.trim().is_empty() {
            return Err(self.auth_err(audience, "metadata server returned an empty token"));
        }

        Ok(token.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::extract::Query;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use std::collections::HashMap;

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_static_provider() {
        let provider = StaticTokenProvider::new("tok-123");
        let token = provider.fetch_token("http://seller.example").await.unwrap();
        assert_eq!(token, "tok-123");
    }

    #[test]
    fn test_static_provider_debug_redacts() {
        let provider = StaticTokenProvider::new("super-secret");
        let debug = format!("{provider:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret"));
    }

    #[tokio::test]
    async fn test_metadata_provider_success() {
        async fn identity(
            headers: HeaderMap,
            Query(params): Query<HashMap<String, String>>,
        ) -> Result<String, StatusCode> {
            if headers.get("Metadata-Flavor").map(|v| v.as_bytes()) != Some(b"Google") {
                return Err(StatusCode::FORBIDDEN);
            }
            let audience = params.get("audience").cloned().unwrap_or_default();
            Ok(format!("token-for-{audience}"))
        }

        let base = spawn(Router::new().route("/identity", get(identity))).await;
        let provider = MetadataTokenProvider::with_identity_url(format!("{base}/identity"));

        let token = provider
            .fetch_token("https://seller.example/a2a")
            .await
            .unwrap();
        assert_eq!(token, "token-for-https://seller.example/a2a");
    }

    #[tokio::test]
    async fn test_metadata_provider_rejection_is_auth_failure() {
        async fn denied() -> (StatusCode, &'static str) {
            (StatusCode::FORBIDDEN, "no default service account")
        }

        let base = spawn(Router::new().route("/identity", get(denied))).await;
        let provider = MetadataTokenProvider::with_identity_url(format!("{base}/identity"));

        let err = provider
            .fetch_token("https://seller.example")
            .await
            .unwrap_err();
        assert!(err.is_auth());
        assert!(err.to_string().contains("403"));
    }

    #[tokio::test]
    async fn test_metadata_provider_unreachable_is_auth_failure() {
        let provider = MetadataTokenProvider::with_identity_url("http://127.0.0.1:9/identity");
        let err = provider
            .fetch_token("https://seller.example")
            .await
            .unwrap_err();
        assert!(err.is_auth());
    }

    #[tokio::test]
    async fn test_metadata_provider_empty_token_is_auth_failure() {
        async fn blank() -> &'static str {
            "   "
        }

        let base = spawn(Router::new().route("/identity", get(blank))).await;
        let provider = MetadataTokenProvider::with_identity_url(format!("{base}/identity"));

        let err = provider
            .fetch_token("https://seller.example")
            .await
            .unwrap_err();
        assert!(err.is_auth());
        assert!(err.to_string().contains("empty token"));
    }
}

//! Typed failure taxonomy for the remote-agent call path
//!
//! One enum covers the whole path: token fetch, HTTP exchange, and response
//! decoding. Every failure surfaces synchronously to the caller; nothing is
//! retried or swallowed here.

use std::time::Duration;
use thiserror::Error;

/// Failure of a single remote-agent call attempt
#[derive(Debug, Error)]
pub enum A2aError {
    /// The identity token for the target audience could not be obtained.
    /// The call is aborted before any request reaches the endpoint.
    #[error("failed to obtain identity token for audience {audience}: {detail}")]
    Auth { audience: String, detail: String },

    /// The request exceeded the configured timeout. Distinguished from
    /// [`A2aError::Transport`] so callers can apply a different retry policy.
    #[error("request to {endpoint} timed out after {timeout:?}")]
    Timeout { endpoint: String, timeout: Duration },

    /// Network-level failure other than a timeout (connection refused, DNS,
    /// reset).
    #[error("transport failure calling {endpoint}: {detail}")]
    Transport { endpoint: String, detail: String },

    /// The endpoint answered with a non-2xx status. Authentication
    /// rejections surface here as 401/403, distinguishable by status.
    #[error("HTTP {status} from {endpoint}: {detail}")]
    Http {
        endpoint: String,
        status: u16,
        detail: String,
    },

    /// The response body was not JSON, or was JSON of the wrong shape.
    /// Treated as a protocol mismatch; never retried.
    #[error("failed to decode response from {endpoint}: {detail}")]
    Decode { endpoint: String, detail: String },
}

impl A2aError {
    /// HTTP status code, when the endpoint answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure happened before any request was sent
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Whether the failure was the timeout bound, specifically
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

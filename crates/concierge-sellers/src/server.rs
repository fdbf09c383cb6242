//! A2A HTTP server for a seller agent
//!
//! Serves the agent card at the well-known path and the unary
//! `message/send` JSON-RPC call at the root. Streaming and the task-store
//! lifecycle of the surrounding framework are external collaborators; only
//! the unary path lives here.

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use concierge_a2a::protocol::{
    AGENT_CARD_PATH, AgentCard, ERR_INTERNAL, ERR_INVALID_PARAMS, ERR_METHOD_NOT_FOUND,
    METHOD_MESSAGE_SEND, Message, SendMessageRequest, SendMessageResponse,
};

use crate::seller::SellerAgent;

/// Server binding and auth settings
#[derive(Debug, Clone)]
pub struct SellerServerConfig {
    pub host: String,
    pub port: u16,
    /// Public URL advertised on the card; defaults to the bind address
    pub public_url: Option<String>,
    /// When set, every RPC must carry this bearer token
    pub require_token: Option<String>,
}

impl Default for SellerServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 10000,
            public_url: None,
            require_token: None,
        }
    }
}

struct AppState {
    agent: Arc<dyn SellerAgent>,
    card: AgentCard,
    require_token: Option<String>,
}

/// One seller agent behind an A2A endpoint
pub struct SellerServer {
    state: Arc<AppState>,
    host: String,
    port: u16,
}

impl SellerServer {
    pub fn new(agent: Arc<dyn SellerAgent>, config: SellerServerConfig) -> Self {
        let base_url = match &config.public_url {
            Some(url) => url.clone(),
            None => {
                let url = format!("http://{}:{}", config.host, config.port);
                warn!("No public URL configured, advertising bind address {}", url);
                url
            }
        };
        let card = agent.card(&base_url);

        Self {
            state: Arc::new(AppState {
                agent,
                card,
                require_token: config.require_token,
            }),
            host: config.host,
            port: config.port,
        }
    }

    /// The advertised card
    pub fn card(&self) -> &AgentCard {
        &self.state.card
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route(AGENT_CARD_PATH, get(card_handler))
            .route("/", post(rpc_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Bind and serve until the process exits
    pub async fn serve(self) -> Result<()> {
        let addr = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        info!(
            "Serving {} on {} (public URL {})",
            self.state.card.name, addr, self.state.card.url
        );
        let router = self.router();
        axum::serve(listener, router)
            .await
            .context("Server terminated")?;
        Ok(())
    }
}

async fn card_handler(State(state): State<Arc<AppState>>) -> Json<AgentCard> {
    Json(state.card.clone())
}

async fn rpc_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(expected) = &state.require_token {
        let presented = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if presented != format!("Bearer {expected}") {
            warn!("Rejected RPC with missing or invalid bearer token");
            return (StatusCode::UNAUTHORIZED, "missing or invalid bearer token").into_response();
        }
    }

    let id = body
        .get("id")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    let request: SendMessageRequest = match serde_json::from_value(body) {
        Ok(request) => request,
        Err(e) => {
            return Json(SendMessageResponse::err(
                id,
                ERR_INVALID_PARAMS,
                format!("invalid request envelope: {e}"),
            ))
            .into_response();
        }
    };

    if request.method != METHOD_MESSAGE_SEND {
        return Json(SendMessageResponse::err(
            request.id,
            ERR_METHOD_NOT_FOUND,
            format!("unsupported method '{}'", request.method),
        ))
        .into_response();
    }

    let message = &request.params.message;
    let query = message.text();
    let context_id = message.context_id.clone();

    match state.agent.handle(&query, context_id.as_deref()).await {
        Ok(reply) => {
            let reply_message = Message::agent_text(reply, context_id);
            let result = match serde_json::to_value(&reply_message) {
                Ok(value) => value,
                Err(e) => {
                    return Json(SendMessageResponse::err(
                        request.id,
                        ERR_INTERNAL,
                        e.to_string(),
                    ))
                    .into_response();
                }
            };
            Json(SendMessageResponse::ok(request.id, result)).into_response()
        }
        Err(e) => {
            warn!("Seller '{}' failed to handle query: {}", state.card.name, e);
            Json(SendMessageResponse::err(
                request.id,
                ERR_INTERNAL,
                e.to_string(),
            ))
            .into_response()
        }
    }
}

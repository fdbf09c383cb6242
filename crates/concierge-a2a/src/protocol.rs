//! A2A wire format — agent cards and JSON-RPC message envelopes

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// JSON-RPC version carried on every envelope
pub const JSONRPC_VERSION: &str = "2.0";

/// The one method this client speaks — unary message send
pub const METHOD_MESSAGE_SEND: &str = "message/send";

/// Well-known path an agent serves its card at
pub const AGENT_CARD_PATH: &str = "/.well-known/agent.json";

// ── Error codes ──

pub const ERR_METHOD_NOT_FOUND: i32 = -32601;
pub const ERR_INVALID_PARAMS: i32 = -32602;
pub const ERR_INTERNAL: i32 = -32603;
pub const ERR_UNAUTHORIZED: i32 = -32000;

/// Agent card — advertises an agent's address and capabilities.
/// Immutable once fetched; owned by the connection that wraps it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    pub name: String,
    pub description: String,
    pub url: String,
    pub version: String,
    #[serde(default)]
    pub capabilities: AgentCapabilities,
    #[serde(default)]
    pub skills: Vec<AgentSkill>,
    #[serde(default)]
    pub default_input_modes: Vec<String>,
    #[serde(default)]
    pub default_output_modes: Vec<String>,
}

/// Declared protocol capabilities
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentCapabilities {
    #[serde(default)]
    pub streaming: bool,
}

/// One skill an agent advertises on its card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSkill {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
}

/// A single content part within a message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Part {
    Text { text: String },
}

/// The caller's message — the opaque payload of a request envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub message_id: String,
    pub role: Role,
    pub parts: Vec<Part>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub context_id: Option<String>,
}

impl Message {
    /// Build a user message from plain text
    pub fn user_text(text: impl Into<String>, context_id: Option<String>) -> Self {
        Self {
            message_id: Uuid::new_v4().to_string(),
            role: Role::User,
            parts: vec![Part::Text { text: text.into() }],
            context_id,
        }
    }

    /// Build an agent reply from plain text
    pub fn agent_text(text: impl Into<String>, context_id: Option<String>) -> Self {
        Self {
            message_id: Uuid::new_v4().to_string(),
            role: Role::Agent,
            parts: vec![Part::Text { text: text.into() }],
            context_id,
        }
    }

    /// Concatenated text of all text parts
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .map(|p| match p {
                Part::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Parameters of a `message/send` call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSendParams {
    pub message: Message,
}

/// Request envelope: correlation id plus the caller's message.
/// Created per call, sent at most once, never reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,
    pub method: String,
    pub params: MessageSendParams,
}

impl SendMessageRequest {
    /// New `message/send` envelope without a correlation id; the connection
    /// fills one in before sending.
    pub fn new(message: Message) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: None,
            method: METHOD_MESSAGE_SEND.to_string(),
            params: MessageSendParams { message },
        }
    }

    /// New envelope with an explicit correlation id
    pub fn with_id(id: impl Into<String>, message: Message) -> Self {
        let mut request = Self::new(message);
        request.id = Some(id.into());
        request
    }
}

/// Response envelope: exactly one of `result` or `error`, immutable once
/// produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<ResponseError>,
}

/// Structured error in a response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseError {
    pub code: i32,
    pub message: String,
}

impl SendMessageResponse {
    pub fn ok(id: Option<String>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn err(id: Option<String>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(ResponseError {
                code,
                message: message.into(),
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_some() && self.error.is_none()
    }
}

//! `send_task` tool — lets the concierge delegate to a remote seller

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use concierge_core::tools::{ToolHandler, json_schema};

use crate::connection::RemoteAgentConnection;
use crate::protocol::{Message, SendMessageRequest};

/// Tool that sends a task to one of the bound remote seller agents
pub struct SendTaskTool {
    connections: Vec<Arc<RemoteAgentConnection>>,
}

impl SendTaskTool {
    pub fn new(connections: Vec<Arc<RemoteAgentConnection>>) -> Self {
        Self { connections }
    }

    fn resolve(&self, name: &str) -> Result<&RemoteAgentConnection> {
        self.connections
            .iter()
            .find(|c| c.card().name.eq_ignore_ascii_case(name))
            .map(Arc::as_ref)
            .ok_or_else(|| {
                anyhow!(
                    "Unknown seller agent '{}'. Known agents: {}",
                    name,
                    self.connections
                        .iter()
                        .map(|c| c.card().name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

/// First 100 characters of the task for log lines; truncates on character
/// boundaries, never mid-codepoint.
fn preview(text: &str) -> String {
    text.chars().take(100).collect()
}

#[async_trait]
impl ToolHandler for SendTaskTool {
    fn name(&self) -> &str {
        "send_task"
    }

    fn description(&self) -> &str {
        "Send a task to a remote seller agent and return its reply. \
         The agent handles menu questions, product lookups, and order creation."
    }

    fn input_schema(&self) -> Value {
        json_schema(
            serde_json::json!({
                "agent": {
                    "type": "string",
                    "description": "Name of the seller agent, as listed on its card"
                },
                "task": {
                    "type": "string",
                    "description": "Natural-language task for the seller"
                },
                "session_id": {
                    "type": "string",
                    "description": "Optional conversation context id"
                }
            }),
            vec!["agent", "task"],
        )
    }

    async fn execute(&self, input: Value) -> Result<String> {
        let agent = input
            .get("agent")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow!("Missing 'agent' parameter"))?;

        let task = input
            .get("task")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow!("Missing 'task' parameter"))?;

        let session_id = input
            .get("session_id")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        let connection = self.resolve(agent)?;
        debug!("Delegating to '{}': {}", agent, preview(task));

        let request = SendMessageRequest::new(Message::user_text(task, session_id));
        let response = connection.send(request).await?;

        if let Some(error) = response.error {
            return Err(anyhow!(
                "Seller '{}' returned error {}: {}",
                agent,
                error.code,
                error.message
            ));
        }

        let result = response
            .result
            .ok_or_else(|| anyhow!("Seller '{}' returned an empty result", agent))?;

        // Sellers reply with a message envelope; fall back to raw JSON for
        // anything else.
        let reply = match serde_json::from_value::<Message>(result.clone()) {
            Ok(message) => message.text(),
            Err(_) => result.to_string(),
        };

        info!("Seller '{}' replied ({} chars)", agent, reply.len());
        Ok(reply)
    }
}

//! The seller agent trait — one specialized store behind an A2A endpoint

use anyhow::Result;
use async_trait::async_trait;

use concierge_a2a::protocol::AgentCard;

/// A specialized seller agent: answers queries in its domain and politely
/// declines anything else. The LLM reasoning engine the original design
/// delegates to is an external collaborator; implementations here answer
/// deterministically through their tools.
#[async_trait]
pub trait SellerAgent: Send + Sync {
    /// The card advertised at `/.well-known/agent.json`, with `base_url` as
    /// the agent's public address
    fn card(&self, base_url: &str) -> AgentCard;

    /// Answer one user query within a conversation context
    async fn handle(&self, query: &str, context_id: Option<&str>) -> Result<String>;
}

//! concierge-core — shared plumbing for the purchasing concierge
//!
//! Hosts the tool trait and registry that both the coordinating agent and the
//! seller agents execute tools through, plus the workspace configuration.

pub mod config;
pub mod tools;

pub use config::{AuthMode, ConciergeConfig, SellerEndpoint};
pub use tools::{ToolDefinition, ToolExecutor, ToolHandler, ToolRegistry};

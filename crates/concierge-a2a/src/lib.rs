//! A2A (Agent-to-Agent) client path for the purchasing concierge
//!
//! One authenticated unary request/response bridge: a token provider scoped
//! to the destination audience, a transport that issues exactly one HTTP
//! call per invocation, and a connection handle binding a remote agent's
//! card to that transport.

pub mod auth;
pub mod connection;
pub mod discovery;
pub mod error;
pub mod protocol;
pub mod tool;
pub mod transport;

pub use auth::{MetadataTokenProvider, StaticTokenProvider, TokenProvider};
pub use connection::RemoteAgentConnection;
pub use discovery::AgentCardClient;
pub use error::A2aError;
pub use protocol::{
    AgentCapabilities, AgentCard, AgentSkill, Message, MessageSendParams, Part, ResponseError,
    Role, SendMessageRequest, SendMessageResponse,
};
pub use tool::SendTaskTool;
pub use transport::AuthenticatedTransport;

//! Conversational agent abstraction
//!
//! The relay treats the agent as a black box: a multimodal message goes in,
//! a reply string or an error comes out. [`AnthropicAgent`] is the production
//! implementation, talking to an Anthropic Messages compatible endpoint.

mod anthropic;
mod error;
mod errors;
mod types;

use async_trait::async_trait;

use crate::chat::types::MultimodalMessage;

pub use anthropic::AnthropicAgent;
pub use error::AgentError;

/// An external capability that answers a multimodal message
#[async_trait]
pub trait Agent: Send + Sync {
    /// Produce a reply for `message`, or fail
    async fn invoke(&self, message: MultimodalMessage) -> Result<String, AgentError>;
}

//! Agent error type definitions

use std::fmt;

/// Agent call failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    /// Agent is not usable (missing key, bad URL, ...)
    Config(String),

    /// Network failure talking to the model provider
    Transport(String),

    /// Model provider answered with an error status
    Upstream { status: u16, message: String },

    /// Response body could not be understood
    InvalidResponse(String),

    /// Response carried no text
    EmptyReply,
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentError::Config(msg) => write!(f, "Agent misconfigured: {}", msg),
            AgentError::Transport(msg) => write!(f, "Agent request failed: {}", msg),
            AgentError::Upstream { message, .. } => f.write_str(message),
            AgentError::InvalidResponse(msg) => write!(f, "Invalid agent response: {}", msg),
            AgentError::EmptyReply => f.write_str("Agent returned an empty reply"),
        }
    }
}

impl std::error::Error for AgentError {}

impl AgentError {
    /// HTTP status returned by the model provider, if it answered at all
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            AgentError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AgentError::InvalidResponse(err.to_string())
        } else {
            AgentError::Transport(err.to_string())
        }
    }
}

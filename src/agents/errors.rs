use thiserror::Error;

use crate::llm::LlmError;

/// Errors that can occur in the agent system
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent not registered: {0}")]
    UnknownAgent(String),

    #[error("no response from agent: {0}")]
    NoResponse(String),

    #[error("text generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error("malformed reply from {agent}: {reason}")]
    MalformedReply { agent: String, reason: String },

    #[error("failed to write artifacts: {0}")]
    Artifact(#[from] std::io::Error),
}

pub type AgentResult<T> = Result<T, AgentError>;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while executing a tool. These are never raised out of the
/// orchestrator: they are rendered to text and fed back to the model as an
/// ordinary tool result.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum AgentError {
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Tool execution failed: {0}")]
    ExecutionError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AgentResult<T> = Result<T, AgentError>;

/// Errors from the incremental stream decoder.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StreamError {
    /// A single line outgrew the decode buffer's capacity ceiling. The legacy
    /// behavior was to drop the excess silently; we surface it instead.
    #[error("stream buffer overflow: partial line of {size} bytes exceeds the {capacity} byte ceiling")]
    Overflow { size: usize, capacity: usize },
}

/// Errors that abort the current turn. Conversation history is left intact so
/// the same user input can be retried.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("tool loop exceeded {0} cycles without a final answer")]
    ToolLoopExceeded(usize),
}

//! Error types for webpilot-agent

use crate::llm::LlmError;
use thiserror::Error;

/// Errors that can occur during a single agent step
///
/// Everything here is step-local: the agent boundary converts these into
/// the failure side of the result envelope. Only [`ChatModelAuthError`]
/// crosses `execute()` as an `Err`.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Message history snapshot was empty
    #[error("Message history is empty")]
    EmptyHistory,

    /// The model returned no structured output at all
    #[error("Failed to validate model output: no structured output returned")]
    EmptyModelOutput,

    /// Model output does not satisfy the structured-output contract
    #[error("Invalid output format for field '{field}': {reason}")]
    InvalidOutputFormat { field: String, reason: String },

    /// Model output failed contract validation for a non-field-specific reason
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Model client failure (request, rate limit, authentication, ...)
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// Serialization/deserialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Session-fatal authentication failure from the model provider
///
/// Deliberately not a variant of [`AgentError`]: a bad credential is not a
/// per-step condition. `execute()` returns this through its `Err` channel so
/// the driving loop can halt the whole run instead of retrying the step. No
/// terminal lifecycle event is emitted on this path.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ChatModelAuthError {
    message: String,
    #[source]
    source: LlmError,
}

impl ChatModelAuthError {
    /// Wrap a provider authentication error with a user-actionable message
    pub fn new(message: impl Into<String>, source: LlmError) -> Self {
        Self {
            message: message.into(),
            source,
        }
    }

    /// The user-actionable message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

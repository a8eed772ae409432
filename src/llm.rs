//! Model-client capability
//!
//! The core never talks to a provider directly. It consumes an opaque
//! [`ChatModel`] capability that accepts a message sequence and returns
//! raw structured output, and it relies on the error taxonomy here to
//! tell a session-fatal credential problem apart from an ordinary failure.

use crate::error::AgentError;
use crate::messages::Message;
use async_trait::async_trait;
use thiserror::Error;

/// Errors a model client can raise
#[derive(Debug, Error)]
pub enum LlmError {
    /// Invalid or missing credentials for the model provider
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Provider rejected the request due to rate limiting
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Transport or provider failure, message as reported by the provider
    #[error("{0}")]
    Request(String),

    /// Provider response could not be interpreted as structured output
    #[error("malformed model response: {0}")]
    MalformedResponse(String),
}

impl LlmError {
    /// True if this error indicates invalid or missing credentials
    pub fn is_authentication(&self) -> bool {
        matches!(self, LlmError::Authentication(_))
    }
}

/// Discriminate authentication failures from everything else
///
/// Used by the agent's failure classification: an authentication-shaped
/// error escalates out of `execute()`, anything else becomes envelope data.
pub fn is_authentication_error(err: &AgentError) -> bool {
    matches!(err, AgentError::Llm(inner) if inner.is_authentication())
}

/// Trait for language-model invocation backends
///
/// Implementations handle provider-specific transport and decoding. The
/// agent requests structured output and validates the returned value
/// against its own contract; `Ok(None)` means the provider completed but
/// produced nothing usable, which the agent treats as a hard validation
/// failure.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Invoke the model with `messages`, requesting structured output
    async fn invoke_structured(
        &self,
        messages: &[Message],
    ) -> Result<Option<serde_json::Value>, LlmError>;

    /// Model name for logging (e.g. "gpt-4o", "claude-sonnet")
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_predicate() {
        let auth: AgentError = LlmError::Authentication("401".to_string()).into();
        let request: AgentError = LlmError::Request("timeout".to_string()).into();
        let other = AgentError::EmptyModelOutput;

        assert!(is_authentication_error(&auth));
        assert!(!is_authentication_error(&request));
        assert!(!is_authentication_error(&other));
    }

    #[test]
    fn test_request_error_preserves_provider_message() {
        // The request message is surfaced verbatim in the failure envelope
        let err = LlmError::Request("timeout".to_string());
        assert_eq!(err.to_string(), "timeout");
    }
}

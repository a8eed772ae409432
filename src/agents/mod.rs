//! Agent execution loop — base machinery and role specializations
//!
//! Each agent consumes the shared conversation history, produces one
//! structured decision per `execute()` call, and reports lifecycle
//! transitions through the session's [`EventBus`].

use crate::bus::EventBus;
use crate::events::{Actor, AgentEvent, ExecutionState};
use crate::messages::MessageManager;
use std::sync::Arc;

mod base;
mod planner;

pub use base::BaseAgent;
pub use planner::{PlannerAgent, PlannerDecision};

/// Session-level execution flags shared by all agents
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutionOptions {
    /// Whether the session may include image content in model invocations
    pub use_vision: bool,

    /// Whether the planner role specifically is permitted to see images
    ///
    /// When the session has vision enabled but this is false, the planner
    /// strips image parts from the last message before invoking the model.
    pub use_vision_for_planner: bool,
}

/// Shared execution context injected into every agent
///
/// Owns references to the session's collaborators: the event bus for
/// lifecycle reporting and the message manager for conversation history.
pub struct AgentContext {
    event_bus: Arc<EventBus>,
    message_manager: Arc<dyn MessageManager>,
    options: ExecutionOptions,
}

impl AgentContext {
    pub fn new(
        event_bus: Arc<EventBus>,
        message_manager: Arc<dyn MessageManager>,
        options: ExecutionOptions,
    ) -> Self {
        Self {
            event_bus,
            message_manager,
            options,
        }
    }

    /// The session's event bus
    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    /// The session's message history store
    pub fn message_manager(&self) -> &Arc<dyn MessageManager> {
        &self.message_manager
    }

    /// Session execution flags
    pub fn options(&self) -> ExecutionOptions {
        self.options
    }

    /// Emit a lifecycle event on behalf of `actor`
    pub async fn emit_event(&self, actor: Actor, state: ExecutionState, details: impl Into<String>) {
        self.event_bus
            .emit(AgentEvent::new(actor, state, details))
            .await;
    }
}

/// Tagged success/failure envelope returned by an agent's execution
///
/// Exactly one of decision or error is present. This is the sole channel
/// through which step-local failure reaches the caller — nothing escapes
/// `execute()` as an error except session-fatal authentication failure.
#[derive(Debug, Clone)]
pub struct AgentOutput<T> {
    /// Stable agent identifier (e.g. "planner")
    pub id: &'static str,

    /// The validated decision, or the failure message
    pub result: Result<T, String>,
}

impl<T> AgentOutput<T> {
    /// Success envelope
    pub fn ok(id: &'static str, decision: T) -> Self {
        Self {
            id,
            result: Ok(decision),
        }
    }

    /// Failure envelope
    pub fn err(id: &'static str, message: impl Into<String>) -> Self {
        Self {
            id,
            result: Err(message.into()),
        }
    }

    /// The failure message, if this is a failure envelope
    pub fn error(&self) -> Option<&str> {
        self.result.as_ref().err().map(String::as_str)
    }
}

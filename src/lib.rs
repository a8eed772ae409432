//! # webpilot-agent
//!
//! Agent execution loop and lifecycle event dispatch for the WebPilot
//! multi-agent task runner.
//!
//! ## Overview
//!
//! A WebPilot session drives a long-running browser task with a small set
//! of cooperating agents (planner, navigator, validator). This crate is the
//! control core: each agent reads the shared conversation history, invokes
//! a language model requesting structured output, validates the decision it
//! gets back, and reports progress through an in-process [`EventBus`] that
//! observers (typically the UI side panel) subscribe to.
//!
//! ## Quick Start
//!
//! ```rust
//! use webpilot_agent::{Actor, AgentEvent, EventBus, EventCallback, ExecutionState};
//!
//! # async fn example() {
//! let bus = EventBus::new();
//!
//! // Observe step failures
//! let logger = EventCallback::new(|event: AgentEvent| async move {
//!     println!("[{}] {}", event.actor, event.details);
//!     Ok(())
//! });
//! bus.subscribe(ExecutionState::StepFail, logger).await;
//!
//! // A failing subscriber can never destabilize the emitter
//! bus.emit(AgentEvent::new(
//!     Actor::Planner,
//!     ExecutionState::StepFail,
//!     "Planning failed: timeout",
//! ))
//! .await;
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **EventBus** — pub/sub dispatcher keyed by [`ExecutionState`];
//!   concurrent fan-out with isolated subscriber failures
//! - **ChatModel** trait — opaque model-invocation capability with a
//!   distinguishable authentication error kind
//! - **MessageManager** trait — read capability over conversation history
//! - **PlannerAgent** — one structured decision per `execute()` call, with
//!   failure classification: step-local errors become the result envelope,
//!   credential failures escalate as [`ChatModelAuthError`]

pub mod agents;
pub mod bus;
pub mod error;
pub mod events;
pub mod llm;
pub mod messages;
pub mod output;

// Re-export core types
pub use agents::{AgentContext, AgentOutput, BaseAgent, ExecutionOptions, PlannerAgent, PlannerDecision};
pub use bus::{CallbackError, EventBus, EventCallback};
pub use error::{AgentError, ChatModelAuthError, Result};
pub use events::{Actor, AgentEvent, ExecutionState};
pub use llm::{is_authentication_error, ChatModel, LlmError};
pub use messages::{
    ContentPart, ImageSource, MemoryMessageManager, Message, MessageContent, MessageManager,
    MessageRole,
};
pub use output::{coerce_bool, StructuredOutput};

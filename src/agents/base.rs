//! Shared per-step machinery for all agent roles

use crate::error::{AgentError, Result};
use crate::events::{Actor, ExecutionState};
use crate::llm::ChatModel;
use crate::messages::{Message, MessageContent};
use crate::output::StructuredOutput;
use std::marker::PhantomData;
use std::sync::Arc;

use super::AgentContext;

/// Role-agnostic agent core, generic over the decision shape it produces
///
/// Owns the pieces every role needs for one iteration: the role-specific
/// system message, the model client, and the injected session context.
/// Specializations like [`super::PlannerAgent`] wrap this and implement
/// their own `execute()` on top of [`BaseAgent::invoke`].
pub struct BaseAgent<O> {
    actor: Actor,
    system_message: Message,
    chat_llm: Arc<dyn ChatModel>,
    context: Arc<AgentContext>,
    /// Whether this role may see image content when session vision is on
    vision_allowed: bool,
    _output: PhantomData<fn() -> O>,
}

impl<O: StructuredOutput> BaseAgent<O> {
    pub fn new(
        actor: Actor,
        system_message: Message,
        chat_llm: Arc<dyn ChatModel>,
        context: Arc<AgentContext>,
        vision_allowed: bool,
    ) -> Self {
        Self {
            actor,
            system_message,
            chat_llm,
            context,
            vision_allowed,
            _output: PhantomData,
        }
    }

    /// The role identity of this agent
    pub fn actor(&self) -> Actor {
        self.actor
    }

    /// The injected session context
    pub fn context(&self) -> &AgentContext {
        &self.context
    }

    /// Emit a lifecycle event for this agent's role
    pub async fn emit(&self, state: ExecutionState, details: impl Into<String>) {
        self.context.emit_event(self.actor, state, details).await;
    }

    /// Build the message sequence for one model invocation
    ///
    /// The history's first entry is the durable session instruction message;
    /// it is replaced by this agent's own system message. When the session
    /// has vision enabled but this role does not, the last message has its
    /// image parts stripped — only the last message, earlier entries are
    /// sent unmodified regardless of their content.
    fn assemble_messages(&self, history: Vec<Message>) -> Result<Vec<Message>> {
        if history.is_empty() {
            return Err(AgentError::EmptyHistory);
        }

        let mut messages = Vec::with_capacity(history.len());
        messages.push(self.system_message.clone());
        messages.extend(history.into_iter().skip(1));

        if self.context.options().use_vision && !self.vision_allowed {
            if let Some(last) = messages.last_mut() {
                if matches!(last.content, MessageContent::Parts(_)) {
                    let flattened = last.content.flattened_text();
                    *last = Message::human(flattened);
                }
            }
        }

        Ok(messages)
    }

    /// Run one model invocation and validate the result
    ///
    /// Snapshots the history, assembles the role-specific sequence, invokes
    /// the model requesting structured output, and parses the raw value
    /// against the decision contract. An absent result is a hard failure.
    pub async fn invoke(&self) -> Result<O> {
        let history = self.context.message_manager().get_messages().await;
        let messages = self.assemble_messages(history)?;

        tracing::debug!(
            actor = %self.actor,
            model = %self.chat_llm.name(),
            messages = messages.len(),
            "Invoking model"
        );

        let raw = self.chat_llm.invoke_structured(&messages).await?;
        let raw = raw.ok_or(AgentError::EmptyModelOutput)?;
        O::parse(raw)
    }
}

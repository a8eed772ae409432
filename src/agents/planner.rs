//! Planner agent — decides the next steps for the running task

use crate::error::{AgentError, ChatModelAuthError, Result};
use crate::events::{Actor, ExecutionState};
use crate::llm::ChatModel;
use crate::messages::Message;
use crate::output::{coerce_bool, StructuredOutput};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::{AgentContext, AgentOutput, BaseAgent};

/// Envelope id for planner results
const PLANNER_ID: &str = "planner";

/// The planner's structured decision
///
/// All text fields are required (empty string is fine, absence is not).
/// `done` and `app_task` tolerate string-encoded booleans — see
/// [`crate::output::coerce_bool`] for the exact coercion rules.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerDecision {
    /// What the planner observed about the current state
    pub observation: String,

    /// Obstacles it anticipates
    pub challenges: String,

    /// Why it chose this plan
    pub reasoning: String,

    /// The plan itself, surfaced verbatim in the StepOk event
    pub next_steps: String,

    /// Whether the overall task is complete
    pub done: bool,

    /// Whether the task targets an installed application rather than the web
    pub app_task: bool,
}

/// Wire shape before boolean coercion
///
/// Unknown top-level fields are rejected; missing fields are never
/// defaulted — both are contract violations.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPlannerDecision {
    observation: String,
    challenges: String,
    reasoning: String,
    next_steps: String,
    done: Value,
    app_task: Value,
}

impl StructuredOutput for PlannerDecision {
    fn parse(value: Value) -> Result<Self> {
        let raw: RawPlannerDecision = serde_json::from_value(value)
            .map_err(|err| AgentError::ValidationFailed(err.to_string()))?;

        Ok(Self {
            done: coerce_bool("done", &raw.done)?,
            app_task: coerce_bool("app_task", &raw.app_task)?,
            observation: raw.observation,
            challenges: raw.challenges,
            reasoning: raw.reasoning,
            next_steps: raw.next_steps,
        })
    }
}

/// The planning agent
///
/// One `execute()` call is one iteration of "observe conversation, decide
/// next steps, report outcome". Lifecycle per call: StepStart is always
/// emitted first, then exactly one of StepOk/StepFail — except on the
/// authentication path, which emits no terminal event and escalates.
pub struct PlannerAgent {
    base: BaseAgent<PlannerDecision>,
}

impl PlannerAgent {
    /// Create a planner bound to the session context
    ///
    /// `system_message` is the planner's role-specific instruction message,
    /// prepended in place of the session's durable first history entry.
    pub fn new(
        system_message: Message,
        chat_llm: Arc<dyn ChatModel>,
        context: Arc<AgentContext>,
    ) -> Self {
        let vision_allowed = context.options().use_vision_for_planner;
        Self {
            base: BaseAgent::new(
                Actor::Planner,
                system_message,
                chat_llm,
                context,
                vision_allowed,
            ),
        }
    }

    /// Run one planning iteration
    ///
    /// Returns the result envelope on both success and step-local failure.
    /// Authentication failure from the model provider is session-fatal and
    /// returns through the `Err` channel instead; the caller must surface
    /// it and halt rather than retry the step.
    pub async fn execute(
        &self,
    ) -> std::result::Result<AgentOutput<PlannerDecision>, ChatModelAuthError> {
        self.base.emit(ExecutionState::StepStart, "Planning...").await;

        match self.base.invoke().await {
            Ok(decision) => {
                self.base
                    .emit(ExecutionState::StepOk, decision.next_steps.clone())
                    .await;
                Ok(AgentOutput::ok(PLANNER_ID, decision))
            }
            Err(AgentError::Llm(err)) if err.is_authentication() => {
                tracing::error!(error = %err, "Planner authentication failed");
                Err(ChatModelAuthError::new(
                    "Planner API authentication failed. Please verify your API key",
                    err,
                ))
            }
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(error = %message, "Planning step failed");
                self.base
                    .emit(ExecutionState::StepFail, format!("Planning failed: {}", message))
                    .await;
                Ok(AgentOutput::err(PLANNER_ID, message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_decision() -> Value {
        json!({
            "observation": "on the search page",
            "challenges": "",
            "reasoning": "need results first",
            "next_steps": "type the query and submit",
            "done": false,
            "app_task": false,
        })
    }

    #[test]
    fn test_parse_valid_decision() {
        let decision = PlannerDecision::parse(valid_decision()).unwrap();
        assert_eq!(decision.observation, "on the search page");
        assert_eq!(decision.next_steps, "type the query and submit");
        assert!(!decision.done);
        assert!(!decision.app_task);
    }

    #[test]
    fn test_parse_coerces_string_booleans() {
        let mut value = valid_decision();
        value["done"] = json!("True");
        value["app_task"] = json!("FALSE");

        let decision = PlannerDecision::parse(value).unwrap();
        assert!(decision.done);
        assert!(!decision.app_task);
    }

    #[test]
    fn test_parse_rejects_non_boolean_string() {
        let mut value = valid_decision();
        value["done"] = json!("yes");

        let err = PlannerDecision::parse(value).unwrap_err();
        assert!(matches!(
            err,
            AgentError::InvalidOutputFormat { ref field, .. } if field == "done"
        ));
    }

    #[test]
    fn test_parse_missing_field_fails() {
        let mut value = valid_decision();
        value.as_object_mut().unwrap().remove("observation");

        let err = PlannerDecision::parse(value).unwrap_err();
        assert!(err.to_string().contains("observation"));
    }

    #[test]
    fn test_parse_empty_strings_pass() {
        let value = json!({
            "observation": "",
            "challenges": "",
            "reasoning": "",
            "next_steps": "",
            "done": true,
            "app_task": "false",
        });

        let decision = PlannerDecision::parse(value).unwrap();
        assert!(decision.done);
        assert_eq!(decision.next_steps, "");
    }

    #[test]
    fn test_parse_rejects_unknown_fields() {
        let mut value = valid_decision();
        value["web_task"] = json!(true);

        assert!(PlannerDecision::parse(value).is_err());
    }

    #[test]
    fn test_parse_rejects_non_text_field() {
        let mut value = valid_decision();
        value["observation"] = json!(42);

        assert!(PlannerDecision::parse(value).is_err());
    }
}

//! Lifecycle event types for the agent execution loop
//!
//! All types use camelCase JSON serialization for wire compatibility
//! with the UI side panel.

use serde::{Deserialize, Serialize};

/// Identity of the agent role that emitted an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Actor {
    /// High-level planning agent
    Planner,
    /// Page-driving navigation agent
    Navigator,
    /// Outcome-checking validation agent
    Validator,
    /// The runner itself (task-level transitions)
    System,
}

impl Actor {
    /// Stable string identifier, also used as the envelope id
    pub fn as_str(&self) -> &'static str {
        match self {
            Actor::Planner => "planner",
            Actor::Navigator => "navigator",
            Actor::Validator => "validator",
            Actor::System => "system",
        }
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of lifecycle transitions observers can subscribe to
///
/// Task-level states are emitted by the driving loop, step-level states by
/// agents once per `execute()` call, act-level states by the navigator for
/// individual page actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionState {
    TaskStart,
    TaskOk,
    TaskFail,
    TaskPause,
    TaskResume,
    TaskCancel,
    StepStart,
    StepOk,
    StepFail,
    ActStart,
    ActOk,
    ActFail,
}

/// An immutable lifecycle notification broadcast to subscribers
///
/// Created at each state transition, delivered to every callback registered
/// for its `state`, and discarded afterwards — events are never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentEvent {
    /// Unique event identifier (evt-<uuid>)
    pub id: String,

    /// Which agent role emitted this event
    pub actor: Actor,

    /// The lifecycle transition this event reports
    pub state: ExecutionState,

    /// Human-readable detail for display
    pub details: String,

    /// Unix timestamp in milliseconds
    pub timestamp: u64,
}

impl AgentEvent {
    /// Create a new event with auto-generated id and timestamp
    pub fn new(actor: Actor, state: ExecutionState, details: impl Into<String>) -> Self {
        Self {
            id: format!("evt-{}", uuid::Uuid::new_v4()),
            actor,
            state,
            details: details.into(),
            timestamp: now_millis(),
        }
    }
}

/// Current time in Unix milliseconds
fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let event = AgentEvent::new(Actor::Planner, ExecutionState::StepStart, "Planning...");

        assert!(event.id.starts_with("evt-"));
        assert_eq!(event.actor, Actor::Planner);
        assert_eq!(event.state, ExecutionState::StepStart);
        assert_eq!(event.details, "Planning...");
        assert!(event.timestamp > 0);
    }

    #[test]
    fn test_event_serialization_roundtrip() {
        let event = AgentEvent::new(Actor::Validator, ExecutionState::StepFail, "no match");

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"actor\":\"validator\""));
        assert!(json.contains("\"state\":\"step_fail\""));

        let parsed: AgentEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, event.id);
        assert_eq!(parsed.state, ExecutionState::StepFail);
        assert_eq!(parsed.details, "no match");
    }

    #[test]
    fn test_actor_display_matches_envelope_id() {
        assert_eq!(Actor::Planner.to_string(), "planner");
        assert_eq!(Actor::Navigator.as_str(), "navigator");
        assert_eq!(Actor::System.as_str(), "system");
    }

    #[test]
    fn test_execution_state_serialization() {
        let states = [
            (ExecutionState::TaskStart, "\"task_start\""),
            (ExecutionState::TaskCancel, "\"task_cancel\""),
            (ExecutionState::StepOk, "\"step_ok\""),
            (ExecutionState::ActFail, "\"act_fail\""),
        ];

        for (state, expected) in states {
            assert_eq!(serde_json::to_string(&state).unwrap(), expected);
            let parsed: ExecutionState = serde_json::from_str(expected).unwrap();
            assert_eq!(parsed, state);
        }
    }
}

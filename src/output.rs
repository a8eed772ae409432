//! Structured-output contract enforcement
//!
//! Agents request structured output from the model and validate the raw
//! JSON they get back. Models are inconsistent about booleans — some emit
//! `true`, some emit `"True"` — so boolean-like fields are coerced, while
//! everything else is enforced strictly: unknown top-level fields and
//! missing required fields are validation failures, never defaulted.

use crate::error::{AgentError, Result};
use serde_json::Value;

/// A decision shape an agent can parse model output into
///
/// Implementations own the full contract for one agent role: which fields
/// are required, which are boolean-like, and what gets rejected.
pub trait StructuredOutput: Sized + Send {
    /// Validate and normalize a raw model value into a decision
    fn parse(value: Value) -> Result<Self>;
}

/// Coerce a boolean-like field per the contract rules
///
/// Accepts a literal boolean as-is, or the case-insensitive strings
/// `"true"`/`"false"`. Any other string content or any other type fails
/// with an error naming the field.
pub fn coerce_bool(field: &str, value: &Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => match s.to_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(AgentError::InvalidOutputFormat {
                field: field.to_string(),
                reason: format!("invalid boolean string \"{}\"", other),
            }),
        },
        other => Err(AgentError::InvalidOutputFormat {
            field: field.to_string(),
            reason: format!("expected boolean or \"true\"/\"false\", got {}", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_literal_booleans() {
        assert!(coerce_bool("done", &json!(true)).unwrap());
        assert!(!coerce_bool("done", &json!(false)).unwrap());
    }

    #[test]
    fn test_coerce_boolean_strings_case_insensitive() {
        assert!(coerce_bool("done", &json!("true")).unwrap());
        assert!(coerce_bool("done", &json!("True")).unwrap());
        assert!(coerce_bool("done", &json!("TRUE")).unwrap());
        assert!(!coerce_bool("app_task", &json!("false")).unwrap());
        assert!(!coerce_bool("app_task", &json!("FALSE")).unwrap());
    }

    #[test]
    fn test_coerce_rejects_other_strings() {
        let err = coerce_bool("done", &json!("yes")).unwrap_err();
        match err {
            AgentError::InvalidOutputFormat { field, reason } => {
                assert_eq!(field, "done");
                assert!(reason.contains("yes"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_coerce_rejects_other_types() {
        assert!(coerce_bool("done", &json!(1)).is_err());
        assert!(coerce_bool("done", &json!(null)).is_err());
        assert!(coerce_bool("done", &json!({"value": true})).is_err());
    }
}

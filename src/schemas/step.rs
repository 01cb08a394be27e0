use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::utils::helper::extract_from_codeblock;

/// Execution status of a [`Step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    InProgress,
    Completed,
    Error,
}

/// The tool-call portion of a step, present only when the step records an
/// actual invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ActionRecord {
    /// The action that was taken at this step. Typically a tool invocation.
    pub action: String,
    /// Input for the action, serialized as it was sent to the tool.
    pub action_input: String,
    /// If the action was delegated to another agent, the list of steps that
    /// agent performed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub action_steps: Vec<Step>,
}

/// One entry of the execution [`Ledger`](crate::schemas::Ledger).
///
/// A step is either a plain reasoning/result record or, when `action` is
/// present, the record of a tool call. The two shapes share the same wire
/// format; the action fields are flattened into the step record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Step {
    /// If you finish the execution or experience an unrecoverable error, set
    /// this to either COMPLETED or ERROR respectively.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    /// The tool or agent that executed this step.
    pub actor: String,
    /// Your reasoning about why and how you accomplish this step.
    pub thought: String,
    /// Any additional data, like step outcomes, error messages, etc.
    pub observation: String,
    #[serde(flatten, default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionRecord>,
}

impl Step {
    pub fn new(
        actor: impl Into<String>,
        thought: impl Into<String>,
        observation: impl Into<String>,
    ) -> Self {
        Self {
            status: None,
            actor: actor.into(),
            thought: thought.into(),
            observation: observation.into(),
            action: None,
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_action(mut self, action: ActionRecord) -> Self {
        self.action = Some(action);
        self
    }

    pub fn is_tool_call(&self) -> bool {
        self.action.is_some()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, Some(Status::Completed) | Some(Status::Error))
    }

    /// A copy of this step with nested `action_steps` suppressed, used when
    /// the ledger is serialized into the next prompt to bound payload growth.
    pub fn prompt_view(&self) -> Step {
        let mut view = self.clone();
        if let Some(action) = &mut view.action {
            action.action_steps.clear();
        }
        view
    }

    /// Parses a model reply as a step record, tolerating markdown code
    /// fences around the JSON body.
    pub fn parse(text: &str) -> Result<Step, StepParseError> {
        let cleaned = extract_from_codeblock(text);
        Ok(serde_json::from_str(cleaned)?)
    }

    /// JSON schema of the full step record (action fields included), used
    /// both in prompts and as the model's structured-output format.
    pub fn record_schema() -> Value {
        serde_json::to_value(schema_for!(Step)).unwrap_or_else(|e| {
            log::warn!("Failed to serialize step schema: {e}");
            Value::Null
        })
    }
}

/// The model's non-tool-call reply did not match the expected step record.
#[derive(Error, Debug)]
#[error("Reply is not a valid step record: {0}")]
pub struct StepParseError(#[from] serde_json::Error);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_roundtrip() {
        let step = Step::new("executor", "thinking", "done").with_status(Status::Completed);
        let json = serde_json::to_string(&step).unwrap();
        let parsed: Step = serde_json::from_str(&json).unwrap();
        assert_eq!(step, parsed);
    }

    #[test]
    fn test_tool_call_step_roundtrip_without_action_steps() {
        let step = Step::new("executor", "calling a tool", "OK")
            .with_status(Status::InProgress)
            .with_action(ActionRecord {
                action: "The tool \"searchFlights\" has been called".into(),
                action_input: r#"{"city":"Rome"}"#.into(),
                action_steps: Vec::new(),
            });
        let json = serde_json::to_string(&step).unwrap();
        assert!(!json.contains("action_steps"));
        let parsed: Step = serde_json::from_str(&json).unwrap();
        assert_eq!(step, parsed);
    }

    #[test]
    fn test_prompt_view_suppresses_nested_steps() {
        let nested = Step::new("inner", "nested work", "nested done");
        let step = Step::new("executor", "delegating", "OK").with_action(ActionRecord {
            action: "The tool \"inner\" has been called".into(),
            action_input: "{}".into(),
            action_steps: vec![nested],
        });

        let view = step.prompt_view();
        assert!(view.action.as_ref().unwrap().action_steps.is_empty());
        assert_eq!(step.action.as_ref().unwrap().action_steps.len(), 1);
    }

    #[test]
    fn test_parse_from_codeblock() {
        let text = "```json\n{\"status\":\"COMPLETED\",\"actor\":\"x\",\"thought\":\"t\",\"observation\":\"o\"}\n```";
        let step = Step::parse(text).unwrap();
        assert_eq!(step.status, Some(Status::Completed));
        assert_eq!(step.actor, "x");
        assert!(!step.is_tool_call());
    }

    #[test]
    fn test_parse_failure() {
        assert!(Step::parse("this is not a step").is_err());
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&Status::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
    }

    #[test]
    fn test_record_schema_includes_action_fields() {
        let schema = Step::record_schema();
        let properties = schema.get("properties").unwrap().as_object().unwrap();
        assert!(properties.contains_key("actor"));
        assert!(properties.contains_key("action_input"));
    }
}

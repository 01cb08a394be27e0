use std::fmt::{self, Display};

use serde_json::{Map, Value};

/// Name of the internal reasoning argument the model is asked to pass with
/// every tool call. It is stripped before the tool sees its input.
pub const REASONING_ARG: &str = "thought";

/// One tool invocation requested by the model.
///
/// The tool is referenced by identifier and resolved through the registry at
/// dispatch time, so calls never hold shared ownership of a capability.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub tool_id: String,
    pub arguments: Map<String, Value>,
}

impl ToolCall {
    pub fn new(
        id: impl Into<String>,
        tool_id: impl Into<String>,
        arguments: Map<String, Value>,
    ) -> Self {
        Self {
            id: id.into(),
            tool_id: tool_id.into(),
            arguments,
        }
    }

    /// The reasoning argument, if the model passed one.
    pub fn thought(&self) -> Option<String> {
        match self.arguments.get(REASONING_ARG)? {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// The arguments with the reasoning field removed, i.e. what the tool
    /// actually receives and what is recorded as `action_input`.
    pub fn stripped_arguments(&self) -> Map<String, Value> {
        let mut arguments = self.arguments.clone();
        arguments.remove(REASONING_ARG);
        arguments
    }
}

impl Display for ToolCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({})",
            self.tool_id,
            serde_json::to_string(&self.arguments).unwrap_or_else(|_| "{…}".to_string())
        )
    }
}

/// Outcome of one [`ToolCall`], successful or captured as a failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallResult {
    pub tool_call_id: String,
    pub tool_id: String,
    pub result: Option<String>,
    pub is_error: bool,
}

impl ToolCallResult {
    pub fn from_call(call: &ToolCall, result: impl Into<String>) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            tool_id: call.tool_id.clone(),
            result: Some(result.into()),
            is_error: false,
        }
    }

    pub fn from_failure(call: &ToolCall, error: impl Display) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            tool_id: call.tool_id.clone(),
            result: Some(format!("Error: {error}")),
            is_error: true,
        }
    }

    pub fn text(&self) -> &str {
        self.result.as_deref().unwrap_or("")
    }

    /// True when the call failed outright or when the result text mentions
    /// an error (fallback heuristic for tools that report failures inline).
    pub fn indicates_error(&self) -> bool {
        self.is_error || self.text().to_lowercase().contains("error")
    }
}

use std::error::Error;

use async_trait::async_trait;
use schemars::{schema_for, JsonSchema};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::tools::ToolError;

/// Input shape used by tools that take a single free-form command.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DefaultToolInput {
    /// The command to execute.
    pub question: String,
}

/// A plain callable tool: named, described, and invoked with a JSON object
/// of arguments.
///
/// `init` and `close` bracket the tool's lifetime; tools that hold no
/// external resources can rely on the default no-op implementations.
#[async_trait]
pub trait ToolFunction: Send + Sync {
    fn name(&self) -> String;

    fn description(&self) -> String;

    /// JSON schema of the tool's parameters. Defaults to a single required
    /// `question` string.
    fn parameters(&self) -> Value {
        serde_json::to_value(schema_for!(DefaultToolInput)).unwrap_or_else(|e| {
            log::warn!("Failed to serialize default tool schema: {e}");
            Value::Null
        })
    }

    async fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }

    async fn call(
        &self,
        arguments: Map<String, Value>,
    ) -> Result<String, Box<dyn Error + Send + Sync>>;

    async fn close(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}

/// Typed accessors over a tool's argument map. Each returns
/// [`ToolError::MissingParameter`] when the key is absent and
/// [`ToolError::InvalidParameter`] when the value has the wrong type.
pub fn get_str(arguments: &Map<String, Value>, name: &str) -> Result<String, ToolError> {
    match required(arguments, name)? {
        Value::String(s) => Ok(s.clone()),
        _ => Err(invalid(name, "string")),
    }
}

pub fn get_bool(arguments: &Map<String, Value>, name: &str) -> Result<bool, ToolError> {
    match required(arguments, name)? {
        Value::Bool(b) => Ok(*b),
        _ => Err(invalid(name, "boolean")),
    }
}

pub fn get_i64(arguments: &Map<String, Value>, name: &str) -> Result<i64, ToolError> {
    required(arguments, name)?
        .as_i64()
        .ok_or_else(|| invalid(name, "integer"))
}

pub fn get_f64(arguments: &Map<String, Value>, name: &str) -> Result<f64, ToolError> {
    required(arguments, name)?
        .as_f64()
        .ok_or_else(|| invalid(name, "number"))
}

fn required<'a>(arguments: &'a Map<String, Value>, name: &str) -> Result<&'a Value, ToolError> {
    arguments
        .get(name)
        .ok_or_else(|| ToolError::MissingParameter(name.to_string()))
}

fn invalid(name: &str, expected: &'static str) -> ToolError {
    ToolError::InvalidParameter {
        name: name.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args() -> Map<String, Value> {
        let Value::Object(map) = json!({
            "question": "find flights",
            "limit": 3,
            "direct": true,
            "budget": 420.5,
        }) else {
            unreachable!()
        };
        map
    }

    #[test]
    fn test_typed_getters() {
        let args = args();
        assert_eq!(get_str(&args, "question").unwrap(), "find flights");
        assert_eq!(get_i64(&args, "limit").unwrap(), 3);
        assert!(get_bool(&args, "direct").unwrap());
        assert_eq!(get_f64(&args, "budget").unwrap(), 420.5);
    }

    #[test]
    fn test_missing_parameter() {
        let err = get_str(&args(), "absent").unwrap_err();
        assert_eq!(err, ToolError::MissingParameter("absent".into()));
    }

    #[test]
    fn test_wrong_type() {
        let err = get_bool(&args(), "question").unwrap_err();
        assert!(matches!(err, ToolError::InvalidParameter { .. }));
    }

    #[test]
    fn test_default_schema_requires_question() {
        struct Probe;

        #[async_trait]
        impl ToolFunction for Probe {
            fn name(&self) -> String {
                "probe".into()
            }
            fn description(&self) -> String {
                "probe".into()
            }
            async fn call(
                &self,
                _arguments: Map<String, Value>,
            ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
                Ok("".into())
            }
        }

        let schema = Probe.parameters();
        let required = schema.get("required").unwrap().as_array().unwrap();
        assert_eq!(required, &vec![json!("question")]);
    }
}

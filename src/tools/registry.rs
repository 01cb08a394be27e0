use serde_json::{json, Map, Value};

use crate::{
    llm::ToolSpec,
    schemas::{ToolCall, ToolCallResult, REASONING_ARG},
    tools::{Capability, LifecycleError, ToolError, ToolInvocation},
};

const REASONING_DESCRIPTION: &str =
    "Your reasoning about why this tool is called and what you expect from it.";

/// Owns every capability an agent can dispatch to.
///
/// The registry enforces a strict lifecycle: capabilities are registered,
/// then the whole set is initialized by exactly one owner, dispatched
/// against, and finally closed. Misuse surfaces as [`LifecycleError`];
/// capability failures never do, they come back as error results.
pub struct ToolRegistry {
    capabilities: Vec<Capability>,
    owner: Option<String>,
    closed: bool,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            capabilities: Vec::new(),
            owner: None,
            closed: false,
        }
    }

    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }

    pub fn register(&mut self, capability: impl Into<Capability>) -> Result<(), LifecycleError> {
        if self.closed {
            return Err(LifecycleError::Closed);
        }
        let capability = capability.into();
        let name = capability.name();
        if self.capabilities.iter().any(|c| c.name() == name) {
            return Err(LifecycleError::AlreadyRegistered(name));
        }
        self.capabilities.push(capability);
        Ok(())
    }

    /// Initializes every capability on behalf of `owner`. A registry belongs
    /// to exactly one agent; a second initialization is a caller bug.
    pub async fn init_all(&mut self, owner: impl Into<String>) -> Result<(), LifecycleError> {
        if self.closed {
            return Err(LifecycleError::Closed);
        }
        if let Some(current) = &self.owner {
            return Err(LifecycleError::AlreadyInitialized(current.clone()));
        }
        self.owner = Some(owner.into());
        for capability in &mut self.capabilities {
            if let Err(e) = capability.init().await {
                log::warn!("Failed to initialize tool \"{}\": {e}", capability.name());
            }
        }
        Ok(())
    }

    /// Closes every capability and retires the registry.
    pub async fn close_all(&mut self) -> Result<(), LifecycleError> {
        if self.closed {
            return Err(LifecycleError::Closed);
        }
        self.closed = true;
        for capability in &mut self.capabilities {
            if let Err(e) = capability.close().await {
                log::warn!("Failed to close tool \"{}\": {e}", capability.name());
            }
        }
        Ok(())
    }

    /// Resolves and runs one tool call.
    ///
    /// The reasoning argument is stripped before the capability sees its
    /// input, and required parameters are checked against the capability's
    /// schema first. An unknown tool or a rejected input produces an error
    /// result, not a hard error.
    pub async fn dispatch(&self, call: &ToolCall) -> Result<ToolInvocation, LifecycleError> {
        if self.closed {
            return Err(LifecycleError::Closed);
        }
        if self.owner.is_none() {
            return Err(LifecycleError::NotInitialized);
        }

        let Some(capability) = self.capabilities.iter().find(|c| c.name() == call.tool_id)
        else {
            log::warn!("Model requested unknown tool \"{}\"", call.tool_id);
            return Ok(ToolInvocation::new(ToolCallResult::from_failure(
                call,
                format!("Tool \"{}\" is not registered", call.tool_id),
            )));
        };

        if let Err(e) = validate_required(&capability.parameters(), &call.stripped_arguments()) {
            return Ok(ToolInvocation::new(ToolCallResult::from_failure(call, e)));
        }

        log::debug!("Dispatching tool call {call}");
        Ok(capability.invoke(call).await)
    }

    /// Tool declarations as advertised to the model, each schema augmented
    /// with the optional reasoning parameter.
    pub fn tool_specs(&self) -> Vec<ToolSpec> {
        self.capabilities
            .iter()
            .map(|c| ToolSpec {
                name: c.name(),
                description: c.description(),
                parameters: inject_reasoning_parameter(c.parameters()),
            })
            .collect()
    }

    /// Markdown rendering of the registered tools, used in review prompts.
    pub fn describe(&self) -> String {
        self.capabilities
            .iter()
            .map(|c| {
                format!(
                    "## Tool\n### Tool ID: {}\n### Tool description: {}",
                    c.name(),
                    c.description()
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_required(parameters: &Value, arguments: &Map<String, Value>) -> Result<(), ToolError> {
    let Some(required) = parameters.get("required").and_then(Value::as_array) else {
        return Ok(());
    };
    for name in required.iter().filter_map(Value::as_str) {
        if name != REASONING_ARG && !arguments.contains_key(name) {
            return Err(ToolError::MissingParameter(name.to_string()));
        }
    }
    Ok(())
}

fn inject_reasoning_parameter(mut schema: Value) -> Value {
    if let Some(properties) = schema
        .as_object_mut()
        .and_then(|s| s.entry("properties").or_insert_with(|| json!({})).as_object_mut())
    {
        properties.entry(REASONING_ARG).or_insert_with(|| {
            json!({"type": "string", "description": REASONING_DESCRIPTION})
        });
    }
    schema
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::tools::ToolFunction;

    #[derive(Default)]
    struct EchoTool {
        seen: Arc<Mutex<Vec<Map<String, Value>>>>,
    }

    #[async_trait]
    impl ToolFunction for EchoTool {
        fn name(&self) -> String {
            "echo".into()
        }

        fn description(&self) -> String {
            "Echoes the question back".into()
        }

        async fn call(
            &self,
            arguments: Map<String, Value>,
        ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
            let question = arguments
                .get("question")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            self.seen.lock().unwrap().push(arguments);
            Ok(question)
        }
    }

    fn call(args: Value) -> ToolCall {
        let Value::Object(arguments) = args else {
            panic!("arguments must be an object");
        };
        ToolCall::new("call-1", "echo", arguments)
    }

    async fn ready_registry() -> (ToolRegistry, Arc<Mutex<Vec<Map<String, Value>>>>) {
        let tool = EchoTool::default();
        let seen = Arc::clone(&tool.seen);
        let mut registry = ToolRegistry::new();
        registry
            .register(Capability::Simple(Box::new(tool)))
            .unwrap();
        registry.init_all("tester").await.unwrap();
        (registry, seen)
    }

    #[tokio::test]
    async fn test_dispatch_strips_reasoning_argument() {
        let (registry, seen) = ready_registry().await;
        let invocation = registry
            .dispatch(&call(json!({"thought": "checking", "question": "hi"})))
            .await
            .unwrap();

        assert_eq!(invocation.result.text(), "hi");
        assert!(!invocation.result.is_error);
        let seen = seen.lock().unwrap();
        assert!(!seen[0].contains_key(REASONING_ARG));
    }

    #[tokio::test]
    async fn test_dispatch_rejects_missing_required_parameter() {
        let (registry, seen) = ready_registry().await;
        let invocation = registry
            .dispatch(&call(json!({"thought": "no question given"})))
            .await
            .unwrap();

        assert!(invocation.result.is_error);
        assert_eq!(
            invocation.result.text(),
            "Error: Missing required parameter \"question\""
        );
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool_is_error_result() {
        let (registry, _) = ready_registry().await;
        let unknown = ToolCall::new("call-2", "absent", Map::new());
        let invocation = registry.dispatch(&unknown).await.unwrap();
        assert!(invocation.result.is_error);
        assert!(invocation.result.text().contains("not registered"));
    }

    #[tokio::test]
    async fn test_dispatch_before_init_fails() {
        let mut registry = ToolRegistry::new();
        registry
            .register(Capability::Simple(Box::new(EchoTool::default())))
            .unwrap();
        let err = registry.dispatch(&call(json!({}))).await.unwrap_err();
        assert_eq!(err, LifecycleError::NotInitialized);
    }

    #[tokio::test]
    async fn test_single_owner() {
        let (mut registry, _) = ready_registry().await;
        let err = registry.init_all("intruder").await.unwrap_err();
        assert_eq!(err, LifecycleError::AlreadyInitialized("tester".into()));
    }

    #[tokio::test]
    async fn test_duplicate_registration_fails() {
        let mut registry = ToolRegistry::new();
        registry
            .register(Capability::Simple(Box::new(EchoTool::default())))
            .unwrap();
        let err = registry
            .register(Capability::Simple(Box::new(EchoTool::default())))
            .unwrap_err();
        assert_eq!(err, LifecycleError::AlreadyRegistered("echo".into()));
    }

    #[tokio::test]
    async fn test_closed_registry_rejects_everything() {
        let (mut registry, _) = ready_registry().await;
        registry.close_all().await.unwrap();

        assert_eq!(
            registry.dispatch(&call(json!({}))).await.unwrap_err(),
            LifecycleError::Closed
        );
        assert_eq!(
            registry
                .register(Capability::Simple(Box::new(EchoTool::default())))
                .unwrap_err(),
            LifecycleError::Closed
        );
        assert_eq!(registry.close_all().await.unwrap_err(), LifecycleError::Closed);
    }

    #[test]
    fn test_tool_specs_advertise_reasoning_parameter() {
        let mut registry = ToolRegistry::new();
        registry
            .register(Capability::Simple(Box::new(EchoTool::default())))
            .unwrap();

        let specs = registry.tool_specs();
        assert_eq!(specs.len(), 1);
        let properties = specs[0].parameters.get("properties").unwrap();
        assert!(properties.get(REASONING_ARG).is_some());
        assert!(properties.get("question").is_some());
        // The reasoning argument stays optional.
        let required = specs[0].parameters.get("required").unwrap();
        assert_eq!(required, &json!(["question"]));
    }

    #[test]
    fn test_describe_lists_tools() {
        let mut registry = ToolRegistry::new();
        registry
            .register(Capability::Simple(Box::new(EchoTool::default())))
            .unwrap();
        let description = registry.describe();
        assert!(description.contains("### Tool ID: echo"));
        assert!(description.contains("Echoes the question back"));
    }
}

use std::error::Error;

use async_trait::async_trait;
use schemars::{schema_for, JsonSchema};
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::{
    agent::ReactAgent,
    schemas::{Status, Step},
    tools::{get_str, AgentCapability},
};

#[derive(Debug, Deserialize, JsonSchema)]
struct AgentToolInput {
    /// A question that this tool must answer or a command it must execute.
    #[allow(dead_code)]
    question: String,
}

/// A [`ReactAgent`] wrapped as a tool for an outer agent, enabling recursive
/// composition.
///
/// The inner agent sits behind an async mutex: an agent instance runs one
/// command at a time, so concurrent calls from the outer executor are
/// serialized here.
pub struct ToolableAgent {
    id: String,
    description: String,
    agent: Mutex<ReactAgent>,
}

impl ToolableAgent {
    pub fn new(agent: ReactAgent) -> Self {
        Self {
            id: agent.id().to_string(),
            description: agent.description().to_string(),
            agent: Mutex::new(agent),
        }
    }
}

#[async_trait]
impl AgentCapability for ToolableAgent {
    fn name(&self) -> String {
        self.id.clone()
    }

    fn description(&self) -> String {
        self.description.clone()
    }

    fn parameters(&self) -> Value {
        serde_json::to_value(schema_for!(AgentToolInput)).unwrap_or_else(|e| {
            log::warn!("Failed to serialize agent tool schema: {e}");
            Value::Null
        })
    }

    async fn execute(
        &self,
        arguments: Map<String, Value>,
    ) -> Result<(String, Vec<Step>), Box<dyn Error + Send + Sync>> {
        let Ok(question) = get_str(&arguments, "question") else {
            return Ok((
                "ERROR: You must provide a command to execute as \"question\" parameter."
                    .to_string(),
                Vec::new(),
            ));
        };

        let mut agent = self.agent.lock().await;
        let step = agent.execute(&question).await;
        let nested_steps = agent.ledger().steps().to_vec();

        let result = if step.status == Some(Status::Error) {
            format!("ERROR: {}", step.observation)
        } else {
            step.observation
        };
        Ok((result, nested_steps))
    }

    async fn close(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.agent.lock().await.close().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::{
        agent::test_support::{step_reply, tool_call_reply, MockGateway},
        agent::AgentOptions,
        llm::{GatewayError, ModelGateway},
        schemas::ActionRecord,
        tools::{Capability, ToolRegistry},
    };

    async fn inner_agent(
        replies: Vec<Result<crate::schemas::Completion, GatewayError>>,
    ) -> (ToolableAgent, Arc<MockGateway>) {
        let gateway = MockGateway::new(replies);
        let agent = ReactAgent::new(
            "inner",
            "Answers nested questions",
            Arc::clone(&gateway) as Arc<dyn ModelGateway>,
            ToolRegistry::new(),
            AgentOptions::new().with_check_last_step(false),
        )
        .await
        .unwrap();
        (ToolableAgent::new(agent), gateway)
    }

    fn args(value: Value) -> Map<String, Value> {
        let Value::Object(map) = value else {
            panic!("arguments must be an object");
        };
        map
    }

    #[tokio::test]
    async fn test_missing_question_never_reaches_the_model() {
        let (tool, gateway) = inner_agent(vec![]).await;

        let (result, nested) = tool.execute(args(json!({}))).await.unwrap();

        assert_eq!(
            result,
            "ERROR: You must provide a command to execute as \"question\" parameter."
        );
        assert!(nested.is_empty());
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_delegates_and_returns_observation() {
        let (tool, _) =
            inner_agent(vec![Ok(step_reply("COMPLETED", "easy", "42 degrees"))]).await;

        let (result, nested) = tool
            .execute(args(json!({"question": "what is the temperature?"})))
            .await
            .unwrap();

        assert_eq!(result, "42 degrees");
        // Seed step plus the final step of the inner run.
        assert_eq!(nested.len(), 2);
    }

    #[tokio::test]
    async fn test_error_status_is_prefixed() {
        let (tool, _) =
            inner_agent(vec![Ok(step_reply("ERROR", "no data", "no thermometer"))]).await;

        let (result, _) = tool
            .execute(args(json!({"question": "what is the temperature?"})))
            .await
            .unwrap();

        assert_eq!(result, "ERROR: no thermometer");
    }

    #[tokio::test]
    async fn test_nested_steps_land_in_outer_ledger() {
        let (inner, _) =
            inner_agent(vec![Ok(step_reply("COMPLETED", "easy", "42 degrees"))]).await;

        let outer_gateway = MockGateway::new(vec![
            Ok(tool_call_reply(
                "c1",
                "inner",
                json!({"question": "what is the temperature?"}),
            )),
            Ok(step_reply("COMPLETED", "done", "it is 42 degrees")),
        ]);
        let mut registry = ToolRegistry::new();
        registry.register(Capability::Agent(Box::new(inner))).unwrap();
        let mut outer = ReactAgent::new(
            "outer",
            "Weather reporter",
            Arc::clone(&outer_gateway) as Arc<dyn ModelGateway>,
            registry,
            AgentOptions::new().with_check_last_step(false),
        )
        .await
        .unwrap();

        outer.execute("report the temperature").await;

        let ActionRecord { action_steps, .. } = outer.ledger().steps()[1]
            .action
            .clone()
            .unwrap();
        assert_eq!(action_steps.len(), 2);
        assert_eq!(outer.ledger().steps()[1].observation, "42 degrees");
        // The nested transcript is suppressed from the next prompt.
        assert!(!outer_gateway
            .requests()[1]
            .messages
            .iter()
            .any(|m| matches!(m, crate::schemas::Message::User(p) if p.contains("action_steps"))));
    }

    #[tokio::test]
    async fn test_parameters_require_question() {
        let (tool, _) = inner_agent(vec![]).await;
        let schema = tool.parameters();
        assert_eq!(schema.get("required").unwrap(), &json!(["question"]));
    }
}

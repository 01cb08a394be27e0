use async_trait::async_trait;
use serde_json::Value;

use crate::{
    llm::GatewayError,
    schemas::{Completion, Message},
};

/// Declaration of one callable tool, as advertised to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON schema of the tool's parameters.
    pub parameters: Value,
}

/// One request to the language model: an ordered conversation, an optional
/// structured-output schema, the tools the model may call, and a sampling
/// temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub response_schema: Option<Value>,
    pub tools: Vec<ToolSpec>,
    pub temperature: f32,
}

impl ChatRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            response_schema: None,
            tools: Vec::new(),
            temperature: 0.0,
        }
    }

    pub fn with_response_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// The opaque request/response boundary to a language model.
///
/// Implementations are expected to be cheap to call concurrently; all loop
/// state lives on the caller's side.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<Completion, GatewayError>;
}

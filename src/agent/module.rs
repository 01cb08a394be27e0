use std::sync::Arc;

use serde_json::Value;

use crate::{
    llm::{ChatRequest, Conversation, GatewayError, ModelGateway, ToolSpec},
    schemas::{Completion, Message},
};

/// One named chat session against the model gateway: a personality (system
/// prompt), a conversation buffer, and a sampling temperature.
///
/// Both the executor and the reviewer are chat modules; they differ only in
/// what they put into the prompt and what they do with the reply.
pub struct ChatModule {
    id: String,
    gateway: Arc<dyn ModelGateway>,
    personality: Option<String>,
    conversation: Conversation,
    temperature: f32,
}

impl ChatModule {
    pub fn new(id: impl Into<String>, gateway: Arc<dyn ModelGateway>) -> Self {
        Self {
            id: id.into(),
            gateway,
            personality: None,
            conversation: Conversation::new(),
            temperature: 0.0,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_history(mut self, max_history: Option<usize>) -> Self {
        self.conversation = match max_history {
            Some(max) => Conversation::new().with_max_messages(max),
            None => Conversation::new().without_max_messages(),
        };
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_personality(&mut self, personality: impl Into<String>) {
        self.personality = Some(personality.into());
    }

    pub fn clear_conversation(&mut self) {
        self.conversation.clear();
    }

    /// Sends one user message on top of the current conversation and records
    /// the assistant's reply into it.
    pub async fn chat(
        &mut self,
        prompt: &str,
        response_schema: Option<Value>,
        tools: Vec<ToolSpec>,
    ) -> Result<Completion, GatewayError> {
        self.conversation.push(Message::User(prompt.to_string()));

        let mut messages = Vec::with_capacity(self.conversation.len() + 1);
        if let Some(personality) = &self.personality {
            messages.push(Message::System(personality.clone()));
        }
        messages.extend(self.conversation.messages().iter().cloned());

        let mut request = ChatRequest::new(messages).with_temperature(self.temperature);
        if let Some(schema) = response_schema {
            request = request.with_response_schema(schema);
        }
        if !tools.is_empty() {
            request = request.with_tools(tools);
        }

        log::debug!("[{}] chat: {prompt}", self.id);
        let completion = self.gateway.complete(request).await?;
        self.conversation.push(completion.clone().into_message());
        Ok(completion)
    }
}

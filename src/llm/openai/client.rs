use async_openai::{
    config::{Config, OpenAIConfig},
    Client,
};
use async_trait::async_trait;

use crate::{
    llm::{
        openai::request::{build_request, to_completion},
        ChatRequest, GatewayError, ModelGateway, OpenAiModel,
    },
    schemas::Completion,
};

/// Gateway to the OpenAI chat completion API.
#[derive(Debug, Clone)]
pub struct OpenAiGateway<C: Config> {
    config: C,
    model: String,
}

impl<C: Config> OpenAiGateway<C> {
    pub fn new(config: C) -> Self {
        Self {
            config,
            model: OpenAiModel::Gpt41Mini.to_string(),
        }
    }

    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = model.into();
        self
    }
}

impl Default for OpenAiGateway<OpenAIConfig> {
    fn default() -> Self {
        Self::new(OpenAIConfig::default())
    }
}

#[async_trait]
impl<C: Config + Send + Sync + Clone> ModelGateway for OpenAiGateway<C> {
    async fn complete(&self, request: ChatRequest) -> Result<Completion, GatewayError> {
        let client = Client::with_config(self.config.clone());
        let request = build_request(&self.model, &request)?;

        log::debug!("Calling OpenAI model {}", self.model);
        let response = client.chat().create(request).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(GatewayError::EmptyReply)?;
        to_completion(choice)
    }
}

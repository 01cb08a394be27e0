use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{
    llm::{ChatRequest, GatewayError, ModelGateway},
    schemas::{Completion, CompletionContent, FinishReason, ToolCall},
};

/// Scripted gateway: replays a fixed sequence of replies and records every
/// request it receives.
pub(crate) struct MockGateway {
    replies: Mutex<VecDeque<Result<Completion, GatewayError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockGateway {
    pub(crate) fn new(replies: Vec<Result<Completion, GatewayError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelGateway for MockGateway {
    async fn complete(&self, request: ChatRequest) -> Result<Completion, GatewayError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Other("no scripted reply left".into())))
    }
}

pub(crate) fn text_reply(text: &str) -> Completion {
    Completion::new(
        FinishReason::Completed,
        CompletionContent::Text(text.to_string()),
    )
}

/// A valid step record reply with the given status.
pub(crate) fn step_reply(status: &str, thought: &str, observation: &str) -> Completion {
    text_reply(
        &json!({
            "status": status,
            "actor": "model",
            "thought": thought,
            "observation": observation,
        })
        .to_string(),
    )
}

pub(crate) fn tool_call_reply(id: &str, tool_id: &str, arguments: Value) -> Completion {
    let Value::Object(arguments) = arguments else {
        panic!("arguments must be an object");
    };
    Completion::new(
        FinishReason::Completed,
        CompletionContent::ToolCalls(vec![ToolCall::new(id, tool_id, arguments)]),
    )
}

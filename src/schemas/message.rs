use std::fmt;

use crate::schemas::{ToolCall, ToolCallResult};

/// Why the model stopped producing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    InProgress,
    Completed,
    Truncated,
    Inappropriate,
    Other,
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinishReason::InProgress => write!(f, "IN_PROGRESS"),
            FinishReason::Completed => write!(f, "COMPLETED"),
            FinishReason::Truncated => write!(f, "TRUNCATED"),
            FinishReason::Inappropriate => write!(f, "INAPPROPRIATE"),
            FinishReason::Other => write!(f, "OTHER"),
        }
    }
}

/// A role-tagged unit of conversation sent to or received from the model.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    System(String),
    User(String),
    Assistant(String),
    AssistantToolCalls(Vec<ToolCall>),
    ToolResult(ToolCallResult),
}

impl Message {
    pub fn is_tool_result(&self) -> bool {
        matches!(self, Message::ToolResult(_))
    }
}

/// What the model replied with: plain text or tool-call requests, never both
/// in the same completion.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionContent {
    Text(String),
    ToolCalls(Vec<ToolCall>),
}

/// The model's reply plus its finish indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub finish_reason: FinishReason,
    pub content: CompletionContent,
}

impl Completion {
    pub fn new(finish_reason: FinishReason, content: CompletionContent) -> Self {
        Self {
            finish_reason,
            content,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.content {
            CompletionContent::Text(text) => Some(text),
            CompletionContent::ToolCalls(_) => None,
        }
    }

    pub fn tool_calls(&self) -> Option<&[ToolCall]> {
        match &self.content {
            CompletionContent::ToolCalls(calls) => Some(calls),
            CompletionContent::Text(_) => None,
        }
    }

    /// The assistant-side message to append to the conversation history.
    pub fn into_message(self) -> Message {
        match self.content {
            CompletionContent::Text(text) => Message::Assistant(text),
            CompletionContent::ToolCalls(calls) => Message::AssistantToolCalls(calls),
        }
    }
}

use crate::schemas::Message;

/// Ordered message history for one chat module.
///
/// The bound is optional: `None` means unbounded. When trimming, leading
/// tool-result messages are dropped as well, since a tool result without its
/// originating call confuses the model.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    max_messages: Option<usize>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_messages(mut self, max_messages: usize) -> Self {
        self.max_messages = Some(max_messages);
        self
    }

    pub fn without_max_messages(mut self) -> Self {
        self.max_messages = None;
        self
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.trim();
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    fn trim(&mut self) {
        if let Some(max) = self.max_messages {
            if self.messages.len() > max {
                self.messages.drain(..self.messages.len() - max);
            }
        }
        let leading_results = self
            .messages
            .iter()
            .take_while(|m| m.is_tool_result())
            .count();
        self.messages.drain(..leading_results);
    }
}

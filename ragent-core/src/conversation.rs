//! Append-only conversation log.

use serde::{Deserialize, Serialize};

use crate::message::{Message, Role};

/// An ordered, append-only log of [`Message`]s.
///
/// There is no way to remove or reorder entries once pushed; callers that
/// need to discard a partially built turn work on a clone and only keep it
/// on success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a conversation with a system instruction.
    pub fn with_system(instruction: impl Into<String>) -> Self {
        Self { messages: vec![Message::system(instruction)] }
    }

    pub fn push(&mut self, message: impl Into<Message>) {
        self.messages.push(message.into());
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

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of messages authored by `role`.
    pub fn count_role(&self, role: Role) -> usize {
        self.messages.iter().filter(|m| m.role == role).count()
    }
}

impl From<Vec<Message>> for Conversation {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

impl IntoIterator for Conversation {
    type Item = Message;
    type IntoIter = std::vec::IntoIter<Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

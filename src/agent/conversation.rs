//! Per-invocation conversation history.

use crate::model::Message;

/// Ordered message history owned by one conversation loop invocation.
///
/// The history only grows; it is dropped when the loop returns.
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    messages: Vec<Message>,
}

impl ConversationState {
    /// Seed a conversation with a system prompt and optional user message.
    pub fn seeded(system_prompt: &str, input: Option<&str>) -> Self {
        let mut messages = vec![Message::system(system_prompt)];
        if let Some(input) = input {
            messages.push(Message::user(input));
        }
        Self { messages }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn extend(&mut self, messages: impl IntoIterator<Item = Message>) {
        self.messages.extend(messages);
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    #[test]
    fn test_seeded_without_input() {
        let state = ConversationState::seeded("You coordinate.", None);
        assert_eq!(state.len(), 1);
        assert_eq!(state.messages()[0].role(), Role::System);
    }

    #[test]
    fn test_seeded_with_input() {
        let state = ConversationState::seeded("You summarize.", Some("Summarize it"));
        let roles: Vec<Role> = state.messages().iter().map(Message::role).collect();
        assert_eq!(roles, vec![Role::System, Role::User]);
    }
}

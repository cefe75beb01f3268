use crate::models::message::Message;

/// An ordered, append-only log of conversation turns. The log always begins
/// with exactly one system turn, seeded at construction, and is serialized in
/// full into every outbound request; that is how the model receives
/// multi-turn context. There is no removal or reordering.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new<S: Into<String>>(system_prompt: S) -> Self {
        Conversation {
            messages: vec![Message::system().with_text(system_prompt)],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// The full ordered log, for serialization into an outbound request.
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
    use crate::models::role::Role;

    #[test]
    fn test_seeded_with_system_turn() {
        let conversation = Conversation::new("be brief");
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.messages()[0].role, Role::System);
        assert_eq!(conversation.messages()[0].text(), "be brief");
    }

    #[test]
    fn test_append_preserves_order() {
        let mut conversation = Conversation::new("sys");
        conversation.push(Message::user().with_text("one"));
        conversation.push(Message::assistant().with_text("two"));
        conversation.push(Message::user().with_text("three"));

        let texts: Vec<String> = conversation
            .messages()
            .iter()
            .map(|message| message.text())
            .collect();
        assert_eq!(texts, vec!["sys", "one", "two", "three"]);
        assert_eq!(conversation.len(), 4);
    }
}

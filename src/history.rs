//! Append-only conversation store.

/// Ordered record of the raw message text exchanged with the endpoint.
///
/// Messages alternate user/assistant; the role is positional and never
/// stored. The sequence grows without bound and only resets when the
/// process exits.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    messages: Vec<String>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self { messages: Vec::new() }
    }

    /// Append one raw message. Entries are never edited or removed.
    pub fn push(&mut self, message: String) {
        self.messages.push(message);
    }

    /// Full history in insertion order, sent whole on every turn.
    pub fn messages(&self) -> &[String] {
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

    #[test]
    fn preserves_insertion_order() {
        let mut history = ConversationHistory::new();
        history.push("hello".to_string());
        history.push("hi there".to_string());
        history.push("how are you".to_string());

        assert_eq!(history.len(), 3);
        assert_eq!(history.messages(), ["hello", "hi there", "how are you"]);
    }

    #[test]
    fn starts_empty() {
        let history = ConversationHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.messages(), Vec::<String>::new());
    }
}

//! Messages read back from an upstream thread.

use serde::{Deserialize, Serialize};

/// Author of a thread message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One content part of a thread message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    Text(String),
    /// Non-text content (images, file references). Never concatenated.
    Other { kind: String },
}

/// A message listed from a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadMessage {
    pub id: String,
    pub role: MessageRole,
    pub content: Vec<MessageContent>,
}

impl ThreadMessage {
    /// Creates a message with a single text part.
    pub fn text(id: impl Into<String>, role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role,
            content: vec![MessageContent::Text(text.into())],
        }
    }

    /// Concatenated text parts of this message.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                MessageContent::Text(value) => Some(value.as_str()),
                MessageContent::Other { .. } => None,
            })
            .collect()
    }
}

/// Concatenates the text of every assistant message, in listing order.
pub fn concat_assistant_text(messages: &[ThreadMessage]) -> String {
    messages
        .iter()
        .filter(|m| m.role == MessageRole::Assistant)
        .map(ThreadMessage::text_content)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_user_messages() {
        let messages = vec![
            ThreadMessage::text("m1", MessageRole::User, "hi"),
            ThreadMessage::text("m2", MessageRole::Assistant, "hello "),
            ThreadMessage::text("m3", MessageRole::Assistant, "냥"),
        ];
        assert_eq!(concat_assistant_text(&messages), "hello 냥");
    }

    #[test]
    fn ignores_non_text_parts() {
        let message = ThreadMessage {
            id: "m1".into(),
            role: MessageRole::Assistant,
            content: vec![
                MessageContent::Text("a".into()),
                MessageContent::Other {
                    kind: "image_file".into(),
                },
                MessageContent::Text("b".into()),
            ],
        };
        assert_eq!(message.text_content(), "ab");
    }

    #[test]
    fn empty_thread_yields_empty_text() {
        assert_eq!(concat_assistant_text(&[]), "");
    }
}

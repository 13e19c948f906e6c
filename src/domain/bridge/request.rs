//! Inbound conversation request.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which JSON field carries the caller's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputField {
    #[default]
    Message,
    Equation,
}

impl InputField {
    /// The JSON key for this field.
    pub fn as_str(&self) -> &'static str {
        match self {
            InputField::Message => "message",
            InputField::Equation => "equation",
        }
    }
}

impl std::fmt::Display for InputField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why inbound text was refused before the guard ran.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("missing `{0}` field")]
    Missing(InputField),

    #[error("`{0}` must not be empty")]
    Empty(InputField),
}

/// Validated user text for one bridge call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationRequest {
    text: String,
}

impl ConversationRequest {
    /// Validates raw text pulled from `field`.
    pub fn new(field: InputField, text: Option<String>) -> Result<Self, RequestError> {
        let text = text.ok_or(RequestError::Missing(field))?;
        if text.trim().is_empty() {
            return Err(RequestError::Empty(field));
        }
        Ok(Self { text })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

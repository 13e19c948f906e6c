//! Data transfer objects for bridge HTTP endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::bridge::InputField;

// ═══════════════════════════════════════════════════════════════════════════
// Request DTOs
// ═══════════════════════════════════════════════════════════════════════════

/// Body of a bridge request.
///
/// Only the field named by the endpoint's profile is read; the other is
/// ignored if present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeRequest {
    pub message: Option<String>,
    pub equation: Option<String>,
}

impl BridgeRequest {
    /// Takes the text carried in `field`.
    pub fn into_field(self, field: InputField) -> Option<String> {
        match field {
            InputField::Message => self.message,
            InputField::Equation => self.equation,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Response DTOs
// ═══════════════════════════════════════════════════════════════════════════

/// Successful reply, including guard instructions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeResponse {
    pub response: String,
}

/// Error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short category
    pub error: String,
    /// Human-readable cause
    pub details: String,
}

impl ErrorResponse {
    pub fn bad_request(details: impl Into<String>) -> Self {
        Self {
            error: "invalid request".to_string(),
            details: details.into(),
        }
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self {
            error: "An error occurred".to_string(),
            details: details.into(),
        }
    }

    pub fn deadline_exceeded(details: impl Into<String>) -> Self {
        Self {
            error: "deadline exceeded".to_string(),
            details: details.into(),
        }
    }
}

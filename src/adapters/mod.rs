//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the bridge to external systems:
//! - `assistant` - Assistants API clients (OpenAI, mock)
//! - `http` - Axum routes exposing the bridge endpoints

pub mod assistant;
pub mod http;

pub use assistant::{MockAssistantApi, OpenAIAssistantsClient, OpenAIConfig};

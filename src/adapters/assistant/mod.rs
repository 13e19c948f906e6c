//! Assistants API adapters.
//!
//! - `OpenAIAssistantsClient` - the hosted OpenAI Assistants v2 API
//! - `MockAssistantApi` - scriptable in-process double for tests

mod mock;
mod openai_assistants;
mod sse;

pub use mock::{MockAssistantApi, MockStage, MockStreamItem};
pub use openai_assistants::{OpenAIAssistantsClient, OpenAIConfig};

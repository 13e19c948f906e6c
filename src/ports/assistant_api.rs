//! Assistant API Port - Interface for a hosted assistants service.
//!
//! This port abstracts the assistant / thread / run / message object model of
//! the upstream service so the bridge handler can be driven by a real HTTP
//! client or by a scripted fake in tests.
//!
//! # Design
//!
//! - One method per upstream operation the bridge performs
//! - Runs can be awaited by polling (`create_run` + `retrieve_run`) or by
//!   consuming a stream of typed events (`stream_run`)
//! - Error types for common failure modes (auth, rate limits, transport)

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use crate::domain::bridge::{AssistantTool, RunStatus, RunStreamEvent, ThreadMessage};

/// Boxed stream of run events.
pub type RunEventStream =
    Pin<Box<dyn Stream<Item = Result<RunStreamEvent, AssistantError>> + Send>>;

/// Port for the upstream assistants service.
///
/// Implementations translate between the provider's HTTP API and the
/// bridge's domain types.
#[async_trait]
pub trait AssistantApi: Send + Sync {
    /// Creates a new assistant definition.
    async fn create_assistant(&self, spec: AssistantSpec) -> Result<AssistantRef, AssistantError>;

    /// Creates a new, empty thread.
    async fn create_thread(&self) -> Result<ThreadRef, AssistantError>;

    /// Appends a user message to a thread.
    async fn create_message(&self, thread_id: &str, content: &str) -> Result<(), AssistantError>;

    /// Starts a run of `assistant_id` on `thread_id`.
    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<RunRef, AssistantError>;

    /// Fetches the current state of a run.
    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<RunRef, AssistantError>;

    /// Lists a thread's messages, oldest first.
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, AssistantError>;

    /// Starts a run in streaming mode.
    async fn stream_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
    ) -> Result<RunEventStream, AssistantError>;
}

/// Definition of the assistant to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantSpec {
    pub name: String,
    pub instructions: String,
    pub model: String,
    pub tools: Vec<AssistantTool>,
}

impl AssistantSpec {
    /// Creates a spec with no tools.
    pub fn new(
        name: impl Into<String>,
        instructions: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            model: model.into(),
            tools: Vec::new(),
        }
    }

    /// Sets the enabled tools.
    pub fn with_tools(mut self, tools: Vec<AssistantTool>) -> Self {
        self.tools = tools;
        self
    }
}

/// Handle to a created assistant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantRef {
    pub id: String,
}

/// Handle to a created thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadRef {
    pub id: String,
}

/// Snapshot of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRef {
    pub id: String,
    pub status: RunStatus,
    /// Upstream error message for failed runs.
    pub last_error: Option<String>,
}

impl RunRef {
    pub fn new(id: impl Into<String>, status: RunStatus) -> Self {
        Self {
            id: id.into(),
            status,
            last_error: None,
        }
    }
}

/// Assistants API errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AssistantError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Referenced assistant, thread or run does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

impl AssistantError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

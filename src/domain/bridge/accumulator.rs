//! Folds a streaming run's events into the final response text.
//!
//! The accumulator is a small state machine:
//!
//! ```text
//! Streaming ──End──────▶ Ended
//!     │
//!     └──Failed───────▶ Failed
//! ```
//!
//! Only textual fragments are appended: text created, text deltas,
//! code-interpreter input, and `logs` outputs. Tool-call creation and image
//! outputs contribute nothing.

use thiserror::Error;

use super::stream_event::{CodeOutput, RunStreamEvent};
use crate::domain::foundation::StateMachine;

/// Literal left behind when a non-string value was stringified into the text.
pub const OBJECT_ARTIFACT: &str = "[object Object]";

/// State of a stream fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Streaming,
    Ended,
    Failed,
}

impl StateMachine for StreamState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use StreamState::*;
        matches!((self, target), (Streaming, Ended) | (Streaming, Failed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use StreamState::*;
        match self {
            Streaming => vec![Ended, Failed],
            Ended | Failed => vec![],
        }
    }
}

/// Errors raised while folding events.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccumulatorError {
    #[error("run failed: {reason}")]
    RunFailed { reason: String },

    #[error("event `{event}` arrived after the stream reached {state:?}")]
    AfterTerminal {
        event: &'static str,
        state: StreamState,
    },

    #[error("stream closed before the run ended")]
    NotEnded,
}

/// Per-request buffer for a streaming run.
#[derive(Debug, Clone)]
pub struct ResponseAccumulator {
    state: StreamState,
    text: String,
    failure: Option<String>,
}

impl Default for ResponseAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseAccumulator {
    pub fn new() -> Self {
        Self {
            state: StreamState::Streaming,
            text: String::new(),
            failure: None,
        }
    }

    /// Text accumulated so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Applies one event and returns the resulting state.
    pub fn apply(&mut self, event: RunStreamEvent) -> Result<StreamState, AccumulatorError> {
        if self.state.is_terminal() {
            return Err(AccumulatorError::AfterTerminal {
                event: event.kind(),
                state: self.state,
            });
        }

        match event {
            RunStreamEvent::TextCreated { text } | RunStreamEvent::TextDelta { text } => {
                self.text.push_str(&text);
            }
            RunStreamEvent::ToolCallCreated { kind } => {
                tracing::debug!(tool = %kind, "tool call created");
            }
            RunStreamEvent::ToolCallDelta(delta) => {
                if let Some(code) = delta.input {
                    self.text.push_str(&code);
                }
                for output in delta.outputs {
                    if let CodeOutput::Logs(logs) = output {
                        self.text.push_str(&logs);
                    }
                }
            }
            RunStreamEvent::End => {
                if self.text.contains(OBJECT_ARTIFACT) {
                    self.text = self.text.replace(OBJECT_ARTIFACT, "");
                }
                self.state = StreamState::Ended;
            }
            RunStreamEvent::Failed { reason } => {
                self.failure = Some(reason);
                self.state = StreamState::Failed;
            }
        }

        Ok(self.state)
    }

    /// Consumes the accumulator, yielding the response text once ended.
    pub fn finish(self) -> Result<String, AccumulatorError> {
        match self.state {
            StreamState::Ended => Ok(self.text),
            StreamState::Failed => Err(AccumulatorError::RunFailed {
                reason: self.failure.unwrap_or_default(),
            }),
            StreamState::Streaming => Err(AccumulatorError::NotEnded),
        }
    }

    /// Folds a complete event sequence, stopping at the first terminal event.
    pub fn fold<I>(events: I) -> Result<String, AccumulatorError>
    where
        I: IntoIterator<Item = RunStreamEvent>,
    {
        let mut acc = Self::new();
        for event in events {
            if acc.apply(event)?.is_terminal() {
                break;
            }
        }
        acc.finish()
    }
}

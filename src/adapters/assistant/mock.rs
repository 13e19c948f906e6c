//! Mock Assistants API for testing.
//!
//! Provides a scriptable implementation of the AssistantApi port, allowing
//! tests to run without calling the real service.
//!
//! # Features
//!
//! - Scripted run status sequences for the poll strategy
//! - Scripted event sequences for the stream strategy
//! - Error injection at any stage
//! - Per-operation call counting for verification
//!
//! # Example
//!
//! ```ignore
//! let api = MockAssistantApi::new()
//!     .with_statuses(vec![RunStatus::InProgress, RunStatus::Completed])
//!     .with_assistant_reply("안녕 냥");
//!
//! let handler = BridgeHandler::new(Arc::new(api.clone()), BridgeSettings::default());
//! assert_eq!(api.call_count(MockStage::CreateThread), 1);
//! ```

use async_trait::async_trait;
use futures::stream;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::bridge::{MessageRole, RunStatus, RunStreamEvent, ThreadMessage};
use crate::ports::{
    AssistantApi, AssistantError, AssistantRef, AssistantSpec, RunEventStream, RunRef, ThreadRef,
};

/// Upstream operation, used for call counting and error injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockStage {
    CreateAssistant,
    CreateThread,
    CreateMessage,
    CreateRun,
    RetrieveRun,
    ListMessages,
    StreamRun,
}

/// One scripted item of a streaming run.
#[derive(Debug, Clone)]
pub enum MockStreamItem {
    Event(RunStreamEvent),
    Error(AssistantError),
}

#[derive(Debug, Default)]
struct MockState {
    statuses: VecDeque<RunStatus>,
    never_completes: bool,
    failures: HashMap<MockStage, AssistantError>,
    calls: HashMap<MockStage, usize>,
    assistants: Vec<AssistantSpec>,
    user_messages: Vec<String>,
    next_id: usize,
}

/// Mock assistants API for testing.
///
/// Clones share state, so a test can keep one handle for assertions while
/// the handler owns another.
#[derive(Debug, Clone)]
pub struct MockAssistantApi {
    state: Arc<Mutex<MockState>>,
    replies: Vec<ThreadMessage>,
    stream: Vec<MockStreamItem>,
    delay: Duration,
}

impl Default for MockAssistantApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAssistantApi {
    /// Creates a mock whose runs complete on the first poll with one
    /// assistant reply, and whose streams emit that reply then end.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            replies: vec![ThreadMessage::text(
                "msg_reply",
                MessageRole::Assistant,
                "Mock response",
            )],
            stream: vec![
                MockStreamItem::Event(RunStreamEvent::text_created("")),
                MockStreamItem::Event(RunStreamEvent::text_delta("Mock response")),
                MockStreamItem::Event(RunStreamEvent::End),
            ],
            delay: Duration::ZERO,
        }
    }

    /// Statuses returned by successive `retrieve_run` calls.
    ///
    /// Once exhausted, runs report `Completed`.
    pub fn with_statuses(self, statuses: Vec<RunStatus>) -> Self {
        self.lock().statuses = statuses.into();
        self
    }

    /// Runs stay `InProgress` forever.
    pub fn never_completes(self) -> Self {
        self.lock().never_completes = true;
        self
    }

    /// Replaces the assistant replies listed after the run.
    pub fn with_replies(mut self, replies: Vec<ThreadMessage>) -> Self {
        self.replies = replies;
        self
    }

    /// Shorthand for a single assistant reply.
    pub fn with_assistant_reply(self, text: impl Into<String>) -> Self {
        self.with_replies(vec![ThreadMessage::text(
            "msg_reply",
            MessageRole::Assistant,
            text,
        )])
    }

    /// Replaces the scripted stream with successful events.
    pub fn with_stream_events(mut self, events: Vec<RunStreamEvent>) -> Self {
        self.stream = events.into_iter().map(MockStreamItem::Event).collect();
        self
    }

    /// Replaces the scripted stream, allowing mid-stream errors.
    pub fn with_stream_items(mut self, items: Vec<MockStreamItem>) -> Self {
        self.stream = items;
        self
    }

    /// Makes every call to `stage` fail with `error`.
    pub fn with_failure(self, stage: MockStage, error: AssistantError) -> Self {
        self.lock().failures.insert(stage, error);
        self
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of calls made to `stage`.
    pub fn call_count(&self, stage: MockStage) -> usize {
        self.lock().calls.get(&stage).copied().unwrap_or(0)
    }

    /// Total number of upstream calls of any kind.
    pub fn total_calls(&self) -> usize {
        self.lock().calls.values().sum()
    }

    /// Assistant definitions created so far.
    pub fn created_assistants(&self) -> Vec<AssistantSpec> {
        self.lock().assistants.clone()
    }

    /// User messages submitted so far.
    pub fn user_messages(&self) -> Vec<String> {
        self.lock().user_messages.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// Records the call, simulates latency, and applies injected failures.
    async fn enter(&self, stage: MockStage) -> Result<(), AssistantError> {
        let failure = {
            let mut state = self.lock();
            *state.calls.entry(stage).or_insert(0) += 1;
            state.failures.get(&stage).cloned()
        };

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        let mut state = self.lock();
        state.next_id += 1;
        format!("{}_{}", prefix, state.next_id)
    }
}

#[async_trait]
impl AssistantApi for MockAssistantApi {
    async fn create_assistant(&self, spec: AssistantSpec) -> Result<AssistantRef, AssistantError> {
        self.enter(MockStage::CreateAssistant).await?;
        self.lock().assistants.push(spec);
        Ok(AssistantRef {
            id: self.next_id("asst"),
        })
    }

    async fn create_thread(&self) -> Result<ThreadRef, AssistantError> {
        self.enter(MockStage::CreateThread).await?;
        Ok(ThreadRef {
            id: self.next_id("thread"),
        })
    }

    async fn create_message(&self, _thread_id: &str, content: &str) -> Result<(), AssistantError> {
        self.enter(MockStage::CreateMessage).await?;
        self.lock().user_messages.push(content.to_string());
        Ok(())
    }

    async fn create_run(&self, _thread_id: &str, _assistant_id: &str) -> Result<RunRef, AssistantError> {
        self.enter(MockStage::CreateRun).await?;
        Ok(RunRef::new(self.next_id("run"), RunStatus::Queued))
    }

    async fn retrieve_run(&self, _thread_id: &str, run_id: &str) -> Result<RunRef, AssistantError> {
        self.enter(MockStage::RetrieveRun).await?;
        let mut state = self.lock();
        let status = if state.never_completes {
            RunStatus::InProgress
        } else {
            state.statuses.pop_front().unwrap_or(RunStatus::Completed)
        };
        let mut run = RunRef::new(run_id, status);
        if status.is_failure() {
            run.last_error = Some(format!("run {}", status));
        }
        Ok(run)
    }

    async fn list_messages(&self, _thread_id: &str) -> Result<Vec<ThreadMessage>, AssistantError> {
        self.enter(MockStage::ListMessages).await?;
        let question = self.lock().user_messages.last().cloned().unwrap_or_default();

        let mut messages = vec![ThreadMessage::text("msg_user", MessageRole::User, question)];
        messages.extend(self.replies.iter().cloned());
        Ok(messages)
    }

    async fn stream_run(
        &self,
        _thread_id: &str,
        _assistant_id: &str,
    ) -> Result<RunEventStream, AssistantError> {
        self.enter(MockStage::StreamRun).await?;
        let items: Vec<Result<RunStreamEvent, AssistantError>> = self
            .stream
            .iter()
            .cloned()
            .map(|item| match item {
                MockStreamItem::Event(event) => Ok(event),
                MockStreamItem::Error(err) => Err(err),
            })
            .collect();
        Ok(Box::pin(stream::iter(items)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn counts_calls_per_stage() {
        let api = MockAssistantApi::new();
        api.create_thread().await.unwrap();
        api.create_thread().await.unwrap();

        assert_eq!(api.call_count(MockStage::CreateThread), 2);
        assert_eq!(api.call_count(MockStage::CreateAssistant), 0);
        assert_eq!(api.total_calls(), 2);
    }

    #[tokio::test]
    async fn issues_distinct_ids() {
        let api = MockAssistantApi::new();
        let a = api.create_thread().await.unwrap();
        let b = api.create_thread().await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn injected_failure_is_returned_and_counted() {
        let api = MockAssistantApi::new()
            .with_failure(MockStage::CreateRun, AssistantError::AuthenticationFailed);

        let err = api.create_run("thread_1", "asst_1").await.unwrap_err();
        assert!(matches!(err, AssistantError::AuthenticationFailed));
        assert_eq!(api.call_count(MockStage::CreateRun), 1);
    }

    #[tokio::test]
    async fn statuses_are_consumed_then_complete() {
        let api = MockAssistantApi::new().with_statuses(vec![RunStatus::InProgress]);

        let first = api.retrieve_run("t", "r").await.unwrap();
        let second = api.retrieve_run("t", "r").await.unwrap();
        assert_eq!(first.status, RunStatus::InProgress);
        assert_eq!(second.status, RunStatus::Completed);
    }

    #[tokio::test]
    async fn failed_status_carries_error() {
        let api = MockAssistantApi::new().with_statuses(vec![RunStatus::Expired]);
        let run = api.retrieve_run("t", "r").await.unwrap();
        assert_eq!(run.last_error.as_deref(), Some("run expired"));
    }

    #[tokio::test]
    async fn lists_user_question_before_replies() {
        let api = MockAssistantApi::new().with_assistant_reply("meow");
        api.create_message("t", "hello").await.unwrap();

        let messages = api.list_messages("t").await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].text_content(), "hello");
        assert_eq!(messages[1].text_content(), "meow");
    }

    #[tokio::test]
    async fn streams_scripted_items_in_order() {
        let api = MockAssistantApi::new().with_stream_items(vec![
            MockStreamItem::Event(RunStreamEvent::text_delta("a")),
            MockStreamItem::Error(AssistantError::network("reset")),
        ]);

        let items: Vec<_> = api.stream_run("t", "a").await.unwrap().collect().await;
        assert_eq!(items.len(), 2);
        assert!(matches!(items[0], Ok(RunStreamEvent::TextDelta { .. })));
        assert!(matches!(items[1], Err(AssistantError::Network(_))));
    }
}

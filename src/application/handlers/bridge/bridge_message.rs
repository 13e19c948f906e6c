//! BridgeHandler - Forward one user message to a fresh upstream assistant and
//! wait for its answer.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use thiserror::Error;
use tokio::time::{sleep, timeout};
use tracing::Instrument;
use uuid::Uuid;

use crate::domain::bridge::{
    concat_assistant_text, AccumulatorError, ConversationRequest, EndpointProfile, GuardOutcome,
    ResponseAccumulator, ResponseStrategy, RunStatus,
};
use crate::domain::foundation::StateMachine;
use crate::ports::{AssistantApi, AssistantError, AssistantSpec};

/// Tunables shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeSettings {
    /// Model used when a profile does not name one.
    pub default_model: String,
    /// Pause between run status checks.
    pub poll_interval: Duration,
    /// Upper bound on waiting for a run, by either strategy.
    pub run_deadline: Duration,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            default_model: "gpt-4o".to_string(),
            poll_interval: Duration::from_secs(1),
            run_deadline: Duration::from_secs(120),
        }
    }
}

/// Result of a bridge call that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeOutcome {
    /// The assistant's concatenated text.
    Answered(String),
    /// The input guard refused the text; carries the instruction to return.
    Rejected(String),
}

impl BridgeOutcome {
    /// Text to put in the `response` field.
    pub fn into_text(self) -> String {
        match self {
            BridgeOutcome::Answered(text) | BridgeOutcome::Rejected(text) => text,
        }
    }
}

/// Error type for bridge calls.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("upstream call failed: {0}")]
    Upstream(#[from] AssistantError),

    #[error("run ended with status {status}: {reason}")]
    RunEnded { status: RunStatus, reason: String },

    #[error("deadline exceeded after {after:?} waiting for the run")]
    DeadlineExceeded { after: Duration },

    #[error("run failed: {0}")]
    StreamFailed(String),

    #[error("stream closed before the run ended")]
    StreamClosedEarly,

    #[error(transparent)]
    Accumulator(AccumulatorError),
}

impl From<AccumulatorError> for BridgeError {
    fn from(err: AccumulatorError) -> Self {
        match err {
            AccumulatorError::RunFailed { reason } => BridgeError::StreamFailed(reason),
            AccumulatorError::NotEnded => BridgeError::StreamClosedEarly,
            other => BridgeError::Accumulator(other),
        }
    }
}

/// Handler bridging one HTTP request to one upstream run.
///
/// Every call creates a new assistant and a new thread; nothing is cached.
pub struct BridgeHandler<A: ?Sized + AssistantApi = dyn AssistantApi> {
    api: Arc<A>,
    settings: BridgeSettings,
}

impl<A: ?Sized + AssistantApi> Clone for BridgeHandler<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            settings: self.settings.clone(),
        }
    }
}

impl<A: ?Sized + AssistantApi> BridgeHandler<A> {
    pub fn new(api: Arc<A>, settings: BridgeSettings) -> Self {
        Self { api, settings }
    }

    pub async fn handle(
        &self,
        profile: &EndpointProfile,
        request: ConversationRequest,
    ) -> Result<BridgeOutcome, BridgeError> {
        let span = tracing::info_span!(
            "bridge",
            endpoint = %profile.name,
            request_id = %Uuid::new_v4(),
        );
        self.handle_inner(profile, request).instrument(span).await
    }

    async fn handle_inner(
        &self,
        profile: &EndpointProfile,
        request: ConversationRequest,
    ) -> Result<BridgeOutcome, BridgeError> {
        // 1. Guard
        if let GuardOutcome::Reject(instruction) = profile.guard.check(request.text()) {
            tracing::info!("input rejected by guard");
            return Ok(BridgeOutcome::Rejected(instruction));
        }

        // 2. Fresh assistant and thread for this request
        let spec = AssistantSpec::new(
            profile.assistant_name.as_str(),
            profile.instructions.as_str(),
            profile.model_or(&self.settings.default_model),
        )
        .with_tools(profile.tools.clone());
        let assistant = self.api.create_assistant(spec).await?;
        let thread = self.api.create_thread().await?;
        tracing::debug!(assistant_id = %assistant.id, thread_id = %thread.id, "created upstream resources");

        // 3. Submit the user's text
        self.api.create_message(&thread.id, request.text()).await?;

        // 4. Wait for the run
        let text = match profile.strategy {
            ResponseStrategy::Poll => self.await_by_polling(&thread.id, &assistant.id).await?,
            ResponseStrategy::Stream => self.await_by_streaming(&thread.id, &assistant.id).await?,
        };

        tracing::info!(chars = text.chars().count(), "assistant answered");
        Ok(BridgeOutcome::Answered(text))
    }

    /// Starts a run and re-fetches it until it completes, then lists the
    /// thread's assistant messages.
    async fn await_by_polling(&self, thread_id: &str, assistant_id: &str) -> Result<String, BridgeError> {
        self.within_deadline(self.poll_until_complete(thread_id, assistant_id))
            .await??;

        let messages = self.api.list_messages(thread_id).await?;
        Ok(concat_assistant_text(&messages))
    }

    async fn poll_until_complete(&self, thread_id: &str, assistant_id: &str) -> Result<(), BridgeError> {
        let mut run = self.api.create_run(thread_id, assistant_id).await?;
        let mut attempts: u32 = 0;

        loop {
            tracing::debug!(run_id = %run.id, status = %run.status, attempts, "run status");

            if run.status.is_success() {
                return Ok(());
            }
            // Tool outputs are never submitted, so requires_action can't progress.
            if run.status.is_terminal() || run.status == RunStatus::RequiresAction {
                return Err(BridgeError::RunEnded {
                    status: run.status,
                    reason: run.last_error.unwrap_or_else(|| "no error reported".to_string()),
                });
            }

            sleep(self.settings.poll_interval).await;
            attempts += 1;
            run = self.api.retrieve_run(thread_id, &run.id).await?;
        }
    }

    /// Starts a streaming run and folds its events.
    async fn await_by_streaming(&self, thread_id: &str, assistant_id: &str) -> Result<String, BridgeError> {
        self.within_deadline(self.fold_stream(thread_id, assistant_id))
            .await?
    }

    async fn fold_stream(&self, thread_id: &str, assistant_id: &str) -> Result<String, BridgeError> {
        let mut events = self.api.stream_run(thread_id, assistant_id).await?;
        let mut accumulator = ResponseAccumulator::new();

        while let Some(event) = events.next().await {
            let event = event?;
            tracing::trace!(event = event.kind(), "stream event");
            if accumulator.apply(event)?.is_terminal() {
                break;
            }
        }

        Ok(accumulator.finish()?)
    }

    async fn within_deadline<T>(
        &self,
        fut: impl std::future::Future<Output = T>,
    ) -> Result<T, BridgeError> {
        let deadline = self.settings.run_deadline;
        timeout(deadline, fut).await.map_err(|_| {
            tracing::warn!(deadline = ?deadline, "run deadline exceeded");
            BridgeError::DeadlineExceeded { after: deadline }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::assistant::{MockAssistantApi, MockStage, MockStreamItem};
    use crate::domain::bridge::{
        AssistantTool, CodeInterpreterDelta, CodeOutput, InputField, MessageRole, RunStreamEvent,
        ThreadMessage, ToolCallKind,
    };

    fn fast_settings() -> BridgeSettings {
        BridgeSettings {
            poll_interval: Duration::from_millis(1),
            run_deadline: Duration::from_millis(200),
            ..Default::default()
        }
    }

    fn handler_with(api: &MockAssistantApi, settings: BridgeSettings) -> BridgeHandler {
        let api: Arc<dyn AssistantApi> = Arc::new(api.clone());
        BridgeHandler::new(api, settings)
    }

    fn handler(api: &MockAssistantApi) -> BridgeHandler {
        handler_with(api, fast_settings())
    }

    fn message(text: &str) -> ConversationRequest {
        ConversationRequest::new(InputField::Message, Some(text.to_string())).unwrap()
    }

    #[tokio::test]
    async fn poll_strategy_concatenates_assistant_messages() {
        let api = MockAssistantApi::new()
            .with_statuses(vec![RunStatus::Queued, RunStatus::InProgress, RunStatus::Completed])
            .with_replies(vec![
                ThreadMessage::text("m1", MessageRole::Assistant, "안녕"),
                ThreadMessage::text("m2", MessageRole::Assistant, "하세요 냥"),
            ]);

        let outcome = handler(&api)
            .handle(&EndpointProfile::cat(), message("hello"))
            .await
            .unwrap();

        assert_eq!(outcome, BridgeOutcome::Answered("안녕하세요 냥".to_string()));
        assert_eq!(api.call_count(MockStage::RetrieveRun), 3);
        assert_eq!(api.call_count(MockStage::ListMessages), 1);
        assert_eq!(api.user_messages(), vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn creates_assistant_from_profile() {
        let api = MockAssistantApi::new()
            .with_stream_events(vec![RunStreamEvent::text_delta("x = 2"), RunStreamEvent::End]);
        let request =
            ConversationRequest::new(InputField::Equation, Some("Solve: x + 1 = 3".into())).unwrap();

        handler(&api)
            .handle(&EndpointProfile::solve_equation(), request)
            .await
            .unwrap();

        let created = api.created_assistants();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].name, "Math Tutor");
        assert_eq!(created[0].model, "gpt-4o");
        assert_eq!(created[0].tools, vec![AssistantTool::CodeInterpreter]);
    }

    #[tokio::test]
    async fn stream_strategy_folds_text_code_and_logs() {
        let api = MockAssistantApi::new().with_stream_events(vec![
            RunStreamEvent::text_created(""),
            RunStreamEvent::text_delta("Checking: "),
            RunStreamEvent::ToolCallCreated {
                kind: ToolCallKind::CodeInterpreter,
            },
            RunStreamEvent::ToolCallDelta(
                CodeInterpreterDelta::input("print(3-1)").with_output(CodeOutput::Logs("2".into())),
            ),
            RunStreamEvent::text_delta(" so x = 2"),
            RunStreamEvent::End,
        ]);

        let outcome = handler(&api)
            .handle(&EndpointProfile::get_response(), message("what is x"))
            .await
            .unwrap();

        assert_eq!(
            outcome.into_text(),
            "Checking: print(3-1)2 so x = 2".to_string()
        );
        assert_eq!(api.call_count(MockStage::CreateRun), 0);
        assert_eq!(api.call_count(MockStage::StreamRun), 1);
    }

    #[tokio::test]
    async fn guard_rejection_skips_upstream() {
        let api = MockAssistantApi::new();
        let request =
            ConversationRequest::new(InputField::Equation, Some("what is 2 + 2".into())).unwrap();

        let outcome = handler(&api)
            .handle(&EndpointProfile::solve_equation(), request)
            .await
            .unwrap();

        assert!(matches!(outcome, BridgeOutcome::Rejected(_)));
        assert_eq!(api.total_calls(), 0);
    }

    #[tokio::test]
    async fn never_completing_run_hits_deadline() {
        let api = MockAssistantApi::new().never_completes();
        let settings = BridgeSettings {
            poll_interval: Duration::from_millis(5),
            run_deadline: Duration::from_millis(40),
            ..Default::default()
        };

        let err = handler_with(&api, settings)
            .handle(&EndpointProfile::cat(), message("hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, BridgeError::DeadlineExceeded { .. }));
        assert!(api.call_count(MockStage::RetrieveRun) >= 1);
        assert_eq!(api.call_count(MockStage::ListMessages), 0);
    }

    #[tokio::test]
    async fn slow_stream_hits_deadline() {
        let api = MockAssistantApi::new()
            .with_stream_events(vec![RunStreamEvent::text_delta("late"), RunStreamEvent::End])
            .with_delay(Duration::from_millis(100));
        let settings = BridgeSettings {
            run_deadline: Duration::from_millis(30),
            ..fast_settings()
        };

        let err = handler_with(&api, settings)
            .handle(&EndpointProfile::get_response(), message("hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, BridgeError::DeadlineExceeded { after } if after == Duration::from_millis(30)));
        assert_eq!(api.call_count(MockStage::StreamRun), 1);
    }

    #[tokio::test]
    async fn failed_run_stops_polling() {
        let api = MockAssistantApi::new().with_statuses(vec![RunStatus::InProgress, RunStatus::Failed]);

        let err = handler(&api)
            .handle(&EndpointProfile::negative(), message("hello"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BridgeError::RunEnded {
                status: RunStatus::Failed,
                ..
            }
        ));
        assert_eq!(api.call_count(MockStage::RetrieveRun), 2);
    }

    #[tokio::test]
    async fn upstream_failure_aborts_without_later_calls() {
        let api = MockAssistantApi::new()
            .with_failure(MockStage::CreateThread, AssistantError::AuthenticationFailed);

        let err = handler(&api)
            .handle(&EndpointProfile::cat(), message("hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, BridgeError::Upstream(AssistantError::AuthenticationFailed)));
        assert_eq!(api.call_count(MockStage::CreateMessage), 0);
        assert_eq!(api.call_count(MockStage::CreateRun), 0);
    }

    #[tokio::test]
    async fn stream_failure_event_is_an_error() {
        let api = MockAssistantApi::new().with_stream_events(vec![
            RunStreamEvent::text_delta("partial"),
            RunStreamEvent::failed("rate_limit_exceeded"),
        ]);

        let err = handler(&api)
            .handle(&EndpointProfile::get_response(), message("hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, BridgeError::StreamFailed(ref reason) if reason == "rate_limit_exceeded"));
        assert_eq!(err.to_string(), "run failed: rate_limit_exceeded");
    }

    #[tokio::test]
    async fn stream_transport_error_is_upstream_error() {
        let api = MockAssistantApi::new().with_stream_items(vec![
            MockStreamItem::Event(RunStreamEvent::text_delta("partial")),
            MockStreamItem::Error(AssistantError::network("connection reset")),
        ]);

        let err = handler(&api)
            .handle(&EndpointProfile::get_response(), message("hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, BridgeError::Upstream(AssistantError::Network(_))));
    }

    #[tokio::test]
    async fn stream_closing_early_is_an_error() {
        let api = MockAssistantApi::new().with_stream_events(vec![RunStreamEvent::text_delta("half")]);

        let err = handler(&api)
            .handle(&EndpointProfile::get_response(), message("hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, BridgeError::StreamClosedEarly));
    }

    #[tokio::test]
    async fn identical_requests_create_independent_resources() {
        let api = MockAssistantApi::new();
        let handler = handler(&api);

        for _ in 0..2 {
            handler
                .handle(&EndpointProfile::cat(), message("same"))
                .await
                .unwrap();
        }

        assert_eq!(api.call_count(MockStage::CreateAssistant), 2);
        assert_eq!(api.call_count(MockStage::CreateThread), 2);
        assert_eq!(api.call_count(MockStage::CreateRun), 2);
    }

    #[test]
    fn deadline_error_displays_duration() {
        let err = BridgeError::DeadlineExceeded {
            after: Duration::from_secs(120),
        };
        assert_eq!(err.to_string(), "deadline exceeded after 120s waiting for the run");

        let err = BridgeError::DeadlineExceeded {
            after: Duration::from_millis(50),
        };
        assert_eq!(err.to_string(), "deadline exceeded after 50ms waiting for the run");
    }
}

//! OpenAI Assistants client - Implementation of AssistantApi for OpenAI's
//! Assistants v2 API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIConfig::new(api_key)
//!     .with_base_url("https://api.openai.com/v1")
//!     .with_timeout(Duration::from_secs(60));
//!
//! let client = OpenAIAssistantsClient::new(config)?;
//! ```
//!
//! # Streaming
//!
//! Streaming runs use Server-Sent Events. Each frame is decoded with
//! [`SseDecoder`] and mapped to a [`RunStreamEvent`]; unknown event types are
//! skipped and the `[DONE]` sentinel produces nothing.

use async_trait::async_trait;
use futures::future;
use futures::stream::{self, StreamExt};
use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::sse::{SseDecoder, SseFrame};
use crate::domain::bridge::{
    AssistantTool, CodeInterpreterDelta, CodeOutput, MessageContent, MessageRole, RunStatus,
    RunStreamEvent, ThreadMessage, ToolCallKind,
};
use crate::ports::{
    AssistantApi, AssistantError, AssistantRef, AssistantSpec, RunEventStream, RunRef, ThreadRef,
};

/// Page size used when listing thread messages.
const MESSAGE_PAGE_LIMIT: u32 = 100;

/// Configuration for the OpenAI assistants client.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Timeout for individual non-streaming requests.
    pub timeout: Duration,
    /// Timeout for establishing connections.
    pub connect_timeout: Duration,
}

impl OpenAIConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI Assistants API client.
pub struct OpenAIAssistantsClient {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIAssistantsClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self, AssistantError> {
        // No client-wide timeout: it would also cut off long streaming bodies.
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| AssistantError::network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Builds an authenticated request against the assistants API.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("OpenAI-Beta", "assistants=v2")
    }

    /// Sends a request and maps transport failures.
    async fn send(&self, builder: RequestBuilder) -> Result<Response, AssistantError> {
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                AssistantError::Timeout {
                    timeout_secs: self.config.timeout.as_secs() as u32,
                }
            } else if e.is_connect() {
                AssistantError::network(format!("Connection failed: {}", e))
            } else {
                AssistantError::network(e.to_string())
            }
        })?;

        Self::handle_response_status(response).await
    }

    /// Parses the API response status and handles errors.
    async fn handle_response_status(response: Response) -> Result<Response, AssistantError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => Err(AssistantError::AuthenticationFailed),
            404 => Err(AssistantError::NotFound(Self::error_message(&error_body))),
            429 => Err(AssistantError::rate_limited(Self::parse_retry_after(&error_body))),
            400 | 422 => Err(AssistantError::InvalidRequest(Self::error_message(&error_body))),
            500..=599 => Err(AssistantError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(AssistantError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    /// Extracts `error.message` from an error body, or returns it whole.
    fn error_message(error_body: &str) -> String {
        serde_json::from_str::<ApiErrorBody>(error_body)
            .ok()
            .and_then(|body| body.error.message)
            .unwrap_or_else(|| error_body.to_string())
    }

    /// Parses retry-after from error response.
    fn parse_retry_after(error_body: &str) -> u32 {
        let message = Self::error_message(error_body);
        if let Some(idx) = message.find("try again in ") {
            let rest = &message[idx + 13..];
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            if let Ok(secs) = digits.parse::<u32>() {
                return secs;
            }
        }
        30
    }

    async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, AssistantError> {
        response
            .json()
            .await
            .map_err(|e| AssistantError::parse(format!("Failed to parse response: {}", e)))
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, AssistantError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self
            .request(Method::POST, path)
            .timeout(self.config.timeout)
            .json(body);
        let response = self.send(builder).await?;
        Self::parse_json(response).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AssistantError> {
        let builder = self
            .request(Method::GET, path)
            .timeout(self.config.timeout)
            .query(query);
        let response = self.send(builder).await?;
        Self::parse_json(response).await
    }
}

#[async_trait]
impl AssistantApi for OpenAIAssistantsClient {
    async fn create_assistant(&self, spec: AssistantSpec) -> Result<AssistantRef, AssistantError> {
        let body = CreateAssistantBody {
            name: &spec.name,
            instructions: &spec.instructions,
            model: &spec.model,
            tools: &spec.tools,
        };
        let object: IdObject = self.post_json("/assistants", &body).await?;
        Ok(AssistantRef { id: object.id })
    }

    async fn create_thread(&self) -> Result<ThreadRef, AssistantError> {
        let object: IdObject = self.post_json("/threads", &serde_json::json!({})).await?;
        Ok(ThreadRef { id: object.id })
    }

    async fn create_message(&self, thread_id: &str, content: &str) -> Result<(), AssistantError> {
        let body = CreateMessageBody {
            role: MessageRole::User,
            content,
        };
        let _: IdObject = self
            .post_json(&format!("/threads/{}/messages", thread_id), &body)
            .await?;
        Ok(())
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<RunRef, AssistantError> {
        let body = CreateRunBody {
            assistant_id,
            stream: None,
        };
        let run: RunObject = self
            .post_json(&format!("/threads/{}/runs", thread_id), &body)
            .await?;
        Ok(run.into())
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<RunRef, AssistantError> {
        let run: RunObject = self
            .get_json(&format!("/threads/{}/runs/{}", thread_id, run_id), &[])
            .await?;
        Ok(run.into())
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, AssistantError> {
        let path = format!("/threads/{}/messages", thread_id);
        let mut messages = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let query = message_page_query(after.as_deref());
            let page: MessageList = self.get_json(&path, &query).await?;
            messages.extend(page.data.into_iter().map(ThreadMessage::from));

            match (page.has_more, page.last_id) {
                (true, Some(last_id)) => after = Some(last_id),
                _ => break,
            }
        }

        Ok(messages)
    }

    async fn stream_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
    ) -> Result<RunEventStream, AssistantError> {
        let body = CreateRunBody {
            assistant_id,
            stream: Some(true),
        };
        let builder = self
            .request(Method::POST, &format!("/threads/{}/runs", thread_id))
            .json(&body);
        let response = self.send(builder).await?;

        let stream = response
            .bytes_stream()
            .scan(SseDecoder::new(), |decoder, chunk| {
                let events: Vec<Result<RunStreamEvent, AssistantError>> = match chunk {
                    Ok(bytes) => decoder
                        .push(&bytes)
                        .into_iter()
                        .flat_map(map_frame)
                        .collect(),
                    Err(e) => vec![Err(AssistantError::network(format!("Stream error: {}", e)))],
                };
                future::ready(Some(events))
            })
            .flat_map(stream::iter);

        Ok(Box::pin(stream))
    }
}

/// Maps one SSE frame to zero or more run events.
fn map_frame(frame: SseFrame) -> Vec<Result<RunStreamEvent, AssistantError>> {
    if frame.data == "[DONE]" {
        return Vec::new();
    }

    let Some(event) = frame.event.as_deref() else {
        return Vec::new();
    };

    match event {
        "thread.message.created" => parse_frame::<MessageObject>(event, &frame.data, |message| {
            vec![RunStreamEvent::text_created(
                ThreadMessage::from(message).text_content(),
            )]
        }),
        "thread.message.delta" => parse_frame::<MessageDeltaObject>(event, &frame.data, |delta| {
            delta
                .delta
                .content
                .into_iter()
                .filter_map(|part| part.text.and_then(|t| t.value))
                .map(RunStreamEvent::text_delta)
                .collect()
        }),
        "thread.run.step.created" => parse_frame::<RunStepObject>(event, &frame.data, |step| {
            step.step_details
                .tool_calls
                .into_iter()
                .map(|call| RunStreamEvent::ToolCallCreated {
                    kind: call.kind(),
                })
                .collect()
        }),
        "thread.run.step.delta" => parse_frame::<RunStepDeltaObject>(event, &frame.data, |step| {
            step.delta
                .step_details
                .map(|details| details.tool_calls)
                .unwrap_or_default()
                .into_iter()
                .filter_map(|call| call.code_interpreter)
                .map(|code| RunStreamEvent::ToolCallDelta(code.into()))
                .collect()
        }),
        "thread.run.completed" => vec![Ok(RunStreamEvent::End)],
        "thread.run.failed" => parse_frame::<RunObject>(event, &frame.data, |run| {
            let reason = run
                .last_error
                .and_then(|e| e.message)
                .unwrap_or_else(|| "run failed".to_string());
            vec![RunStreamEvent::failed(reason)]
        }),
        "thread.run.cancelled" | "thread.run.expired" | "thread.run.incomplete" => {
            let status = event.trim_start_matches("thread.run.");
            vec![Ok(RunStreamEvent::failed(format!("run {}", status)))]
        }
        "thread.run.requires_action" => vec![Ok(RunStreamEvent::failed(
            "run requires action, which this bridge does not support",
        ))],
        "error" => {
            let message = OpenAIAssistantsClient::error_message(&frame.data);
            vec![Err(AssistantError::unavailable(message))]
        }
        _ => Vec::new(),
    }
}

fn parse_frame<T: DeserializeOwned>(
    event: &str,
    data: &str,
    map: impl FnOnce(T) -> Vec<RunStreamEvent>,
) -> Vec<Result<RunStreamEvent, AssistantError>> {
    match serde_json::from_str::<T>(data) {
        Ok(value) => map(value).into_iter().map(Ok).collect(),
        Err(e) => vec![Err(AssistantError::parse(format!(
            "Failed to parse `{}` event: {}",
            event, e
        )))],
    }
}

// ----- OpenAI API Types -----

#[derive(Debug, Serialize)]
struct CreateAssistantBody<'a> {
    name: &'a str,
    instructions: &'a str,
    model: &'a str,
    tools: &'a [AssistantTool],
}

#[derive(Debug, Serialize)]
struct CreateMessageBody<'a> {
    role: MessageRole,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateRunBody<'a> {
    assistant_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct IdObject {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RunObject {
    id: String,
    status: RunStatus,
    last_error: Option<ApiErrorDetail>,
}

impl From<RunObject> for RunRef {
    fn from(run: RunObject) -> Self {
        RunRef {
            id: run.id,
            status: run.status,
            last_error: run.last_error.and_then(|e| e.message),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessageList {
    data: Vec<MessageObject>,
    #[serde(default)]
    has_more: bool,
    last_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageObject {
    id: String,
    role: MessageRole,
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    kind: String,
    text: Option<TextPart>,
}

#[derive(Debug, Deserialize)]
struct TextPart {
    value: Option<String>,
}

impl From<MessageObject> for ThreadMessage {
    fn from(message: MessageObject) -> Self {
        let content = message
            .content
            .into_iter()
            .map(|part| match (part.kind.as_str(), part.text.and_then(|t| t.value)) {
                ("text", Some(value)) => MessageContent::Text(value),
                _ => MessageContent::Other { kind: part.kind },
            })
            .collect();

        ThreadMessage {
            id: message.id,
            role: message.role,
            content,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessageDeltaObject {
    delta: MessageDelta,
}

#[derive(Debug, Deserialize)]
struct MessageDelta {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct RunStepObject {
    step_details: StepDetails,
}

#[derive(Debug, Deserialize)]
struct StepDetails {
    #[serde(default)]
    tool_calls: Vec<ToolCallObject>,
}

#[derive(Debug, Deserialize)]
struct ToolCallObject {
    #[serde(rename = "type")]
    kind: String,
    function: Option<FunctionObject>,
    code_interpreter: Option<CodeInterpreterObject>,
}

impl ToolCallObject {
    fn kind(&self) -> ToolCallKind {
        match self.kind.as_str() {
            "code_interpreter" => ToolCallKind::CodeInterpreter,
            "file_search" => ToolCallKind::FileSearch,
            "function" => ToolCallKind::Function {
                name: self
                    .function
                    .as_ref()
                    .and_then(|f| f.name.clone())
                    .unwrap_or_default(),
            },
            other => ToolCallKind::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FunctionObject {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CodeInterpreterObject {
    input: Option<String>,
    #[serde(default)]
    outputs: Vec<CodeOutputObject>,
}

#[derive(Debug, Deserialize)]
struct CodeOutputObject {
    #[serde(rename = "type")]
    kind: String,
    logs: Option<String>,
    image: Option<ImageObject>,
}

#[derive(Debug, Deserialize)]
struct ImageObject {
    file_id: String,
}

impl From<CodeInterpreterObject> for CodeInterpreterDelta {
    fn from(code: CodeInterpreterObject) -> Self {
        let outputs = code
            .outputs
            .into_iter()
            .filter_map(|output| match (output.kind.as_str(), output.logs, output.image) {
                ("logs", Some(logs), _) => Some(CodeOutput::Logs(logs)),
                ("image", _, Some(image)) => Some(CodeOutput::Image {
                    file_id: image.file_id,
                }),
                _ => None,
            })
            .collect();

        CodeInterpreterDelta {
            input: code.input,
            outputs,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RunStepDeltaObject {
    delta: RunStepDelta,
}

#[derive(Debug, Deserialize)]
struct RunStepDelta {
    step_details: Option<StepDetails>,
}

/// Query for one page of a thread's messages, oldest first.
fn message_page_query(after: Option<&str>) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("order", "asc".to_string()),
        ("limit", MESSAGE_PAGE_LIMIT.to_string()),
    ];
    if let Some(cursor) = after {
        query.push(("after", cursor.to_string()));
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(event: &str, data: &str) -> SseFrame {
        SseFrame {
            event: Some(event.to_string()),
            data: data.to_string(),
        }
    }

    fn ok_events(results: Vec<Result<RunStreamEvent, AssistantError>>) -> Vec<RunStreamEvent> {
        results.into_iter().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn config_builder_works() {
        let config = OpenAIConfig::new("test-key")
            .with_base_url("https://custom.api.com/v1/")
            .with_timeout(Duration::from_secs(30));

        assert_eq!(config.base_url, "https://custom.api.com/v1");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn client_builds_urls_from_base() {
        let client =
            OpenAIAssistantsClient::new(OpenAIConfig::new("k").with_base_url("http://localhost:9"))
                .unwrap();
        assert_eq!(client.url("/threads"), "http://localhost:9/threads");
    }

    #[test]
    fn message_pages_are_listed_oldest_first() {
        let first = message_page_query(None);
        assert_eq!(first[0], ("order", "asc".to_string()));
        assert!(first.iter().all(|(key, _)| *key != "after"));

        let next = message_page_query(Some("msg_9"));
        assert_eq!(next.last(), Some(&("after", "msg_9".to_string())));
    }

    #[test]
    fn create_assistant_body_matches_wire_format() {
        let tools = [AssistantTool::CodeInterpreter];
        let body = CreateAssistantBody {
            name: "Math Tutor",
            instructions: "Solve it",
            model: "gpt-4o",
            tools: &tools,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Math Tutor",
                "instructions": "Solve it",
                "model": "gpt-4o",
                "tools": [{"type": "code_interpreter"}]
            })
        );
    }

    #[test]
    fn create_run_body_omits_stream_when_polling() {
        let body = CreateRunBody {
            assistant_id: "asst_1",
            stream: None,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"assistant_id":"asst_1"}"#
        );
    }

    #[test]
    fn run_object_maps_status_and_error() {
        let run: RunObject = serde_json::from_str(
            r#"{"id":"run_1","status":"failed","last_error":{"code":"server_error","message":"boom"}}"#,
        )
        .unwrap();
        let run: RunRef = run.into();
        assert_eq!(run.status, RunStatus::Failed);
        assert_eq!(run.last_error.as_deref(), Some("boom"));
    }

    #[test]
    fn message_object_keeps_only_text_parts_as_text() {
        let message: MessageObject = serde_json::from_str(
            r#"{"id":"msg_1","role":"assistant","content":[
                {"type":"text","text":{"value":"x = 2","annotations":[]}},
                {"type":"image_file","image_file":{"file_id":"file-1"}}
            ]}"#,
        )
        .unwrap();
        let message = ThreadMessage::from(message);
        assert_eq!(message.role, MessageRole::Assistant);
        assert_eq!(message.text_content(), "x = 2");
        assert_eq!(message.content.len(), 2);
    }

    #[test]
    fn maps_message_delta_to_text_deltas() {
        let events = ok_events(map_frame(frame(
            "thread.message.delta",
            r#"{"id":"msg_1","delta":{"content":[{"index":0,"type":"text","text":{"value":"Hel"}}]}}"#,
        )));
        assert_eq!(events, vec![RunStreamEvent::text_delta("Hel")]);
    }

    #[test]
    fn maps_message_created_to_text_created() {
        let events = ok_events(map_frame(frame(
            "thread.message.created",
            r#"{"id":"msg_1","role":"assistant","content":[]}"#,
        )));
        assert_eq!(events, vec![RunStreamEvent::text_created("")]);
    }

    #[test]
    fn maps_step_created_to_tool_call_created() {
        let events = ok_events(map_frame(frame(
            "thread.run.step.created",
            r#"{"id":"step_1","step_details":{"type":"tool_calls","tool_calls":[{"id":"call_1","type":"code_interpreter","code_interpreter":{"input":"","outputs":[]}}]}}"#,
        )));
        assert_eq!(
            events,
            vec![RunStreamEvent::ToolCallCreated {
                kind: ToolCallKind::CodeInterpreter
            }]
        );
    }

    #[test]
    fn message_creation_step_has_no_tool_calls() {
        let events = map_frame(frame(
            "thread.run.step.created",
            r#"{"id":"step_1","step_details":{"type":"message_creation","message_creation":{"message_id":"msg_1"}}}"#,
        ));
        assert!(events.is_empty());
    }

    #[test]
    fn maps_step_delta_to_code_and_logs() {
        let events = ok_events(map_frame(frame(
            "thread.run.step.delta",
            r#"{"id":"step_1","delta":{"step_details":{"type":"tool_calls","tool_calls":[
                {"index":0,"type":"code_interpreter","code_interpreter":{"input":"print(2)","outputs":[
                    {"index":0,"type":"logs","logs":"2\n"},
                    {"index":1,"type":"image","image":{"file_id":"file-9"}}
                ]}}
            ]}}}"#,
        )));
        assert_eq!(
            events,
            vec![RunStreamEvent::ToolCallDelta(
                CodeInterpreterDelta::input("print(2)")
                    .with_output(CodeOutput::Logs("2\n".into()))
                    .with_output(CodeOutput::Image {
                        file_id: "file-9".into()
                    })
            )]
        );
    }

    #[test]
    fn maps_run_terminal_events() {
        assert_eq!(
            ok_events(map_frame(frame("thread.run.completed", r#"{"id":"run_1"}"#))),
            vec![RunStreamEvent::End]
        );
        assert_eq!(
            ok_events(map_frame(frame(
                "thread.run.failed",
                r#"{"id":"run_1","status":"failed","last_error":{"message":"quota"}}"#
            ))),
            vec![RunStreamEvent::failed("quota")]
        );
        assert_eq!(
            ok_events(map_frame(frame("thread.run.expired", r#"{"id":"run_1"}"#))),
            vec![RunStreamEvent::failed("run expired")]
        );
    }

    #[test]
    fn done_sentinel_and_unknown_events_produce_nothing() {
        assert!(map_frame(frame("done", "[DONE]")).is_empty());
        assert!(map_frame(frame("thread.run.queued", r#"{"id":"run_1"}"#)).is_empty());
    }

    #[test]
    fn error_event_becomes_unavailable() {
        let results = map_frame(frame("error", r#"{"error":{"message":"overloaded"}}"#));
        assert!(matches!(
            results.as_slice(),
            [Err(AssistantError::Unavailable { message })] if message == "overloaded"
        ));
    }

    #[test]
    fn malformed_payload_is_a_parse_error() {
        let results = map_frame(frame("thread.message.delta", "{not json"));
        assert!(matches!(results.as_slice(), [Err(AssistantError::Parse(_))]));
    }

    #[test]
    fn parse_retry_after_from_message() {
        let error = r#"{"error":{"message":"Rate limit reached. Please try again in 20s."}}"#;
        assert_eq!(OpenAIAssistantsClient::parse_retry_after(error), 20);
    }

    #[test]
    fn parse_retry_after_default() {
        let error = r#"{"error":{"message":"Something went wrong"}}"#;
        assert_eq!(OpenAIAssistantsClient::parse_retry_after(error), 30);
    }

    #[test]
    fn error_message_falls_back_to_body() {
        assert_eq!(OpenAIAssistantsClient::error_message("plain text"), "plain text");
    }
}

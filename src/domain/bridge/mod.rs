//! Bridge domain: the request/response contract between an HTTP caller and an
//! upstream assistant run.

mod accumulator;
mod guard;
mod message;
mod profile;
mod request;
mod run_status;
mod stream_event;

pub use accumulator::{AccumulatorError, ResponseAccumulator, StreamState, OBJECT_ARTIFACT};
pub use guard::{GuardOutcome, InputGuard};
pub use message::{concat_assistant_text, MessageContent, MessageRole, ThreadMessage};
pub use profile::{
    AssistantTool, CatalogError, EndpointCatalog, EndpointProfile, ResponseStrategy,
    DEFAULT_CORS_ORIGINS,
};
pub use request::{ConversationRequest, InputField, RequestError};
pub use run_status::RunStatus;
pub use stream_event::{CodeInterpreterDelta, CodeOutput, RunStreamEvent, ToolCallKind};

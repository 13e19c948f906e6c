//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the bridge and the outside world. Adapters implement these ports.
//!
//! - `AssistantApi` - the hosted assistants service the bridge forwards to

mod assistant_api;

pub use assistant_api::{
    AssistantApi, AssistantError, AssistantRef, AssistantSpec, RunEventStream, RunRef, ThreadRef,
};

//! Bridge HTTP adapter - one POST endpoint per endpoint profile.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{BridgeRequest, BridgeResponse, ErrorResponse};
pub use handlers::{bridge_message, BridgeApiError, EndpointState};
pub use routes::{bridge_router, with_static_files};

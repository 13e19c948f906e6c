//! HTTP adapters - REST API implementations.

pub mod bridge;
pub mod middleware;

// Re-export key types for convenience
pub use bridge::{bridge_router, with_static_files, EndpointState};

//! Application handlers.
//!
//! Handlers that orchestrate domain operations through the ports.

pub mod bridge;

pub use bridge::{BridgeError, BridgeHandler, BridgeOutcome, BridgeSettings};

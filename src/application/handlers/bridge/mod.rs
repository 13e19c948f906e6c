//! Bridge handlers - answer one request through a fresh upstream run.

mod bridge_message;

pub use bridge_message::{BridgeError, BridgeHandler, BridgeOutcome, BridgeSettings};

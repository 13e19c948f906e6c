//! Domain layer - pure bridge logic with no I/O.
//!
//! - `foundation` - shared building blocks (state machine trait)
//! - `bridge` - endpoint profiles, input guards, run status, stream folding

pub mod bridge;
pub mod foundation;

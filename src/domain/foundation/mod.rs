//! Foundation types shared across the domain.

mod state_machine;

pub use state_machine::{InvalidTransition, StateMachine};

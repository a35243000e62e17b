//! Core state machine types.
//!
//! - State identity via the `State` trait
//! - Immutable history of completed transitions

mod history;
mod state;

pub use history::{StateHistory, StateTransition};
pub use state::State;

//! Transition execution.
//!
//! # Key Concepts
//!
//! - **Transitions**: a trigger moving any of several source states to one destination
//! - **Hooks**: `before`/`after` callbacks on a transition
//! - **State callbacks**: enter/exit handlers registered per state
//! - **State Machine**: validates nothing itself; executes the table the builder checked

mod callbacks;
mod error;
#[allow(clippy::module_inception)]
mod machine;
mod transition;

pub use callbacks::StateCallbacks;
pub use error::{HookError, TransitionError};
pub use machine::{StateMachine, DEFAULT_HISTORY_LIMIT};
pub use transition::{Hook, HookContext, HookPhase, Transition};

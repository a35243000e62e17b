//! Errors raised while executing transitions.

use crate::machine::transition::HookPhase;
use thiserror::Error;

/// Error returned by a hook or state callback.
///
/// Callbacks signal failure by returning this; the machine never swallows it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HookError {
    message: String,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors that can occur during `StateMachine::execute`.
#[derive(Debug, Error)]
pub enum TransitionError {
    /// No transition for this trigger lists the current state among its sources.
    /// The state is unchanged and no callback fired.
    #[error("Cannot trigger '{trigger}' from state '{state}'")]
    InvalidTransition { trigger: String, state: String },

    /// A callback failed part-way through the sequence. `state` is the state
    /// the machine is left in.
    #[error("{phase} hook for '{trigger}' failed (state is now '{state}'): {source}")]
    Hook {
        trigger: String,
        phase: HookPhase,
        state: String,
        #[source]
        source: HookError,
    },
}

impl TransitionError {
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }
}

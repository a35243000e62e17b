//! Builder API for state machine construction.
//!
//! This module provides fluent builders, declarative tables and macros for
//! creating state machines. All table validation happens here, so a machine
//! that builds is guaranteed to be consistent.

pub mod config;
pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use config::{HookRegistry, MachineConfig, Sources, TransitionConfig};
pub use error::{ConfigViolation, ConfigurationError};
pub use machine::StateMachineBuilder;
pub use transition::TransitionBuilder;

use crate::core::State;
use crate::machine::Transition;

/// Create a hook-less transition from one source state.
///
/// # Example
///
/// ```
/// use vam::builder::simple_transition;
/// use vam::machine::Transition;
///
/// let transition: Transition<String, ()> =
///     simple_transition("to_moving", "normal".to_string(), "moving".to_string());
/// assert!(transition.can_execute(&"normal".to_string()));
/// ```
pub fn simple_transition<S, M>(trigger: impl Into<String>, from: S, to: S) -> Transition<S, M>
where
    S: State,
{
    Transition::new(trigger, vec![from], to)
}

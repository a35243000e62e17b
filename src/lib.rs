//! VAM: a declarative modal state machine for Vim-style viewport tools
//!
//! A machine is declared as data: a fixed set of states, transitions naming a
//! trigger, one or more source states and a destination, and callbacks. The
//! table is validated once when the machine is built; afterwards every
//! `(trigger, source)` pair resolves to at most one transition.
//!
//! # Core Concepts
//!
//! - **State**: a named identifier via the `State` trait
//! - **Transitions**: `trigger` moves any of `sources` to `dest`
//! - **Callbacks**: `before` -> exit(old) -> enter(new) -> `after`, strictly in that order
//! - **Session**: the viewport tool's machine plus its mode flags and input routing
//!
//! # Example
//!
//! ```rust
//! use vam::builder::{StateMachineBuilder, TransitionBuilder};
//!
//! let mut machine = StateMachineBuilder::new()
//!     .states(["normal".to_string(), "moving".to_string()])
//!     .initial("normal".to_string())
//!     .transition(
//!         TransitionBuilder::new()
//!             .trigger("to_moving")
//!             .from("normal".to_string())
//!             .to("moving".to_string()),
//!     )
//!     .unwrap()
//!     .build(())
//!     .unwrap();
//!
//! machine.execute("to_moving").unwrap();
//! assert!(machine.is_state("moving"));
//! assert!(machine.execute("to_moving").unwrap_err().is_invalid_transition());
//! ```

pub mod builder;
pub mod core;
pub mod machine;
pub mod tool;

// Re-export commonly used types
pub use builder::{ConfigViolation, ConfigurationError, StateMachineBuilder, TransitionBuilder};
pub use core::{State, StateHistory, StateTransition};
pub use machine::{HookContext, HookError, HookPhase, StateMachine, Transition, TransitionError};
pub use tool::{VamSession, VamState};

//! The viewport tool built on the state machine.
//!
//! A [`VamSession`] wraps one machine in the `normal` / `moving` /
//! `register_picking` table, carries the transform, axis and base-space flags
//! across transitions, maps key presses to commands, and routes pointer and
//! key input to the handler of the current state.

mod command;
mod modes;
mod session;
mod state;

pub use command::{Command, CommandAction, CommandError, KeyBinding, Keymap};
pub use modes::{AxisConstraint, CoordinateBase, ModeFlags, TransformKind};
pub use session::{
    CommandOutcome, InputHandler, KeyDispatch, PointerSample, SessionError, SessionSnapshot,
    VamSession, SNAPSHOT_HISTORY,
};
pub use state::{
    vam_builder, vam_machine, VamContext, VamState, TO_MOVING, TO_NORMAL, TO_REGISTER_PICKING,
};

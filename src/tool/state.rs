//! Tool states, the context they share, and the default transition table.

use crate::builder::{ConfigurationError, StateMachineBuilder, TransitionBuilder};
use crate::machine::{HookContext, HookError, StateMachine};
use crate::state_enum;
use crate::tool::modes::ModeFlags;
use std::collections::BTreeMap;
use tracing::{debug, info};

state_enum! {
    /// Modal states of the viewport tool.
    pub enum VamState {
        /// Selection mode.
        Normal => "normal",
        /// Interactive transform in progress.
        Moving => "moving",
        /// Picking a register.
        RegisterPicking => "register_picking",
    }
}

pub const TO_MOVING: &str = "to_moving";
pub const TO_NORMAL: &str = "to_normal";
pub const TO_REGISTER_PICKING: &str = "to_register_picking";

/// Model owned by the session's state machine.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VamContext {
    pub flags: ModeFlags,
    /// Attribute values captured when a move started, for cancel/reset.
    moving_initial_values: BTreeMap<String, f64>,
}

impl VamContext {
    pub fn new(flags: ModeFlags) -> Self {
        Self {
            flags,
            moving_initial_values: BTreeMap::new(),
        }
    }

    /// Remember `value` as the pre-move value of `attribute`. The first
    /// value recorded for an attribute during a move wins.
    pub fn record_initial_value(&mut self, attribute: impl Into<String>, value: f64) {
        self.moving_initial_values
            .entry(attribute.into())
            .or_insert(value);
    }

    pub fn initial_value(&self, attribute: &str) -> Option<f64> {
        self.moving_initial_values.get(attribute).copied()
    }

    pub fn initial_values(&self) -> &BTreeMap<String, f64> {
        &self.moving_initial_values
    }

    fn clear_initial_values(&mut self) {
        self.moving_initial_values.clear();
    }
}

fn log_enter(_: &mut VamContext, ctx: &HookContext<VamState>) -> Result<(), HookError> {
    info!(state = %ctx.dest, trigger = ctx.trigger.as_str(), "Entered state");
    Ok(())
}

fn log_exit(_: &mut VamContext, ctx: &HookContext<VamState>) -> Result<(), HookError> {
    debug!(state = %ctx.source, "Exiting state");
    Ok(())
}

fn reset_move(context: &mut VamContext, ctx: &HookContext<VamState>) -> Result<(), HookError> {
    context.clear_initial_values();
    debug!(phase = %ctx.phase, "Cleared move start values");
    Ok(())
}

/// Builder preloaded with the tool's table:
///
/// - `to_moving`: normal -> moving
/// - `to_normal`: moving | register_picking -> normal
/// - `to_register_picking`: normal -> register_picking
///
/// Entering and leaving `moving` clears the captured start values.
pub fn vam_builder() -> Result<StateMachineBuilder<VamState, VamContext>, ConfigurationError> {
    let builder = StateMachineBuilder::new()
        .states(VamState::ALL.iter().copied())
        .initial(VamState::Normal)
        .transition(
            TransitionBuilder::new()
                .trigger(TO_MOVING)
                .from(VamState::Normal)
                .to(VamState::Moving)
                .before(|_: &mut VamContext, _: &HookContext<VamState>| {
                    debug!("Preparing to enter moving mode");
                    Ok(())
                }),
        )?
        .transition(
            TransitionBuilder::new()
                .trigger(TO_NORMAL)
                .from(VamState::Moving)
                .from(VamState::RegisterPicking)
                .to(VamState::Normal)
                .before(|_: &mut VamContext, ctx: &HookContext<VamState>| {
                    debug!(from = %ctx.source, "Returning to normal mode");
                    Ok(())
                }),
        )?
        .transition(
            TransitionBuilder::new()
                .trigger(TO_REGISTER_PICKING)
                .from(VamState::Normal)
                .to(VamState::RegisterPicking),
        )?
        .on_enter(VamState::Moving, |context: &mut VamContext, ctx: &HookContext<VamState>| {
            reset_move(context, ctx)?;
            log_enter(context, ctx)
        })
        .on_exit(VamState::Moving, |context: &mut VamContext, ctx: &HookContext<VamState>| {
            log_exit(context, ctx)?;
            reset_move(context, ctx)
        })
        .on_any_enter(log_enter)
        .on_any_exit(log_exit);

    Ok(builder)
}

/// The tool's machine, starting in `normal`.
pub fn vam_machine(context: VamContext) -> Result<StateMachine<VamState, VamContext>, ConfigurationError> {
    vam_builder()?.build(context)
}

//! One tool session: the state machine, its flags, and input routing.
//!
//! The host owns a `VamSession` and calls into it from its UI thread. The
//! session never reads raw input; the host hands it key names and pointer
//! samples and decides when the tool turns on or off.

use crate::builder::ConfigurationError;
use crate::core::{State, StateHistory};
use crate::machine::{StateMachine, TransitionError};
use crate::tool::command::{Command, CommandAction, CommandError, Keymap};
use crate::tool::modes::{AxisConstraint, CoordinateBase, ModeFlags, TransformKind};
use crate::tool::state::{vam_machine, VamContext, VamState, TO_NORMAL};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// A pointer position, in viewport pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
}

/// Per-state input handler. Only the handler registered for the current
/// state receives input.
pub trait InputHandler: Send {
    fn pointer_moved(&mut self, _context: &mut VamContext, _sample: PointerSample) {}

    fn key_pressed(&mut self, _context: &mut VamContext, _key: &str) {}
}

/// Effect of a command that ran.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CommandOutcome {
    Transitioned(VamState),
    FlagsChanged(ModeFlags),
}

/// How a key press was handled.
#[derive(Clone, Debug, PartialEq)]
pub enum KeyDispatch {
    /// The key is bound; these commands ran, rejected transitions skipped.
    Commands(Vec<CommandOutcome>),
    /// Unbound key, passed to the current state's handler.
    Forwarded(VamState),
    /// Unbound key and no handler for the current state.
    Ignored,
}

/// Transitions carried by a snapshot.
pub const SNAPSHOT_HISTORY: usize = 64;

/// Diagnostic view of a session. `history` holds at most the newest
/// [`SNAPSHOT_HISTORY`] transitions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub taken_at: DateTime<Utc>,
    pub active: bool,
    pub state: VamState,
    pub flags: ModeFlags,
    pub history: StateHistory<VamState>,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub struct VamSession {
    id: Uuid,
    machine: StateMachine<VamState, VamContext>,
    keymap: Keymap,
    handlers: HashMap<VamState, Box<dyn InputHandler>>,
    active: bool,
}

impl VamSession {
    /// Session with default flags and the default keymap.
    pub fn new() -> Result<Self, ConfigurationError> {
        Self::with_keymap(Keymap::default())
    }

    pub fn with_keymap(keymap: Keymap) -> Result<Self, ConfigurationError> {
        let machine = vam_machine(VamContext::default())?;
        Ok(Self::from_machine(machine, keymap))
    }

    /// Session around an already built machine. The tool starts inactive.
    pub(crate) fn from_machine(machine: StateMachine<VamState, VamContext>, keymap: Keymap) -> Self {
        let id = Uuid::new_v4();
        debug!(session = %id, "Session created");
        Self {
            id,
            machine,
            keymap,
            handlers: HashMap::new(),
            active: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    /// Register the input handler for `state`, replacing any earlier one.
    pub fn set_handler(&mut self, state: VamState, handler: impl InputHandler + 'static) {
        self.handlers.insert(state, Box::new(handler));
    }

    pub fn current_state(&self) -> VamState {
        *self.machine.current_state()
    }

    pub fn is_state(&self, name: &str) -> bool {
        self.machine.is_state(name)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn machine(&self) -> &StateMachine<VamState, VamContext> {
        &self.machine
    }

    pub fn context(&self) -> &VamContext {
        self.machine.model()
    }

    pub fn context_mut(&mut self) -> &mut VamContext {
        self.machine.model_mut()
    }

    /// Run a trigger on the session's machine.
    pub fn execute(&mut self, trigger: &str) -> Result<VamState, TransitionError> {
        let _span = info_span!("vam_session", session = %self.id).entered();
        self.machine.execute(trigger)
    }

    pub fn flags(&self) -> ModeFlags {
        self.machine.model().flags
    }

    pub fn transform_kind(&self) -> TransformKind {
        self.flags().transform
    }

    pub fn axis_constraint(&self) -> AxisConstraint {
        self.flags().axis
    }

    pub fn coordinate_base(&self) -> CoordinateBase {
        self.flags().base
    }

    pub fn set_transform_kind(&mut self, kind: TransformKind) {
        self.machine.model_mut().flags.transform = kind;
        info!(session = %self.id, transform = %kind, "Transform mode set");
    }

    pub fn set_axis_constraint(&mut self, axis: AxisConstraint) {
        self.machine.model_mut().flags.axis = axis;
        info!(session = %self.id, %axis, "Axis constraint set");
    }

    pub fn set_coordinate_base(&mut self, base: CoordinateBase) {
        self.machine.model_mut().flags.base = base;
        info!(session = %self.id, %base, "Base space set");
    }

    /// Advance the base space and return the new one.
    pub fn cycle_base(&mut self) -> CoordinateBase {
        let base = self.coordinate_base().cycle();
        self.set_coordinate_base(base);
        base
    }

    /// Run one command. Rejected transitions are returned as errors.
    pub fn run_command(&mut self, command: Command) -> Result<CommandOutcome, TransitionError> {
        debug!(session = %self.id, %command, "Running command");
        match command.action() {
            CommandAction::Trigger(trigger) => self.execute(trigger).map(CommandOutcome::Transitioned),
            CommandAction::SetTransform(kind) => {
                self.set_transform_kind(kind);
                Ok(CommandOutcome::FlagsChanged(self.flags()))
            }
            CommandAction::SetAxis(axis) => {
                self.set_axis_constraint(axis);
                Ok(CommandOutcome::FlagsChanged(self.flags()))
            }
            CommandAction::CycleBase => {
                self.cycle_base();
                Ok(CommandOutcome::FlagsChanged(self.flags()))
            }
        }
    }

    /// Run a command by its runtime name, e.g. `vamToMoving`.
    pub fn run_named(&mut self, name: &str) -> Result<CommandOutcome, SessionError> {
        let command: Command = name.parse()?;
        Ok(self.run_command(command)?)
    }

    /// Handle a key press. Keys are ignored while the tool is inactive.
    ///
    /// Bound keys run their commands in order; a transition the current
    /// state does not allow is logged and skipped so the remaining commands
    /// still run. Unbound keys go to the current state's handler. Hook
    /// failures abort and are returned.
    pub fn press_key(&mut self, key: &str) -> Result<KeyDispatch, TransitionError> {
        if !self.active {
            debug!(session = %self.id, key, "Tool inactive, key ignored");
            return Ok(KeyDispatch::Ignored);
        }
        let commands = self.keymap.commands_for(key);
        if commands.is_empty() {
            return Ok(self.forward_key(key));
        }

        let mut outcomes = Vec::with_capacity(commands.len());
        for command in commands {
            match self.run_command(command) {
                Ok(outcome) => outcomes.push(outcome),
                Err(err) if err.is_invalid_transition() => {
                    debug!(session = %self.id, key, %command, error = %err, "Skipping command");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(KeyDispatch::Commands(outcomes))
    }

    fn forward_key(&mut self, key: &str) -> KeyDispatch {
        let state = self.current_state();
        match self.handlers.get_mut(&state) {
            Some(handler) => {
                handler.key_pressed(self.machine.model_mut(), key);
                KeyDispatch::Forwarded(state)
            }
            None => KeyDispatch::Ignored,
        }
    }

    /// Route a pointer sample to the current state's handler. Returns
    /// whether a handler received it; nothing does while the tool is
    /// inactive.
    pub fn pointer_moved(&mut self, sample: PointerSample) -> bool {
        if !self.active {
            return false;
        }
        let state = self.current_state();
        match self.handlers.get_mut(&state) {
            Some(handler) => {
                handler.pointer_moved(self.machine.model_mut(), sample);
                true
            }
            None => false,
        }
    }

    /// Tool switched on: always start from `normal`. The session stays
    /// inactive if the return to `normal` fails.
    pub fn activate(&mut self) -> Result<(), TransitionError> {
        self.return_to_normal()?;
        self.active = true;
        info!(session = %self.id, "Tool active");
        Ok(())
    }

    /// Tool switched off: leave any modal state behind. The session stays
    /// active if the return to `normal` fails.
    pub fn deactivate(&mut self) -> Result<(), TransitionError> {
        self.return_to_normal()?;
        self.active = false;
        info!(session = %self.id, "Tool deactivated");
        Ok(())
    }

    fn return_to_normal(&mut self) -> Result<(), TransitionError> {
        if self.current_state() == VamState::Normal {
            return Ok(());
        }
        match self.execute(TO_NORMAL) {
            Ok(_) => Ok(()),
            Err(err) if err.is_invalid_transition() => {
                warn!(session = %self.id, state = self.current_state().name(), "No way back to normal");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            taken_at: Utc::now(),
            active: self.active,
            state: self.current_state(),
            flags: self.flags(),
            history: self.machine.history().tail(SNAPSHOT_HISTORY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::{HookContext, HookError};
    use crate::tool::state::{vam_builder, TO_MOVING};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Probe {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl Probe {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl InputHandler for Probe {
        fn pointer_moved(&mut self, context: &mut VamContext, sample: PointerSample) {
            context.record_initial_value("translateX", sample.x);
            self.events
                .lock()
                .unwrap()
                .push(format!("pointer {} {}", sample.x, sample.y));
        }

        fn key_pressed(&mut self, _context: &mut VamContext, key: &str) {
            self.events.lock().unwrap().push(format!("key {key}"));
        }
    }

    fn active_session() -> VamSession {
        let mut session = VamSession::new().unwrap();
        session.activate().unwrap();
        session
    }

    /// Session whose `normal` enter callback always fails.
    fn session_failing_on_normal() -> VamSession {
        let machine = vam_builder()
            .unwrap()
            .on_enter(VamState::Normal, |_: &mut VamContext, _: &HookContext<VamState>| {
                Err(HookError::new("viewport gone"))
            })
            .build(VamContext::default())
            .unwrap();
        VamSession::from_machine(machine, Keymap::default())
    }

    #[test]
    fn grab_key_enters_moving_and_selects_translate() {
        let mut session = active_session();
        session.set_transform_kind(TransformKind::Scale);

        let dispatch = session.press_key("g").unwrap();

        assert_eq!(session.current_state(), VamState::Moving);
        assert_eq!(session.transform_kind(), TransformKind::Translate);
        assert!(matches!(dispatch, KeyDispatch::Commands(ref outcomes) if outcomes.len() == 2));
    }

    #[test]
    fn grab_while_moving_skips_the_transition() {
        let mut session = active_session();
        session.press_key("g").unwrap();
        session.press_key("r").unwrap();

        let dispatch = session.press_key("g").unwrap();

        assert_eq!(session.current_state(), VamState::Moving);
        assert_eq!(session.transform_kind(), TransformKind::Translate);
        assert_eq!(
            dispatch,
            KeyDispatch::Commands(vec![CommandOutcome::FlagsChanged(session.flags())])
        );
    }

    #[test]
    fn axis_constraint_does_not_change_state() {
        let mut session = VamSession::new().unwrap();
        session.execute(TO_MOVING).unwrap();

        session.set_axis_constraint(AxisConstraint::X);

        assert_eq!(session.current_state(), VamState::Moving);
        assert_eq!(session.axis_constraint(), AxisConstraint::X);
    }

    #[test]
    fn tab_cycles_base_space() {
        let mut session = active_session();
        session.press_key("Tab").unwrap();
        assert_eq!(session.coordinate_base(), CoordinateBase::Local);
        session.press_key("Tab").unwrap();
        session.press_key("Tab").unwrap();
        assert_eq!(session.coordinate_base(), CoordinateBase::Screen);
    }

    #[test]
    fn unbound_keys_reach_only_the_current_state_handler() {
        let mut session = active_session();
        let normal = Probe::default();
        let moving = Probe::default();
        session.set_handler(VamState::Normal, normal.clone());
        session.set_handler(VamState::Moving, moving.clone());

        assert_eq!(session.press_key("a").unwrap(), KeyDispatch::Forwarded(VamState::Normal));
        session.press_key("g").unwrap();
        assert!(session.pointer_moved(PointerSample { x: 3.0, y: 4.0 }));

        assert_eq!(normal.events(), vec!["key a"]);
        assert_eq!(moving.events(), vec!["pointer 3 4"]);
        assert_eq!(session.context().initial_value("translateX"), Some(3.0));
    }

    #[test]
    fn input_without_handler_is_ignored() {
        let mut session = active_session();
        assert_eq!(session.press_key("a").unwrap(), KeyDispatch::Ignored);
        assert!(!session.pointer_moved(PointerSample { x: 0.0, y: 0.0 }));
    }

    #[test]
    fn inactive_session_ignores_input() {
        let mut session = VamSession::new().unwrap();
        let probe = Probe::default();
        session.set_handler(VamState::Normal, probe.clone());

        assert!(!session.is_active());
        assert_eq!(session.press_key("g").unwrap(), KeyDispatch::Ignored);
        assert_eq!(session.press_key("a").unwrap(), KeyDispatch::Ignored);
        assert!(!session.pointer_moved(PointerSample { x: 1.0, y: 2.0 }));

        assert_eq!(session.current_state(), VamState::Normal);
        assert_eq!(session.transform_kind(), TransformKind::Translate);
        assert!(probe.events().is_empty());
    }

    #[test]
    fn deactivated_session_ignores_input() {
        let mut session = active_session();
        session.deactivate().unwrap();

        assert_eq!(session.press_key("g").unwrap(), KeyDispatch::Ignored);
        assert_eq!(session.current_state(), VamState::Normal);
    }

    #[test]
    fn failed_activation_leaves_session_inactive() {
        let mut session = session_failing_on_normal();
        session.execute(TO_MOVING).unwrap();

        let err = session.activate().unwrap_err();
        assert!(!err.is_invalid_transition());
        assert!(!session.is_active());
    }

    #[test]
    fn failed_deactivation_leaves_session_active() {
        let mut session = session_failing_on_normal();
        session.activate().unwrap();
        session.press_key("g").unwrap();
        assert_eq!(session.current_state(), VamState::Moving);

        assert!(session.deactivate().is_err());
        assert!(session.is_active());
    }

    #[test]
    fn snapshot_carries_only_recent_history() {
        let mut session = active_session();
        for _ in 0..SNAPSHOT_HISTORY {
            session.press_key("g").unwrap();
            session.press_key("Escape").unwrap();
        }

        let snapshot = session.snapshot();
        assert_eq!(session.machine().history().transitions().len(), 2 * SNAPSHOT_HISTORY);
        assert_eq!(snapshot.history.transitions().len(), SNAPSHOT_HISTORY);
        assert_eq!(snapshot.history.last().unwrap().trigger, TO_NORMAL);
    }

    #[test]
    fn activation_returns_to_normal() {
        let mut session = VamSession::new().unwrap();
        session.activate().unwrap();
        assert!(session.is_active());
        assert!(session.is_state("normal"));

        session.run_command(Command::ToRegisterPicking).unwrap();
        session.deactivate().unwrap();
        assert!(!session.is_active());
        assert_eq!(session.current_state(), VamState::Normal);
    }

    #[test]
    fn run_named_reports_unknown_commands() {
        let mut session = VamSession::new().unwrap();
        assert!(matches!(
            session.run_named("vamExplode"),
            Err(SessionError::Command(CommandError::UnknownCommand(_)))
        ));
        assert!(matches!(
            session.run_named("vamToNormal"),
            Err(SessionError::Transition(ref err)) if err.is_invalid_transition()
        ));
        assert_eq!(
            session.run_named("vamSetAxisZ").unwrap(),
            CommandOutcome::FlagsChanged(ModeFlags {
                axis: AxisConstraint::Z,
                ..ModeFlags::default()
            })
        );
    }

    #[test]
    fn snapshot_serializes_state_and_flags() {
        let mut session = active_session();
        session.press_key("g").unwrap();
        session.press_key("y").unwrap();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.session_id, session.id());
        assert_eq!(snapshot.history.transitions().len(), 1);

        let json: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(json["state"], "moving");
        assert_eq!(json["flags"]["axis"], "y");
    }
}

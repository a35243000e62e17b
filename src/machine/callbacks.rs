//! Per-state enter/exit callback table.

use crate::core::State;
use crate::machine::transition::Hook;
use std::collections::HashMap;

/// Explicit enter/exit handlers keyed by state.
///
/// A state-specific handler wins over the catch-all one; the catch-all only
/// runs for states that have no handler of their own.
pub struct StateCallbacks<S: State, M> {
    enter: HashMap<S, Hook<S, M>>,
    exit: HashMap<S, Hook<S, M>>,
    any_enter: Option<Hook<S, M>>,
    any_exit: Option<Hook<S, M>>,
}

impl<S: State, M> StateCallbacks<S, M> {
    pub fn new() -> Self {
        Self {
            enter: HashMap::new(),
            exit: HashMap::new(),
            any_enter: None,
            any_exit: None,
        }
    }

    pub fn set_enter(&mut self, state: S, hook: Hook<S, M>) {
        self.enter.insert(state, hook);
    }

    pub fn set_exit(&mut self, state: S, hook: Hook<S, M>) {
        self.exit.insert(state, hook);
    }

    pub fn set_any_enter(&mut self, hook: Hook<S, M>) {
        self.any_enter = Some(hook);
    }

    pub fn set_any_exit(&mut self, hook: Hook<S, M>) {
        self.any_exit = Some(hook);
    }

    /// Handler to run when entering `state`, if any.
    pub fn enter_for(&self, state: &S) -> Option<&Hook<S, M>> {
        self.enter.get(state).or(self.any_enter.as_ref())
    }

    /// Handler to run when leaving `state`, if any.
    pub fn exit_for(&self, state: &S) -> Option<&Hook<S, M>> {
        self.exit.get(state).or(self.any_exit.as_ref())
    }

    /// States that have a specific enter or exit handler.
    pub fn registered_states(&self) -> impl Iterator<Item = &S> {
        self.enter.keys().chain(self.exit.keys())
    }
}

impl<S: State, M> Default for StateCallbacks<S, M> {
    fn default() -> Self {
        Self::new()
    }
}

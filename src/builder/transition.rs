//! Builder for constructing state transitions.

use crate::builder::error::{ConfigViolation, ConfigurationError};
use crate::core::State;
use crate::machine::{Hook, HookContext, HookError, Transition};
use std::sync::Arc;

/// Builder for constructing transitions with a fluent API.
pub struct TransitionBuilder<S: State, M> {
    trigger: Option<String>,
    sources: Vec<S>,
    dest: Option<S>,
    before: Option<Hook<S, M>>,
    after: Option<Hook<S, M>>,
}

impl<S: State, M> TransitionBuilder<S, M> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            trigger: None,
            sources: Vec::new(),
            dest: None,
            before: None,
            after: None,
        }
    }

    /// Set the trigger name (required).
    pub fn trigger(mut self, name: impl Into<String>) -> Self {
        self.trigger = Some(name.into());
        self
    }

    /// Add a source state (at least one required). May be called repeatedly.
    pub fn from(mut self, state: S) -> Self {
        self.sources.push(state);
        self
    }

    /// Add several source states at once.
    pub fn from_any(mut self, states: impl IntoIterator<Item = S>) -> Self {
        self.sources.extend(states);
        self
    }

    /// Set the destination state (required).
    pub fn to(mut self, state: S) -> Self {
        self.dest = Some(state);
        self
    }

    /// Hook run before leaving the source state.
    pub fn before<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut M, &HookContext<S>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.before = Some(Arc::new(hook));
        self
    }

    /// Hook run after entering the destination state.
    pub fn after<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut M, &HookContext<S>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.after = Some(Arc::new(hook));
        self
    }

    /// Build the transition.
    ///
    /// Membership of the states in the machine's state set is checked later,
    /// when the machine itself is built.
    pub fn build(self) -> Result<Transition<S, M>, ConfigurationError> {
        let trigger = self.trigger.ok_or(ConfigViolation::MissingTrigger)?;
        let dest = self
            .dest
            .ok_or_else(|| ConfigViolation::MissingDestState {
                trigger: trigger.clone(),
            })?;

        Ok(Transition {
            trigger,
            sources: self.sources,
            dest,
            before: self.before,
            after: self.after,
        })
    }
}

impl<S: State, M> Default for TransitionBuilder<S, M> {
    fn default() -> Self {
        Self::new()
    }
}

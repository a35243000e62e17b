//! Builder for constructing state machines.
//!
//! Validation runs once, in `build`, and reports every problem in the table
//! rather than stopping at the first one.

use crate::builder::config::{HookRegistry, MachineConfig};
use crate::builder::error::{ConfigViolation, ConfigurationError};
use crate::builder::transition::TransitionBuilder;
use crate::core::{State, StateHistory};
use crate::machine::{
    Hook, HookContext, HookError, StateCallbacks, StateMachine, Transition, DEFAULT_HISTORY_LIMIT,
};
use std::collections::HashSet;
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<ConfigViolation>>;

fn check(ok: bool, violation: impl FnOnce() -> ConfigViolation) -> Check {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}

/// Builder for constructing state machines with a fluent API.
pub struct StateMachineBuilder<S: State, M> {
    states: Vec<S>,
    initial: Option<S>,
    transitions: Vec<Transition<S, M>>,
    callbacks: StateCallbacks<S, M>,
    history_limit: usize,
    pending: Vec<ConfigViolation>,
}

impl<S: State, M> StateMachineBuilder<S, M> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            initial: None,
            transitions: Vec::new(),
            callbacks: StateCallbacks::new(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            pending: Vec::new(),
        }
    }

    /// Build from a declarative table, resolving hook names against `hooks`.
    ///
    /// Unresolved hook names are reported by `build`.
    pub fn from_config(config: MachineConfig<S>, hooks: &HookRegistry<S, M>) -> Self {
        let mut builder = Self::new().states(config.states).initial(config.initial);

        for entry in config.transitions {
            let before = builder.resolve(hooks, &entry.trigger, entry.before);
            let after = builder.resolve(hooks, &entry.trigger, entry.after);
            builder.transitions.push(Transition {
                trigger: entry.trigger,
                sources: entry.source.into_vec(),
                dest: entry.dest,
                before,
                after,
            });
        }

        builder
    }

    fn resolve(
        &mut self,
        hooks: &HookRegistry<S, M>,
        trigger: &str,
        name: Option<String>,
    ) -> Option<Hook<S, M>> {
        let name = name?;
        let hook = hooks.get(&name).cloned();
        if hook.is_none() {
            self.pending.push(ConfigViolation::UnknownHook {
                trigger: trigger.to_string(),
                hook: name,
            });
        }
        hook
    }

    /// Declare the state set, in order.
    pub fn states(mut self, states: impl IntoIterator<Item = S>) -> Self {
        self.states.extend(states);
        self
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Keep at most `limit` transitions in the machine's history; older
    /// records are dropped first.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Add a transition using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(mut self, builder: TransitionBuilder<S, M>) -> Result<Self, ConfigurationError> {
        let transition = builder.build()?;
        self.transitions.push(transition);
        Ok(self)
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: Transition<S, M>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, transitions: Vec<Transition<S, M>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Handler run whenever `state` is entered.
    pub fn on_enter<F>(mut self, state: S, hook: F) -> Self
    where
        F: Fn(&mut M, &HookContext<S>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.callbacks.set_enter(state, Arc::new(hook));
        self
    }

    /// Handler run whenever `state` is left.
    pub fn on_exit<F>(mut self, state: S, hook: F) -> Self
    where
        F: Fn(&mut M, &HookContext<S>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.callbacks.set_exit(state, Arc::new(hook));
        self
    }

    /// Fallback enter handler for states without their own.
    pub fn on_any_enter<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut M, &HookContext<S>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.callbacks.set_any_enter(Arc::new(hook));
        self
    }

    /// Fallback exit handler for states without their own.
    pub fn on_any_exit<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut M, &HookContext<S>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.callbacks.set_any_exit(Arc::new(hook));
        self
    }

    fn validate(&self) -> Check {
        let mut checks: Vec<Check> = Vec::new();

        checks.push(check(!self.states.is_empty(), || ConfigViolation::EmptyStateSet));

        let mut seen = HashSet::new();
        for state in &self.states {
            checks.push(check(seen.insert(state), || ConfigViolation::DuplicateState {
                state: state.name().to_string(),
            }));
        }
        let known = |state: &S| self.states.contains(state);

        checks.push(match &self.initial {
            None => Validation::fail(ConfigViolation::MissingInitialState),
            Some(initial) => check(known(initial), || ConfigViolation::UnknownInitialState {
                state: initial.name().to_string(),
            }),
        });

        let mut pairs = HashSet::new();
        for transition in &self.transitions {
            let trigger = &transition.trigger;
            checks.push(check(!transition.sources.is_empty(), || {
                ConfigViolation::EmptySources {
                    trigger: trigger.clone(),
                }
            }));
            for source in &transition.sources {
                checks.push(check(known(source), || ConfigViolation::UnknownSourceState {
                    trigger: trigger.clone(),
                    state: source.name().to_string(),
                }));
                checks.push(check(pairs.insert((trigger, source)), || {
                    ConfigViolation::DuplicateTransition {
                        trigger: trigger.clone(),
                        state: source.name().to_string(),
                    }
                }));
            }
            checks.push(check(known(&transition.dest), || {
                ConfigViolation::UnknownDestState {
                    trigger: trigger.clone(),
                    state: transition.dest.name().to_string(),
                }
            }));
        }

        for state in self.callbacks.registered_states() {
            checks.push(check(known(state), || ConfigViolation::UnknownCallbackState {
                state: state.name().to_string(),
            }));
        }

        for violation in &self.pending {
            checks.push(Validation::fail(violation.clone()));
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Build the state machine around `model`.
    ///
    /// Returns every configuration problem found if the table is inconsistent.
    pub fn build(self, model: M) -> Result<StateMachine<S, M>, ConfigurationError> {
        if let Validation::Failure(violations) = self.validate() {
            return Err(ConfigurationError::new(violations.iter().cloned().collect()));
        }
        let initial = self.initial.ok_or(ConfigViolation::MissingInitialState)?;

        Ok(StateMachine::from_parts(
            self.states,
            self.transitions,
            self.callbacks,
            initial,
            StateHistory::with_limit(self.history_limit),
            model,
        ))
    }
}

impl<S: State, M> Default for StateMachineBuilder<S, M> {
    fn default() -> Self {
        Self::new()
    }
}

//! The state machine engine.

use crate::builder::StateMachineBuilder;
use crate::core::{State, StateHistory, StateTransition};
use crate::machine::callbacks::StateCallbacks;
use crate::machine::error::TransitionError;
use crate::machine::transition::{Hook, HookContext, HookPhase, Transition};
use chrono::Utc;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info, warn};

/// Transitions retained by a machine's history unless the builder sets
/// another limit.
pub const DEFAULT_HISTORY_LIMIT: usize = 1024;

/// Declarative state machine owning its model.
///
/// Built through [`StateMachineBuilder`], which guarantees every
/// `(trigger, source)` pair resolves to at most one transition. Access is
/// single-threaded: every call runs to completion before returning.
pub struct StateMachine<S: State, M> {
    states: Vec<S>,
    transitions: Vec<Transition<S, M>>,
    registry: HashMap<(String, S), usize>,
    triggers: Vec<String>,
    callbacks: StateCallbacks<S, M>,
    current: S,
    history: StateHistory<S>,
    model: M,
}

impl<S: State, M> StateMachine<S, M> {
    pub fn builder() -> StateMachineBuilder<S, M> {
        StateMachineBuilder::new()
    }

    /// Assemble a machine from an already validated table.
    pub(crate) fn from_parts(
        states: Vec<S>,
        transitions: Vec<Transition<S, M>>,
        callbacks: StateCallbacks<S, M>,
        initial: S,
        history: StateHistory<S>,
        model: M,
    ) -> Self {
        let mut registry = HashMap::new();
        let mut triggers: Vec<String> = Vec::new();
        for (index, transition) in transitions.iter().enumerate() {
            if !triggers.contains(&transition.trigger) {
                triggers.push(transition.trigger.clone());
            }
            for source in &transition.sources {
                registry.insert((transition.trigger.clone(), source.clone()), index);
            }
        }

        Self {
            states,
            transitions,
            registry,
            triggers,
            callbacks,
            current: initial,
            history,
            model,
        }
    }

    /// Get current state (pure)
    pub fn current_state(&self) -> &S {
        &self.current
    }

    /// Check whether the current state is named `name` (pure)
    pub fn is_state(&self, name: &str) -> bool {
        self.current.name() == name
    }

    /// The declared states, in declaration order.
    pub fn states(&self) -> &[S] {
        &self.states
    }

    /// Distinct trigger names, in the order they were first declared.
    pub fn triggers(&self) -> &[String] {
        &self.triggers
    }

    /// Whether `trigger` would be accepted from the current state (pure)
    pub fn can_execute(&self, trigger: &str) -> bool {
        self.lookup(trigger).is_some()
    }

    /// Triggers accepted from the current state.
    pub fn available_triggers(&self) -> Vec<&str> {
        self.triggers
            .iter()
            .filter(|trigger| self.can_execute(trigger))
            .map(String::as_str)
            .collect()
    }

    pub fn history(&self) -> &StateHistory<S> {
        &self.history
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Consume the machine, handing back its model.
    pub fn into_model(self) -> M {
        self.model
    }

    fn lookup(&self, trigger: &str) -> Option<&Transition<S, M>> {
        self.registry
            .get(&(trigger.to_string(), self.current.clone()))
            .map(|&index| &self.transitions[index])
    }

    /// Run `trigger` from the current state.
    ///
    /// Callbacks fire in the order before, exit(old), enter(new), after, with
    /// the state changing between exit and enter. A failing callback stops
    /// the sequence without rolling back: failures in `before`/`exit` leave
    /// the source state, failures in `enter`/`after` leave the destination.
    ///
    /// Returns the new current state.
    pub fn execute(&mut self, trigger: &str) -> Result<S, TransitionError> {
        let Some(transition) = self.lookup(trigger) else {
            let known = self.triggers.iter().any(|t| t == trigger);
            warn!(
                trigger,
                state = self.current.name(),
                known,
                "Transition rejected"
            );
            return Err(TransitionError::InvalidTransition {
                trigger: trigger.to_string(),
                state: self.current.name().to_string(),
            });
        };

        let before = transition.before.clone();
        let after = transition.after.clone();
        let mut context = HookContext {
            trigger: trigger.to_string(),
            source: self.current.clone(),
            dest: transition.dest.clone(),
            phase: HookPhase::Before,
            state: self.current.clone(),
        };
        debug!(
            trigger,
            from = context.source.name(),
            to = context.dest.name(),
            "Executing transition"
        );

        if let Some(hook) = before {
            self.run_hook(&hook, &context)?;
        }

        context.phase = HookPhase::Exit;
        if let Some(hook) = self.callbacks.exit_for(&context.source).cloned() {
            self.run_hook(&hook, &context)?;
        }

        self.current = context.dest.clone();
        self.history.push(StateTransition {
            from: context.source.clone(),
            to: context.dest.clone(),
            trigger: context.trigger.clone(),
            timestamp: Utc::now(),
        });

        context.phase = HookPhase::Enter;
        context.state = self.current.clone();
        if let Some(hook) = self.callbacks.enter_for(&context.dest).cloned() {
            self.run_hook(&hook, &context)?;
        }

        context.phase = HookPhase::After;
        if let Some(hook) = after {
            self.run_hook(&hook, &context)?;
        }

        info!(
            trigger,
            from = context.source.name(),
            to = context.dest.name(),
            "Transition complete"
        );
        Ok(self.current.clone())
    }

    fn run_hook(&mut self, hook: &Hook<S, M>, context: &HookContext<S>) -> Result<(), TransitionError> {
        hook(&mut self.model, context).map_err(|source| {
            warn!(
                trigger = context.trigger.as_str(),
                phase = %context.phase,
                state = self.current.name(),
                error = %source,
                "Hook failed"
            );
            TransitionError::Hook {
                trigger: context.trigger.clone(),
                phase: context.phase,
                state: self.current.name().to_string(),
                source,
            }
        })
    }
}

impl<S: State, M> fmt::Debug for StateMachine<S, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current)
            .field("states", &self.states)
            .field("triggers", &self.triggers)
            .field("history", &self.history.transitions().len())
            .finish_non_exhaustive()
    }
}

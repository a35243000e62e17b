//! Transition records and the hooks attached to them.

use crate::core::State;
use crate::machine::error::HookError;
use std::fmt;
use std::sync::Arc;

/// Callback invoked at one point of the transition sequence.
///
/// Receives the model owned by the machine and a description of the
/// transition in progress.
pub type Hook<S, M> = Arc<dyn Fn(&mut M, &HookContext<S>) -> Result<(), HookError> + Send + Sync>;

/// Point in the transition sequence at which a callback runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HookPhase {
    Before,
    Exit,
    Enter,
    After,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Before => "before",
            Self::Exit => "exit",
            Self::Enter => "enter",
            Self::After => "after",
        };
        f.write_str(label)
    }
}

/// Transition in progress, as seen by a callback.
#[derive(Clone, Debug)]
pub struct HookContext<S: State> {
    pub trigger: String,
    pub source: S,
    pub dest: S,
    pub phase: HookPhase,
    /// The machine's state while this hook runs: `source` for before and
    /// exit, `dest` for enter and after.
    pub state: S,
}

/// A declared rule: `trigger` moves any of `sources` to `dest`.
pub struct Transition<S: State, M> {
    pub trigger: String,
    pub sources: Vec<S>,
    pub dest: S,
    pub before: Option<Hook<S, M>>,
    pub after: Option<Hook<S, M>>,
}

impl<S: State, M> Transition<S, M> {
    /// Hook-less transition.
    pub fn new(trigger: impl Into<String>, sources: Vec<S>, dest: S) -> Self {
        Self {
            trigger: trigger.into(),
            sources,
            dest,
            before: None,
            after: None,
        }
    }

    /// Check if this transition is valid from `current` (pure)
    pub fn can_execute(&self, current: &S) -> bool {
        self.sources.contains(current)
    }
}

impl<S: State, M> Clone for Transition<S, M> {
    fn clone(&self) -> Self {
        Self {
            trigger: self.trigger.clone(),
            sources: self.sources.clone(),
            dest: self.dest.clone(),
            before: self.before.clone(),
            after: self.after.clone(),
        }
    }
}

impl<S: State, M> fmt::Debug for Transition<S, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("trigger", &self.trigger)
            .field("sources", &self.sources)
            .field("dest", &self.dest)
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .finish()
    }
}

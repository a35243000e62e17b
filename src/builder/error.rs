//! Configuration errors raised while building state machines.

use thiserror::Error;

/// A single problem found in a declared state/transition table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigViolation {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("No states declared")]
    EmptyStateSet,

    #[error("State '{state}' is declared more than once")]
    DuplicateState { state: String },

    #[error("Initial state '{state}' is not a declared state")]
    UnknownInitialState { state: String },

    #[error("Transition trigger not specified. Call .trigger(name)")]
    MissingTrigger,

    #[error("Transition '{trigger}' has no destination. Call .to(state)")]
    MissingDestState { trigger: String },

    #[error("Transition '{trigger}' has no source states")]
    EmptySources { trigger: String },

    #[error("Transition '{trigger}' references unknown source state '{state}'")]
    UnknownSourceState { trigger: String, state: String },

    #[error("Transition '{trigger}' references unknown destination state '{state}'")]
    UnknownDestState { trigger: String, state: String },

    #[error("Trigger '{trigger}' is declared more than once from state '{state}'")]
    DuplicateTransition { trigger: String, state: String },

    #[error("Callback registered for unknown state '{state}'")]
    UnknownCallbackState { state: String },

    #[error("Transition '{trigger}' names unknown hook '{hook}'")]
    UnknownHook { trigger: String, hook: String },

    #[error("Malformed table: {message}")]
    Malformed { message: String },
}

/// The declared table is inconsistent. Lists every violation found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid state machine configuration: {}", render(.violations))]
pub struct ConfigurationError {
    violations: Vec<ConfigViolation>,
}

impl ConfigurationError {
    pub fn new(violations: Vec<ConfigViolation>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[ConfigViolation] {
        &self.violations
    }

    pub fn contains(&self, predicate: impl Fn(&ConfigViolation) -> bool) -> bool {
        self.violations.iter().any(predicate)
    }
}

impl From<ConfigViolation> for ConfigurationError {
    fn from(violation: ConfigViolation) -> Self {
        Self::new(vec![violation])
    }
}

fn render(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

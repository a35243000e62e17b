//! Declarative transition tables.
//!
//! Tables are plain data: states, an initial state, and transitions whose
//! hooks are referred to by name. Names resolve against an explicit
//! [`HookRegistry`] when the table is turned into a builder.

use crate::builder::error::{ConfigViolation, ConfigurationError};
use crate::core::State;
use crate::machine::{Hook, HookContext, HookError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// One source state or several.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged, bound = "")]
pub enum Sources<S: State> {
    One(S),
    Many(Vec<S>),
}

impl<S: State> Sources<S> {
    pub fn into_vec(self) -> Vec<S> {
        match self {
            Self::One(state) => vec![state],
            Self::Many(states) => states,
        }
    }
}

/// A transition entry in a declarative table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionConfig<S: State> {
    pub trigger: String,
    pub source: Sources<S>,
    pub dest: S,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

/// A complete declarative table.
///
/// # Example
///
/// ```rust
/// use vam::builder::{HookRegistry, MachineConfig, StateMachineBuilder};
///
/// let config: MachineConfig<String> = MachineConfig::from_json(r#"{
///     "states": ["idle", "running", "stopped"],
///     "initial": "idle",
///     "transitions": [
///         {"trigger": "start", "source": "idle", "dest": "running"},
///         {"trigger": "stop", "source": ["idle", "running"], "dest": "stopped"}
///     ]
/// }"#).unwrap();
///
/// let mut machine = StateMachineBuilder::from_config(config, &HookRegistry::new())
///     .build(())
///     .unwrap();
/// machine.execute("start").unwrap();
/// assert!(machine.is_state("running"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct MachineConfig<S: State> {
    pub states: Vec<S>,
    pub initial: S,
    #[serde(default)]
    pub transitions: Vec<TransitionConfig<S>>,
}

impl<S: State> MachineConfig<S> {
    /// Parse a table from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(text).map_err(|err| {
            ConfigViolation::Malformed {
                message: err.to_string(),
            }
            .into()
        })
    }

    pub fn to_json(&self) -> Result<String, ConfigurationError> {
        serde_json::to_string_pretty(self).map_err(|err| {
            ConfigViolation::Malformed {
                message: err.to_string(),
            }
            .into()
        })
    }
}

/// Named hooks that declarative tables may refer to.
pub struct HookRegistry<S: State, M> {
    hooks: HashMap<String, Hook<S, M>>,
}

impl<S: State, M> HookRegistry<S, M> {
    pub fn new() -> Self {
        Self {
            hooks: HashMap::new(),
        }
    }

    /// Register `hook` under `name`, replacing any earlier one.
    pub fn register<F>(mut self, name: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&mut M, &HookContext<S>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.hooks.insert(name.into(), Arc::new(hook));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Hook<S, M>> {
        self.hooks.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.hooks.contains_key(name)
    }
}

impl<S: State, M> Default for HookRegistry<S, M> {
    fn default() -> Self {
        Self::new()
    }
}

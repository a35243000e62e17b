//! Core State trait for state machine states.
//!
//! A state is an opaque, named identifier drawn from a fixed set supplied
//! when the machine is built. The trait only exposes the name; everything
//! else about a state lives in the transition table and callbacks.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine states.
///
/// # Required Traits
///
/// - `Clone`: states are copied into history records and hook contexts
/// - `Eq` + `Hash`: states key the transition registry
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: states appear in declarative tables and snapshots
///
/// # Example
///
/// ```rust
/// use vam::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum ToolState {
///     Idle,
///     Running,
/// }
///
/// impl State for ToolState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Idle => "idle",
///             Self::Running => "running",
///         }
///     }
/// }
///
/// assert_eq!(ToolState::Running.name(), "running");
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}

/// Plain string names, for tables declared as data.
impl State for String {
    fn name(&self) -> &str {
        self.as_str()
    }
}

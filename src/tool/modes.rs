//! Session-wide mode flags.
//!
//! Flags are orthogonal to the state machine: transitions never touch them,
//! only the explicit setters do.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which transform the pointer drives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    #[default]
    Translate,
    Rotate,
    Scale,
}

/// Axis the transform is locked to, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisConstraint {
    #[default]
    None,
    X,
    Y,
    Z,
}

/// Coordinate space transforms are expressed in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateBase {
    #[default]
    Screen,
    Local,
    World,
}

impl CoordinateBase {
    /// Next base in the cycle screen -> local -> world -> screen.
    pub fn cycle(self) -> Self {
        match self {
            Self::Screen => Self::Local,
            Self::Local => Self::World,
            Self::World => Self::Screen,
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Translate => "translate",
            Self::Rotate => "rotate",
            Self::Scale => "scale",
        })
    }
}

impl fmt::Display for AxisConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        })
    }
}

impl fmt::Display for CoordinateBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Screen => "screen",
            Self::Local => "local",
            Self::World => "world",
        })
    }
}

/// The three flags together. Defaults to translate, unconstrained, screen space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeFlags {
    pub transform: TransformKind,
    pub axis: AxisConstraint,
    pub base: CoordinateBase,
}

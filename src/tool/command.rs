//! Named tool commands and the key bindings that invoke them.

use crate::tool::modes::{AxisConstraint, TransformKind};
use crate::tool::state::{TO_MOVING, TO_NORMAL, TO_REGISTER_PICKING};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),
}

/// Every command the tool exposes to its host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    ToMoving,
    ToNormal,
    ToRegisterPicking,
    SetTranslate,
    SetRotate,
    SetScale,
    SetAxisX,
    SetAxisY,
    SetAxisZ,
    SetAxisNone,
    CycleBase,
}

/// What running a command does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandAction {
    Trigger(&'static str),
    SetTransform(TransformKind),
    SetAxis(AxisConstraint),
    CycleBase,
}

impl Command {
    pub const ALL: [Command; 11] = [
        Command::ToMoving,
        Command::ToNormal,
        Command::ToRegisterPicking,
        Command::SetTranslate,
        Command::SetRotate,
        Command::SetScale,
        Command::SetAxisX,
        Command::SetAxisY,
        Command::SetAxisZ,
        Command::SetAxisNone,
        Command::CycleBase,
    ];

    /// Runtime command name registered with the host.
    pub fn name(self) -> &'static str {
        match self {
            Self::ToMoving => "vamToMoving",
            Self::ToNormal => "vamToNormal",
            Self::ToRegisterPicking => "vamToRegisterPicking",
            Self::SetTranslate => "vamSetTranslate",
            Self::SetRotate => "vamSetRotate",
            Self::SetScale => "vamSetScale",
            Self::SetAxisX => "vamSetAxisX",
            Self::SetAxisY => "vamSetAxisY",
            Self::SetAxisZ => "vamSetAxisZ",
            Self::SetAxisNone => "vamSetAxisNone",
            Self::CycleBase => "vamCycleBase",
        }
    }

    /// Human-readable description shown in the host's command listings.
    pub fn annotation(self) -> &'static str {
        match self {
            Self::ToMoving => "VAM: Enter moving state",
            Self::ToNormal => "VAM: Return to normal state",
            Self::ToRegisterPicking => "VAM: Enter register picking state",
            Self::SetTranslate => "VAM: Set translate mode",
            Self::SetRotate => "VAM: Set rotate mode",
            Self::SetScale => "VAM: Set scale mode",
            Self::SetAxisX => "VAM: Constrain to X axis",
            Self::SetAxisY => "VAM: Constrain to Y axis",
            Self::SetAxisZ => "VAM: Constrain to Z axis",
            Self::SetAxisNone => "VAM: Remove axis constraint",
            Self::CycleBase => "VAM: Cycle base space (screen/local/world)",
        }
    }

    pub fn action(self) -> CommandAction {
        match self {
            Self::ToMoving => CommandAction::Trigger(TO_MOVING),
            Self::ToNormal => CommandAction::Trigger(TO_NORMAL),
            Self::ToRegisterPicking => CommandAction::Trigger(TO_REGISTER_PICKING),
            Self::SetTranslate => CommandAction::SetTransform(TransformKind::Translate),
            Self::SetRotate => CommandAction::SetTransform(TransformKind::Rotate),
            Self::SetScale => CommandAction::SetTransform(TransformKind::Scale),
            Self::SetAxisX => CommandAction::SetAxis(AxisConstraint::X),
            Self::SetAxisY => CommandAction::SetAxis(AxisConstraint::Y),
            Self::SetAxisZ => CommandAction::SetAxis(AxisConstraint::Z),
            Self::SetAxisNone => CommandAction::SetAxis(AxisConstraint::None),
            Self::CycleBase => CommandAction::CycleBase,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| command.name() == s)
            .ok_or_else(|| CommandError::UnknownCommand(s.to_string()))
    }
}

/// A key press bound to a command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    pub key: String,
    pub command: Command,
}

/// Key bindings active while the tool is. A key may carry several
/// commands; they run in the order they were bound.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keymap {
    bindings: Vec<KeyBinding>,
}

impl Keymap {
    /// Keymap with no bindings.
    pub fn empty() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    pub fn bind(mut self, key: impl Into<String>, command: Command) -> Self {
        self.bindings.push(KeyBinding {
            key: key.into(),
            command,
        });
        self
    }

    /// Commands bound to `key`, in binding order.
    pub fn commands_for(&self, key: &str) -> Vec<Command> {
        self.bindings
            .iter()
            .filter(|binding| binding.key == key)
            .map(|binding| binding.command)
            .collect()
    }

    pub fn bindings(&self) -> &[KeyBinding] {
        &self.bindings
    }
}

/// Blender-style defaults: `g` grabs (enters moving and selects translate),
/// `r`/`s` pick rotate/scale, `x`/`y`/`z` lock an axis, `Tab` cycles the
/// base space and `Escape` returns to normal.
impl Default for Keymap {
    fn default() -> Self {
        Self::empty()
            .bind("g", Command::ToMoving)
            .bind("Escape", Command::ToNormal)
            .bind("g", Command::SetTranslate)
            .bind("r", Command::SetRotate)
            .bind("s", Command::SetScale)
            .bind("x", Command::SetAxisX)
            .bind("y", Command::SetAxisY)
            .bind("z", Command::SetAxisZ)
            .bind("Tab", Command::CycleBase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_back_to_commands() {
        for command in Command::ALL {
            assert_eq!(command.name().parse::<Command>().unwrap(), command);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "vamExplode".parse::<Command>().unwrap_err();
        assert_eq!(err, CommandError::UnknownCommand("vamExplode".to_string()));
    }

    #[test]
    fn transition_commands_map_to_triggers() {
        assert_eq!(Command::ToMoving.action(), CommandAction::Trigger("to_moving"));
        assert_eq!(
            Command::ToRegisterPicking.action(),
            CommandAction::Trigger("to_register_picking")
        );
        assert_eq!(
            Command::SetAxisNone.action(),
            CommandAction::SetAxis(AxisConstraint::None)
        );
    }

    #[test]
    fn default_keymap_binds_grab_twice() {
        let keymap = Keymap::default();
        assert_eq!(
            keymap.commands_for("g"),
            vec![Command::ToMoving, Command::SetTranslate]
        );
        assert_eq!(keymap.commands_for("Tab"), vec![Command::CycleBase]);
        assert!(keymap.commands_for("q").is_empty());
        assert_eq!(keymap.bindings().len(), 9);
    }
}

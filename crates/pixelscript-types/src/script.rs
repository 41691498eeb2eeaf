//! Script encoding: instructions and the per-hook instruction lists.
//!
//! A [`Command`] is pure data. Operand codes that have a fixed meaning
//! (movement direction, turn mode) travel as raw integers and are decoded
//! by the dispatcher through [`Direction::from_code`] and
//! [`TurnMode::from_code`], so an out-of-range code loads fine and simply
//! does nothing when executed. An unrecognized `op` tag deserializes to
//! [`Command::Unknown`] for the same reason.
//!
//! [`Direction::from_code`]: crate::Direction::from_code
//! [`TurnMode::from_code`]: crate::TurnMode::from_code

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Direction, Hook, TurnMode};

/// One script instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(tag = "op", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Command {
    /// Shift the entity by `distance` cells along `direction`
    /// (0 = right, 1 = down, 2 = left, 3 = up).
    Move {
        /// Direction code, decoded with [`Direction::from_code`].
        direction: u8,
        /// Number of cells to move.
        distance: u32,
    },
    /// Jump to an absolute position.
    MoveTo {
        /// Target row.
        row: i32,
        /// Target column.
        col: i32,
    },
    /// Transform the entity's shape
    /// (1 = rotate right, 2 = mirror horizontally, 3 = rotate left).
    Turn {
        /// Mode code, decoded with [`TurnMode::from_code`].
        mode: u8,
    },
    /// Hide (`true`) or show (`false`) the entity.
    SetHidden {
        /// Whether the entity should be hidden.
        flag: bool,
    },
    /// Suspend the current hook for `ticks` ticks.
    Wait {
        /// Number of ticks to wait. Zero is treated as invalid.
        ticks: u32,
    },
    /// Spawn a copy of the entity at an absolute position.
    Duplicate {
        /// Row of the copy.
        row: i32,
        /// Column of the copy.
        col: i32,
    },
    /// Any instruction tag this build does not understand.
    #[serde(other)]
    #[ts(skip)]
    Unknown,
}

impl Command {
    /// Convenience constructor for a move instruction.
    pub const fn move_by(direction: Direction, distance: u32) -> Self {
        Self::Move {
            direction: direction.code(),
            distance,
        }
    }

    /// Convenience constructor for a turn instruction.
    pub const fn turn(mode: TurnMode) -> Self {
        Self::Turn { mode: mode.code() }
    }

    /// Whether this instruction suspends its hook.
    pub const fn is_wait(&self) -> bool {
        matches!(self, Self::Wait { .. })
    }
}

/// The three instruction lists attached to a placed template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ScriptSet {
    /// Instructions run when a placed entity is created.
    #[serde(default)]
    pub on_start: Vec<Command>,
    /// Instructions re-run from the top every tick.
    #[serde(default)]
    pub on_tick: Vec<Command>,
    /// Instructions run when an entity is created by duplication.
    #[serde(default)]
    pub on_duplicate: Vec<Command>,
}

impl ScriptSet {
    /// Borrow the instruction list for a hook.
    pub fn hook(&self, hook: Hook) -> &[Command] {
        match hook {
            Hook::OnStart => &self.on_start,
            Hook::OnTick => &self.on_tick,
            Hook::OnDuplicate => &self.on_duplicate,
        }
    }

    /// Mutably borrow the instruction list for a hook.
    pub const fn hook_mut(&mut self, hook: Hook) -> &mut Vec<Command> {
        match hook {
            Hook::OnStart => &mut self.on_start,
            Hook::OnTick => &mut self.on_tick,
            Hook::OnDuplicate => &mut self.on_duplicate,
        }
    }

    /// Total number of instructions across all hooks.
    pub fn len(&self) -> usize {
        self.on_start
            .len()
            .saturating_add(self.on_tick.len())
            .saturating_add(self.on_duplicate.len())
    }

    /// Whether no hook has any instruction.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

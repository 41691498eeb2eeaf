//! Enumeration types for the Pixelscript simulation.
//!
//! Covers the color palette, script hooks, and the decoded forms of the
//! integer codes that travel inside [`Command`](crate::Command) payloads.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Color palette
// ---------------------------------------------------------------------------

/// One cell color in a sprite shape or a composed scene.
///
/// [`ColorToken::Blank`] is transparent: the compositor never paints it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum ColorToken {
    /// Transparent cell.
    #[default]
    Blank,
    /// Red.
    Red,
    /// Orange.
    Orange,
    /// Yellow.
    Yellow,
    /// Green.
    Green,
    /// Blue.
    Blue,
    /// Purple.
    Purple,
    /// Brown.
    Brown,
    /// Black. Also the default simulation background.
    Black,
    /// White.
    White,
}

impl ColorToken {
    /// Every token in palette order.
    pub const ALL: [Self; 10] = [
        Self::Blank,
        Self::Red,
        Self::Orange,
        Self::Yellow,
        Self::Green,
        Self::Blue,
        Self::Purple,
        Self::Brown,
        Self::Black,
        Self::White,
    ];

    /// Whether this token is the transparent one.
    pub const fn is_blank(self) -> bool {
        matches!(self, Self::Blank)
    }

    /// Two-column glyph used by text presenters.
    ///
    /// Blank maps to an ideographic space so rows keep their width.
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Blank => "\u{3000}",
            Self::Red => "🟥",
            Self::Orange => "🟧",
            Self::Yellow => "🟨",
            Self::Green => "🟩",
            Self::Blue => "🟦",
            Self::Purple => "🟪",
            Self::Brown => "🟫",
            Self::Black => "⬛",
            Self::White => "⬜",
        }
    }
}

// ---------------------------------------------------------------------------
// Script hooks
// ---------------------------------------------------------------------------

/// A named trigger point in a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Hook {
    /// Runs once when a placed entity is created.
    OnStart,
    /// Runs from the top on every tick.
    OnTick,
    /// Runs once when an entity is created by a duplicate instruction.
    OnDuplicate,
}

// ---------------------------------------------------------------------------
// Decoded instruction operands
// ---------------------------------------------------------------------------

/// Movement direction of a `Move` instruction.
///
/// Rows grow downward, columns grow to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Code 0: towards higher columns.
    Right,
    /// Code 1: towards higher rows.
    Down,
    /// Code 2: towards lower columns.
    Left,
    /// Code 3: towards lower rows.
    Up,
}

impl Direction {
    /// Decode a wire direction code. Returns `None` outside `0..=3`.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Right),
            1 => Some(Self::Down),
            2 => Some(Self::Left),
            3 => Some(Self::Up),
            _ => None,
        }
    }

    /// The wire code for this direction.
    pub const fn code(self) -> u8 {
        match self {
            Self::Right => 0,
            Self::Down => 1,
            Self::Left => 2,
            Self::Up => 3,
        }
    }
}

/// Shape transformation applied by a `Turn` instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnMode {
    /// Code 1, shown to authors as "rotate right": `new[y][x] = old[x][y]`.
    Transpose,
    /// Code 2: reverse every row.
    MirrorHorizontal,
    /// Code 3, shown to authors as "rotate left": `new[y][x] = old[4-x][4-y]`.
    AntiTranspose,
}

impl TurnMode {
    /// Decode a wire mode code. Returns `None` outside `1..=3`.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Transpose),
            2 => Some(Self::MirrorHorizontal),
            3 => Some(Self::AntiTranspose),
            _ => None,
        }
    }

    /// The wire code for this mode.
    pub const fn code(self) -> u8 {
        match self {
            Self::Transpose => 1,
            Self::MirrorHorizontal => 2,
            Self::AntiTranspose => 3,
        }
    }
}

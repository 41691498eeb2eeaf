//! Authoring-side structures: templates, placements, and projects.
//!
//! These are read-only inputs to the engine. The authoring layer builds
//! them; the engine never mutates them once a session has started.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::ColorToken;
use crate::ids::TemplateId;
use crate::script::ScriptSet;
use crate::shape::Shape;

/// An absolute grid position. Rows grow downward, columns to the right.
///
/// Coordinates are signed: scripts may move an entity off the grid and
/// back again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Position {
    /// Row coordinate.
    pub row: i32,
    /// Column coordinate.
    pub col: i32,
}

impl Position {
    /// Create a position from row and column.
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Offset this position by a shape-local cell, saturating at the
    /// `i32` range.
    #[must_use]
    pub fn offset(self, row: usize, col: usize) -> Self {
        let dr = i32::try_from(row).unwrap_or(i32::MAX);
        let dc = i32::try_from(col).unwrap_or(i32::MAX);
        Self {
            row: self.row.saturating_add(dr),
            col: self.col.saturating_add(dc),
        }
    }
}

/// An authored sprite: a name and a shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Template {
    /// Human-readable sprite name.
    pub name: String,
    /// Visual template.
    pub shape: Shape,
}

/// A template placed into a project with its own scripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlacedTemplate {
    /// Identity assigned by the authoring layer.
    pub id: TemplateId,
    /// The sprite being placed.
    pub template: Template,
    /// Where the entity starts.
    #[serde(default)]
    pub anchor: Position,
    /// Scripts attached to this placement.
    ///
    /// Shared read-only by every runtime entity derived from the placement,
    /// including duplicates.
    #[serde(default)]
    pub scripts: Arc<ScriptSet>,
}

impl PlacedTemplate {
    /// Place a template at an anchor with the given scripts.
    pub fn new(id: TemplateId, template: Template, anchor: Position, scripts: ScriptSet) -> Self {
        Self {
            id,
            template,
            anchor,
            scripts: Arc::new(scripts),
        }
    }
}

/// A complete authored project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Project {
    /// Project name.
    pub name: String,
    /// Background color used by static previews.
    #[serde(default = "default_background")]
    pub background: ColorToken,
    /// Placements in registration (paint) order.
    #[serde(default)]
    pub placements: Vec<PlacedTemplate>,
}

impl Project {
    /// Create an empty project.
    pub fn new(name: impl Into<String>, background: ColorToken) -> Self {
        Self {
            name: name.into(),
            background,
            placements: Vec::new(),
        }
    }

    /// Append a placement. Later placements paint over earlier ones.
    pub fn place(&mut self, placement: PlacedTemplate) {
        self.placements.push(placement);
    }

    /// Parse a project from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] if the document is not a
    /// valid project (including shapes that are not exactly 5x5).
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

const fn default_background() -> ColorToken {
    ColorToken::Black
}

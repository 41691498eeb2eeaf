//! Composed output grids.
//!
//! A [`Scene`] is the fixed 27x14 token grid produced once per tick. It has
//! no identity across ticks; the compositor builds a fresh one every time.
//! A [`Frame`] stamps a scene with the session and tick it belongs to.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::ColorToken;
use crate::ids::SessionId;
use crate::project::Position;

/// Number of columns in a scene.
pub const SCENE_WIDTH: usize = 27;

/// Number of rows in a scene.
pub const SCENE_HEIGHT: usize = 14;

/// A 27-column by 14-row grid of color tokens, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Scene {
    /// Row-major cells, `SCENE_WIDTH * SCENE_HEIGHT` long.
    cells: Vec<ColorToken>,
}

impl Scene {
    /// A scene with every cell set to `fill`.
    pub fn filled(fill: ColorToken) -> Self {
        Self {
            cells: vec![fill; SCENE_WIDTH.saturating_mul(SCENE_HEIGHT)],
        }
    }

    /// Map a signed position to a cell index, or `None` when it falls
    /// outside the grid.
    fn index_of(pos: Position) -> Option<usize> {
        let row = usize::try_from(pos.row).ok()?;
        let col = usize::try_from(pos.col).ok()?;
        if row >= SCENE_HEIGHT || col >= SCENE_WIDTH {
            return None;
        }
        row.checked_mul(SCENE_WIDTH)?.checked_add(col)
    }

    /// Read one cell. Returns `None` outside the grid.
    pub fn get(&self, pos: Position) -> Option<ColorToken> {
        Self::index_of(pos).and_then(|idx| self.cells.get(idx).copied())
    }

    /// Overwrite one cell. Out-of-bounds writes are dropped and reported
    /// as `false`.
    pub fn paint(&mut self, pos: Position, token: ColorToken) -> bool {
        match Self::index_of(pos).and_then(|idx| self.cells.get_mut(idx)) {
            Some(cell) => {
                *cell = token;
                true
            }
            None => false,
        }
    }

    /// Iterate over rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[ColorToken]> {
        self.cells.chunks(SCENE_WIDTH)
    }

    /// Count cells holding `token`.
    pub fn count(&self, token: ColorToken) -> usize {
        self.cells.iter().filter(|&&c| c == token).count()
    }

    /// Render the scene as glyph text, one line per row.
    pub fn to_glyphs(&self) -> String {
        self.rows()
            .map(|row| row.iter().map(|token| token.glyph()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::filled(ColorToken::Black)
    }
}

/// One composed frame delivered to a presenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Frame {
    /// Session that produced the frame.
    pub session_id: SessionId,
    /// Tick the frame was composed at.
    pub tick: u64,
    /// The composed grid.
    pub scene: Scene,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_scene_has_fixed_dimensions() {
        let scene = Scene::filled(ColorToken::Black);
        assert_eq!(scene.rows().count(), SCENE_HEIGHT);
        assert!(scene.rows().all(|r| r.len() == SCENE_WIDTH));
        assert_eq!(scene.count(ColorToken::Black), SCENE_WIDTH.saturating_mul(SCENE_HEIGHT));
    }

    #[test]
    fn paint_and_get_round_trip() {
        let mut scene = Scene::filled(ColorToken::Black);
        assert!(scene.paint(Position::new(13, 26), ColorToken::Red));
        assert_eq!(scene.get(Position::new(13, 26)), Some(ColorToken::Red));
        assert_eq!(scene.count(ColorToken::Red), 1);
    }

    #[test]
    fn out_of_bounds_paint_is_dropped() {
        let mut scene = Scene::filled(ColorToken::Black);
        for pos in [
            Position::new(-1, 0),
            Position::new(0, -1),
            Position::new(14, 0),
            Position::new(0, 27),
        ] {
            assert!(!scene.paint(pos, ColorToken::Red));
            assert_eq!(scene.get(pos), None);
        }
        assert_eq!(scene.count(ColorToken::Red), 0);
    }

    #[test]
    fn glyph_text_has_one_line_per_row() {
        let scene = Scene::filled(ColorToken::White);
        let text = scene.to_glyphs();
        assert_eq!(text.lines().count(), SCENE_HEIGHT);
        assert!(text.lines().all(|l| l.chars().count() == SCENE_WIDTH));
    }
}

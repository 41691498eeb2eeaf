//! The fixed 5x5 sprite shape and its orientation transforms.
//!
//! A [`Shape`] is backed by a fixed-size array, so its dimensions are a
//! type-level invariant: every transform returns a new 5x5 shape and
//! deserialization rejects anything that is not exactly 5 rows of 5 cells.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ColorToken, TurnMode};

/// Width and height of every sprite shape.
pub const SHAPE_SIZE: usize = 5;

/// Index of the last row or column of a shape.
const LAST: usize = SHAPE_SIZE.saturating_sub(1);

/// A 5x5 grid of color tokens, indexed `[row][col]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Shape(pub [[ColorToken; SHAPE_SIZE]; SHAPE_SIZE]);

impl Shape {
    /// A fully transparent shape.
    pub const fn blank() -> Self {
        Self([[ColorToken::Blank; SHAPE_SIZE]; SHAPE_SIZE])
    }

    /// Build a shape from explicit rows.
    pub const fn from_rows(rows: [[ColorToken; SHAPE_SIZE]; SHAPE_SIZE]) -> Self {
        Self(rows)
    }

    /// Read one cell. Out-of-range coordinates read as blank.
    pub fn cell(&self, row: usize, col: usize) -> ColorToken {
        self.0
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or_default()
    }

    /// Write one cell. Returns `false` (and changes nothing) when the
    /// coordinates fall outside the shape.
    pub fn set_cell(&mut self, row: usize, col: usize, token: ColorToken) -> bool {
        match self.0.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = token;
                true
            }
            None => false,
        }
    }

    /// Borrow the rows.
    pub const fn rows(&self) -> &[[ColorToken; SHAPE_SIZE]; SHAPE_SIZE] {
        &self.0
    }

    /// `new[y][x] = old[x][y]`.
    #[must_use]
    pub fn transposed(&self) -> Self {
        Self(std::array::from_fn(|y| {
            std::array::from_fn(|x| self.cell(x, y))
        }))
    }

    /// Every row reversed left to right.
    #[must_use]
    pub fn mirrored_horizontal(&self) -> Self {
        let mut rows = self.0;
        for row in &mut rows {
            row.reverse();
        }
        Self(rows)
    }

    /// `new[y][x] = old[4-x][4-y]`: reflection across the anti-diagonal.
    #[must_use]
    pub fn anti_transposed(&self) -> Self {
        Self(std::array::from_fn(|y| {
            std::array::from_fn(|x| self.cell(LAST.saturating_sub(x), LAST.saturating_sub(y)))
        }))
    }

    /// Apply the transform selected by a `Turn` instruction.
    #[must_use]
    pub fn turned(&self, mode: TurnMode) -> Self {
        match mode {
            TurnMode::Transpose => self.transposed(),
            TurnMode::MirrorHorizontal => self.mirrored_horizontal(),
            TurnMode::AntiTranspose => self.anti_transposed(),
        }
    }

    /// Iterate `(row, col, token)` over every non-blank cell, row-major.
    pub fn painted_cells(&self) -> impl Iterator<Item = (usize, usize, ColorToken)> + '_ {
        self.0.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, token)| !token.is_blank())
                .map(move |(col, token)| (row, col, *token))
        })
    }

    /// Whether every cell is blank.
    pub fn is_blank(&self) -> bool {
        self.painted_cells().next().is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// A shape with no symmetry, so any transform is observable.
    fn distinct_shape() -> Shape {
        Shape(std::array::from_fn(|row| {
            std::array::from_fn(|col| {
                let idx = row.saturating_mul(SHAPE_SIZE).saturating_add(col);
                ColorToken::ALL
                    .get(idx.checked_rem(ColorToken::ALL.len()).unwrap_or(0))
                    .copied()
                    .unwrap_or_default()
            })
        }))
    }

    fn corner_shape() -> Shape {
        let mut shape = Shape::blank();
        shape.set_cell(0, 1, ColorToken::Red);
        shape.set_cell(3, 4, ColorToken::Blue);
        shape
    }

    #[test]
    fn transpose_swaps_axes() {
        let turned = corner_shape().transposed();
        assert_eq!(turned.cell(1, 0), ColorToken::Red);
        assert_eq!(turned.cell(4, 3), ColorToken::Blue);
        assert_eq!(turned.cell(0, 1), ColorToken::Blank);
    }

    #[test]
    fn mirror_reverses_rows() {
        let turned = corner_shape().mirrored_horizontal();
        assert_eq!(turned.cell(0, 3), ColorToken::Red);
        assert_eq!(turned.cell(3, 0), ColorToken::Blue);
    }

    #[test]
    fn anti_transpose_reflects_across_anti_diagonal() {
        // new[y][x] = old[4-x][4-y]; old(0,1) lands at y=3, x=4.
        let turned = corner_shape().anti_transposed();
        assert_eq!(turned.cell(3, 4), ColorToken::Red);
        // old(3,4) lands at y=0, x=1.
        assert_eq!(turned.cell(0, 1), ColorToken::Blue);
    }

    #[test]
    fn identity_laws_hold() {
        let original = distinct_shape();

        let mut shape = original;
        for _ in 0..4 {
            shape = shape.turned(TurnMode::Transpose);
        }
        assert_eq!(shape, original);

        let mut shape = original;
        for _ in 0..4 {
            shape = shape.turned(TurnMode::AntiTranspose);
        }
        assert_eq!(shape, original);

        let mut shape = original;
        for _ in 0..2 {
            shape = shape.turned(TurnMode::MirrorHorizontal);
        }
        assert_eq!(shape, original);
    }

    #[test]
    fn every_turn_sequence_keeps_dimensions_and_cells() {
        let modes = [
            TurnMode::Transpose,
            TurnMode::MirrorHorizontal,
            TurnMode::AntiTranspose,
        ];
        let original = distinct_shape();
        let painted_before = original.painted_cells().count();

        // All sequences of length 4 over the three modes.
        for a in modes {
            for b in modes {
                for c in modes {
                    for d in modes {
                        let shape = original.turned(a).turned(b).turned(c).turned(d);
                        assert_eq!(shape.rows().len(), SHAPE_SIZE);
                        assert!(shape.rows().iter().all(|r| r.len() == SHAPE_SIZE));
                        assert_eq!(shape.painted_cells().count(), painted_before);
                    }
                }
            }
        }
    }

    #[test]
    fn out_of_range_cells_are_ignored() {
        let mut shape = Shape::blank();
        assert!(!shape.set_cell(5, 0, ColorToken::Red));
        assert_eq!(shape.cell(0, 9), ColorToken::Blank);
        assert!(shape.is_blank());
    }

    #[test]
    fn painted_cells_skip_blank() {
        let cells: Vec<_> = corner_shape().painted_cells().collect();
        assert_eq!(
            cells,
            vec![(0, 1, ColorToken::Red), (3, 4, ColorToken::Blue)]
        );
    }

    #[test]
    fn deserialize_rejects_wrong_dimensions() {
        let four_rows = r#"[["red","red","red","red","red"],
            ["red","red","red","red","red"],
            ["red","red","red","red","red"],
            ["red","red","red","red","red"]]"#;
        assert!(serde_json::from_str::<Shape>(four_rows).is_err());

        let json = serde_json::to_string(&corner_shape()).unwrap();
        let back: Shape = serde_json::from_str(&json).unwrap();
        assert_eq!(back, corner_shape());
    }
}

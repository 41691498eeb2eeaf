//! Frame compositor.
//!
//! Composition is a pure function of the entity list: fill the grid with
//! the background, then paint every visible entity's non-blank cells in
//! registration order. Later entities overwrite earlier ones; blank cells
//! never overwrite anything; cells that fall outside the grid are dropped.

use pixelscript_types::{ColorToken, Position, Project, Scene, Shape};

use crate::dispatch::RuntimeEntity;

/// Paint one shape onto `scene` with its top-left cell at `anchor`.
///
/// Returns the number of non-blank cells that fell outside the grid.
pub fn paint_shape(scene: &mut Scene, anchor: Position, shape: &Shape) -> usize {
    shape
        .painted_cells()
        .filter(|&(row, col, token)| !scene.paint(anchor.offset(row, col), token))
        .count()
}

/// Compose the live entity list into a fresh scene.
pub fn compose(entities: &[RuntimeEntity], fill: ColorToken) -> Scene {
    let mut scene = Scene::filled(fill);
    for entity in entities.iter().filter(|e| e.is_visible()) {
        paint_shape(&mut scene, entity.position(), entity.shape());
    }
    scene
}

/// Static preview of a project before any script runs.
///
/// Uses the project's own background and paints every placement at its
/// anchor with its authored shape.
pub fn preview(project: &Project) -> Scene {
    let mut scene = Scene::filled(project.background);
    for placement in &project.placements {
        paint_shape(&mut scene, placement.anchor, &placement.template.shape);
    }
    scene
}

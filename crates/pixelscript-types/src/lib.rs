//! Shared type definitions for the Pixelscript sprite simulation.
//!
//! This crate is the single source of truth for the data model used across
//! the Pixelscript workspace. Types defined here flow downstream to
//! `TypeScript` via `ts-rs` so a presentation front-end can consume frames.
//!
//! # Modules
//!
//! - [`ids`] -- Session, template, and entity identifiers
//! - [`enums`] -- Color palette, hooks, decoded instruction operands
//! - [`shape`] -- The fixed 5x5 sprite shape and its transforms
//! - [`script`] -- Instructions and per-hook instruction lists
//! - [`project`] -- Templates, placements, and projects
//! - [`scene`] -- Composed 27x14 scenes and frames

pub mod enums;
pub mod ids;
pub mod project;
pub mod scene;
pub mod script;
pub mod shape;

// Re-export all public types at crate root for convenience.
pub use enums::{ColorToken, Direction, Hook, TurnMode};
pub use ids::{EntityId, SessionId, TemplateId};
pub use project::{PlacedTemplate, Position, Project, Template};
pub use scene::{Frame, SCENE_HEIGHT, SCENE_WIDTH, Scene};
pub use script::{Command, ScriptSet};
pub use shape::{SHAPE_SIZE, Shape};

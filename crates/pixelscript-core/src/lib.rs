//! Session clock, script dispatcher, tick cycle, and compositor for the
//! Pixelscript sprite simulation.
//!
//! A project is a read-only set of placed templates with scripts. Starting
//! a session turns each placement into a live entity; every tick the
//! entities run their scripts and the compositor paints them into a fresh
//! 27x14 frame.
//!
//! # Modules
//!
//! - [`clock`] -- Session tick counter with checked arithmetic.
//! - [`compose`] -- Pure frame compositor and static project preview.
//! - [`config`] -- Configuration loading from `pixelscript-config.yaml` into
//!   strongly-typed structs.
//! - [`control`] -- Stop flag, [`StopHandle`], and end reasons.
//! - [`dispatch`] -- Per-entity instruction dispatcher and wait resumption.
//! - [`runner`] -- Async session loop and the [`FramePresenter`] seam.
//! - [`session`] -- Session construction and synchronous stepping.
//! - [`tick`] -- The phased tick cycle.
//!
//! [`StopHandle`]: control::StopHandle
//! [`FramePresenter`]: runner::FramePresenter

pub mod clock;
pub mod compose;
pub mod config;
pub mod control;
pub mod dispatch;
pub mod runner;
pub mod session;
pub mod tick;

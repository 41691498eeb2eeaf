//! Frame presenter that writes glyph grids to a text sink.
//!
//! Each frame is written as a header line followed by 14 rows of emoji
//! glyphs. The sink is generic so tests can capture output in memory.

use std::io::Write;

use pixelscript_core::runner::FramePresenter;
use pixelscript_types::{Frame, Scene};
use tracing::{debug, warn};

/// Writes every frame to `out`.
pub struct TerminalPresenter<W> {
    out: W,
    print_frames: bool,
}

impl<W: Write + Send> TerminalPresenter<W> {
    /// Create a presenter. With `print_frames` off, frames are only logged.
    pub const fn new(out: W, print_frames: bool) -> Self {
        Self { out, print_frames }
    }

    /// Write the static project preview shown before the session starts.
    pub fn write_preview(&mut self, project_name: &str, scene: &Scene) {
        if !self.print_frames {
            return;
        }
        let result = writeln!(self.out, "== {project_name} (preview) ==")
            .and_then(|()| writeln!(self.out, "{}", scene.to_glyphs()))
            .and_then(|()| self.out.flush());
        if let Err(e) = result {
            warn!(error = %e, "Failed to write preview");
        }
    }
}

impl<W: Write + Send> FramePresenter for TerminalPresenter<W> {
    fn on_frame(&mut self, frame: &Frame) {
        debug!(session_id = %frame.session_id, tick = frame.tick, "Frame ready");
        if !self.print_frames {
            return;
        }
        let result = writeln!(self.out, "== tick {} ==", frame.tick)
            .and_then(|()| writeln!(self.out, "{}", frame.scene.to_glyphs()))
            .and_then(|()| self.out.flush());
        if let Err(e) = result {
            warn!(tick = frame.tick, error = %e, "Failed to write frame");
        }
    }
}

//! Session loop runner.
//!
//! This module provides [`run_session`], the top-level async function that
//! drives a [`Session`] until it ends:
//!
//! - **Bounded run**: stop after `max_ticks` frames
//! - **Clean stop**: a [`StopHandle`] ends the session before its next tick
//! - **Paced output**: after each frame the runner waits up to
//!   `stop_poll_ms` for a stop request before ticking again
//!
//! Frames go to a [`FramePresenter`], the seam where a terminal printer,
//! chat bot, or test collector plugs in.
//!
//! [`StopHandle`]: crate::control::StopHandle

use pixelscript_types::Frame;
use tracing::{info, warn};

use crate::control::SessionEndReason;
use crate::session::Session;
use crate::tick::TickError;

/// Errors that can occur during the session run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Result of a session run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResult {
    /// The reason the session ended.
    pub end_reason: SessionEndReason,
    /// Number of frames handed to the presenter.
    pub frames_emitted: u64,
    /// Last tick that ran (0 if none did).
    pub final_tick: u64,
}

/// Receives every frame a session produces, in tick order.
pub trait FramePresenter: Send {
    /// Called once per completed tick.
    fn on_frame(&mut self, frame: &Frame);
}

/// A presenter that discards frames.
pub struct NoOpPresenter;

impl FramePresenter for NoOpPresenter {
    fn on_frame(&mut self, _frame: &Frame) {}
}

/// A presenter that keeps every frame in memory.
#[derive(Debug, Default)]
pub struct CollectingPresenter {
    /// Frames received so far.
    pub frames: Vec<Frame>,
}

impl CollectingPresenter {
    /// Create an empty collector.
    pub const fn new() -> Self {
        Self { frames: Vec::new() }
    }
}

impl FramePresenter for CollectingPresenter {
    fn on_frame(&mut self, frame: &Frame) {
        self.frames.push(frame.clone());
    }
}

/// Run the session loop until the session ends.
///
/// Each iteration checks for a stop, runs one tick, hands the frame to
/// `presenter`, then waits up to the configured `stop_poll_ms` for a stop
/// request. No wait follows the final frame.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick execution fails unrecoverably.
pub async fn run_session(
    session: &mut Session,
    presenter: &mut dyn FramePresenter,
) -> Result<SessionResult, RunnerError> {
    let control = std::sync::Arc::clone(session.control());
    let mut frames_emitted: u64 = 0;

    info!(
        session_id = %session.id(),
        max_ticks = control.max_ticks(),
        stop_poll_ms = u64::try_from(control.stop_poll().as_millis()).unwrap_or(u64::MAX),
        "Session loop starting"
    );

    while let Some(summary) = session.step()? {
        frames_emitted = frames_emitted.saturating_add(1);
        presenter.on_frame(&summary.frame);

        if !session.is_running() {
            break;
        }

        if control.wait_for_stop(control.stop_poll()).await {
            info!(
                session_id = %session.id(),
                tick = summary.tick,
                "Stop received during frame wait"
            );
        }
    }

    Ok(SessionResult {
        end_reason: session.end_reason().unwrap_or(SessionEndReason::Stopped),
        frames_emitted,
        final_tick: session.tick(),
    })
}

/// Log the session end sequence.
pub fn log_session_end(result: &SessionResult) {
    info!(
        reason = ?result.end_reason,
        frames_emitted = result.frames_emitted,
        final_tick = result.final_tick,
        "Session ended"
    );

    if result.frames_emitted == 0 {
        warn!("Session ended with no frames emitted");
    }
}

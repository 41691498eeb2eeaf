//! Simulation sessions.
//!
//! A [`Session`] owns everything one play-through needs: its identifier,
//! control state, and the [`SimulationState`] the tick cycle mutates.
//! Sessions are independent; two sessions over the same project share only
//! the read-only `Arc<Project>`.
//!
//! A session is either running or ended. [`Session::step`] runs one tick
//! while running and returns `None` once the session has ended, so callers
//! that want to pull frames synchronously can drive it without the async
//! runner.

use std::sync::Arc;

use pixelscript_types::{Frame, Project, Scene, SessionId};
use tracing::info;

use crate::config::SimulationConfig;
use crate::control::{SessionControl, SessionEndReason, StopHandle};
use crate::tick::{self, SimulationState, TickError, TickSettings, TickSummary};

/// One independent run of a project.
#[derive(Debug)]
pub struct Session {
    /// Session identifier.
    id: SessionId,
    /// Stop flag and bounds shared with [`StopHandle`]s.
    control: Arc<SessionControl>,
    /// State mutated by the tick cycle.
    state: SimulationState,
    /// Set once the session has ended.
    end_reason: Option<SessionEndReason>,
}

/// Start a new session for `project`.
///
/// Builds one entity per placement and runs every `OnStart` hook. The
/// returned session is at tick 0 and has not produced any frame yet.
pub fn start(project: impl Into<Arc<Project>>, config: &SimulationConfig) -> Session {
    let project = project.into();
    let id = SessionId::new();
    let settings = TickSettings::resolve(config, &project);
    let control = Arc::new(SessionControl::new(&config.simulation));
    let state = SimulationState::new(id, Arc::clone(&project), settings);

    info!(
        session_id = %id,
        project = %project.name,
        placements = project.placements.len(),
        entities = state.entities.len(),
        wait_policy = ?settings.wait_policy,
        max_ticks = control.max_ticks(),
        started_at = %control.started_at(),
        "Session started"
    );

    Session {
        id,
        control,
        state,
        end_reason: None,
    }
}

impl Session {
    /// Run one tick.
    ///
    /// Returns `Ok(None)` without ticking if the session has already ended
    /// or a stop has been requested. After the tick that reaches
    /// `max_ticks`, the session ends with
    /// [`SessionEndReason::TickBudgetExhausted`].
    ///
    /// # Errors
    ///
    /// Returns [`TickError`] if the tick cycle fails.
    pub fn step(&mut self) -> Result<Option<TickSummary>, TickError> {
        if self.end_reason.is_some() {
            return Ok(None);
        }
        if self.control.is_stop_requested() {
            info!(session_id = %self.id, tick = self.tick(), "Stop requested");
            self.end_reason = Some(SessionEndReason::Stopped);
            return Ok(None);
        }

        let summary = tick::run_tick(&mut self.state)?;

        if self.control.tick_limit_reached(summary.tick) {
            info!(
                session_id = %self.id,
                tick = summary.tick,
                max_ticks = self.control.max_ticks(),
                "Tick limit reached"
            );
            self.end_reason = Some(SessionEndReason::TickBudgetExhausted);
        }

        Ok(Some(summary))
    }

    /// A handle that stops this session from any task or thread.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle::new(Arc::clone(&self.control))
    }

    /// Request a stop directly.
    pub fn stop(&self) {
        self.control.request_stop();
    }

    /// Shared control state.
    pub const fn control(&self) -> &Arc<SessionControl> {
        &self.control
    }

    /// Session identifier.
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// The project being simulated.
    pub fn project(&self) -> &Project {
        &self.state.project
    }

    /// Current tick (0 before the first step).
    pub const fn tick(&self) -> u64 {
        self.state.clock.tick()
    }

    /// Whether the session can still produce frames.
    pub const fn is_running(&self) -> bool {
        self.end_reason.is_none()
    }

    /// Why the session ended, if it has.
    pub const fn end_reason(&self) -> Option<SessionEndReason> {
        self.end_reason
    }

    /// Compose the current entity list without ticking.
    ///
    /// Before the first step this is the tick-0 scene, with every `OnStart`
    /// hook already applied.
    pub fn current_scene(&self) -> Scene {
        self.state.compose()
    }

    /// The current scene stamped with this session and the current tick.
    pub fn current_frame(&self) -> Frame {
        self.state.current_frame()
    }

    /// Read-only view of the tick-cycle state.
    pub const fn state(&self) -> &SimulationState {
        &self.state
    }
}

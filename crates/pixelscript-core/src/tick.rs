//! Tick cycle: the phased loop that drives one Pixelscript session.
//!
//! Each tick runs through these phases:
//!
//! 1. **Clock** -- advance the session clock.
//!
//! 2. **Materialize** -- turn the spawn requests collected during the
//!    previous tick into entities, appended in request order. Each new
//!    entity runs `OnDuplicate` at its own tick 0. Requests beyond the
//!    entity cap are dropped.
//!
//! 3. **Dispatch** -- advance every entity that existed at the start of
//!    the phase, in registration order. Entities created by this tick's
//!    `Duplicate` instructions do not exist yet.
//!
//! 4. **Compose** -- paint the entity list into a fresh [`Scene`] and
//!    stamp it as a [`Frame`].
//!
//! Given the same project and configuration, the sequence of frames is
//! fully deterministic.

use std::sync::Arc;

use pixelscript_types::{ColorToken, EntityId, Frame, Project, Scene, SessionId};
use tracing::{debug, warn};

use crate::clock::SessionClock;
use crate::compose;
use crate::config::{SimulationConfig, WaitPolicy};
use crate::dispatch::{DispatchStats, RuntimeEntity, SpawnRequest};

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: crate::clock::ClockError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// The composed frame for this tick.
    pub frame: Frame,
    /// Number of entities alive at the end of the tick.
    pub entity_count: u32,
    /// Entities materialized from spawn requests this tick.
    pub spawned: u32,
    /// Spawn requests dropped because the entity cap was reached.
    pub dropped_spawns: u32,
    /// Spawn requests queued for the next tick.
    pub queued_spawns: u32,
    /// Aggregate dispatch counters.
    pub dispatch: DispatchStats,
}

/// Settings the tick cycle reads on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSettings {
    /// Semantics of `Wait`.
    pub wait_policy: WaitPolicy,
    /// Upper bound on live entities.
    pub max_entities: u32,
    /// Background token for live frames.
    pub fill: ColorToken,
}

impl TickSettings {
    /// Resolve settings for one project from the loaded configuration.
    pub const fn resolve(config: &SimulationConfig, project: &Project) -> Self {
        Self {
            wait_policy: config.scripting.wait_policy,
            max_entities: config.simulation.max_entities,
            fill: config.compositor.fill_for(project.background),
        }
    }
}

/// The mutable state of one session, passed through the tick cycle.
#[derive(Debug)]
pub struct SimulationState {
    /// Session this state belongs to.
    pub session_id: SessionId,
    /// The session clock.
    pub clock: SessionClock,
    /// The project being simulated. Read-only for the whole session.
    pub project: Arc<Project>,
    /// Live entities in registration order. Entities are never removed.
    pub entities: Vec<RuntimeEntity>,
    /// Spawn requests waiting for the next Materialize phase.
    pub pending_spawns: Vec<SpawnRequest>,
    /// Tick settings.
    pub settings: TickSettings,
}

impl SimulationState {
    /// Build the initial state: one entity per placement, in placement
    /// order, each having run its `OnStart` hook.
    ///
    /// Placements are never subject to `max_entities`; the cap only limits
    /// spawn requests.
    pub fn new(session_id: SessionId, project: Arc<Project>, settings: TickSettings) -> Self {
        let mut entities = Vec::with_capacity(project.placements.len());
        let mut pending_spawns = Vec::new();
        let mut stats = DispatchStats::default();

        for placement in &project.placements {
            let id = next_entity_id(entities.len());
            let (entity, start_stats) =
                RuntimeEntity::placed(id, placement, settings.wait_policy, &mut pending_spawns);
            stats.merge(start_stats);
            entities.push(entity);
        }

        debug!(
            %session_id,
            entities = entities.len(),
            pending_spawns = pending_spawns.len(),
            skipped = stats.skipped,
            "OnStart hooks complete"
        );

        Self {
            session_id,
            clock: SessionClock::new(),
            project,
            entities,
            pending_spawns,
            settings,
        }
    }

    /// Compose the current entity list without advancing anything.
    pub fn compose(&self) -> Scene {
        compose::compose(&self.entities, self.settings.fill)
    }

    /// The current scene stamped with the current tick.
    pub fn current_frame(&self) -> Frame {
        Frame {
            session_id: self.session_id,
            tick: self.clock.tick(),
            scene: self.compose(),
        }
    }
}

/// Execute one complete tick of the session.
///
/// # Errors
///
/// Returns [`TickError::Clock`] if the tick counter would overflow.
pub fn run_tick(state: &mut SimulationState) -> Result<TickSummary, TickError> {
    // --- Phase 1: Clock ---
    let tick = state.clock.advance()?;

    // --- Phase 2: Materialize ---
    let (spawned, dropped_spawns, mut dispatch) = phase_materialize(state, tick);

    // --- Phase 3: Dispatch ---
    dispatch.merge(phase_dispatch(state));

    // --- Phase 4: Compose ---
    let frame = state.current_frame();

    let entity_count = u32::try_from(state.entities.len()).unwrap_or(u32::MAX);
    let queued_spawns = u32::try_from(state.pending_spawns.len()).unwrap_or(u32::MAX);

    debug!(
        session_id = %state.session_id,
        tick,
        entity_count,
        spawned,
        queued_spawns,
        executed = dispatch.executed,
        skipped = dispatch.skipped,
        "Tick complete"
    );

    Ok(TickSummary {
        tick,
        frame,
        entity_count,
        spawned,
        dropped_spawns,
        queued_spawns,
        dispatch,
    })
}

/// Phase 2: append entities for last tick's spawn requests.
fn phase_materialize(state: &mut SimulationState, tick: u64) -> (u32, u32, DispatchStats) {
    let requests = std::mem::take(&mut state.pending_spawns);
    let mut spawned: u32 = 0;
    let mut dropped: u32 = 0;
    let mut stats = DispatchStats::default();

    for request in requests {
        if !has_room(state.entities.len(), state.settings.max_entities) {
            dropped = dropped.saturating_add(1);
            continue;
        }
        let id = next_entity_id(state.entities.len());
        debug!(
            tick,
            entity = %id,
            origin = %request.origin,
            position = ?request.position,
            "Materializing duplicate"
        );
        let (entity, dup_stats) =
            RuntimeEntity::duplicated(id, request, state.settings.wait_policy);
        stats.merge(dup_stats);
        state.entities.push(entity);
        spawned = spawned.saturating_add(1);
    }

    if dropped > 0 {
        warn!(
            session_id = %state.session_id,
            tick,
            dropped,
            max_entities = state.settings.max_entities,
            "Entity cap reached, spawn requests dropped"
        );
    }

    (spawned, dropped, stats)
}

/// Phase 3: advance each entity in registration order.
fn phase_dispatch(state: &mut SimulationState) -> DispatchStats {
    let policy = state.settings.wait_policy;
    let mut stats = DispatchStats::default();
    for entity in &mut state.entities {
        stats.merge(entity.advance(policy, &mut state.pending_spawns));
    }
    stats
}

fn has_room(len: usize, max_entities: u32) -> bool {
    len < usize::try_from(max_entities).unwrap_or(usize::MAX)
}

fn next_entity_id(len: usize) -> EntityId {
    EntityId(u32::try_from(len).unwrap_or(u32::MAX))
}

//! Per-entity instruction dispatcher.
//!
//! A [`RuntimeEntity`] is one live sprite inside a session. It holds a
//! shared read-only reference to the script set of the placement it came
//! from, plus its own mutable position, shape, visibility, tick counter and
//! queue of pending resumptions.
//!
//! # Execution model
//!
//! - On creation the entity runs its creation hook (`OnStart` for placed
//!   entities, `OnDuplicate` for copies) from the first instruction.
//! - Every tick it advances its own counter, runs every resumption due at
//!   that tick (in the order they were queued), then re-runs `OnTick` from
//!   the top.
//! - Any hook invocation stops at the first `Wait { ticks }`. Under
//!   [`WaitPolicy::Resume`] a [`Resumption`] pointing just past the `Wait`
//!   is queued for `tick + ticks`; under [`WaitPolicy::Truncate`] the rest
//!   of the invocation is dropped.
//! - Invalid instructions are skipped; they never abort the entity.
//! - `Duplicate` never writes to the session directly. It pushes a
//!   [`SpawnRequest`] that the tick cycle materializes on the next tick.
//!   Inside `OnDuplicate` it is suppressed.

use std::collections::BTreeMap;
use std::sync::Arc;

use pixelscript_types::{
    Command, Direction, EntityId, Hook, PlacedTemplate, Position, ScriptSet, Shape, TemplateId,
    TurnMode,
};
use tracing::{debug, trace};

use crate::config::WaitPolicy;

/// A queued continuation of a hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resumption {
    /// Hook to continue.
    pub hook: Hook,
    /// Index of the next instruction to execute.
    pub cursor: usize,
}

/// A request, produced by a `Duplicate` instruction, to add an entity to
/// the session.
#[derive(Debug, Clone)]
pub struct SpawnRequest {
    /// Entity that executed the `Duplicate`.
    pub origin: EntityId,
    /// Placement the origin was derived from.
    pub template_id: TemplateId,
    /// Scripts shared with the origin.
    pub scripts: Arc<ScriptSet>,
    /// Absolute position of the copy.
    pub position: Position,
    /// The origin's shape at the moment of duplication.
    pub shape: Shape,
    /// The origin's visibility at the moment of duplication.
    pub visible: bool,
}

/// How one instruction affected the running hook.
enum Step {
    /// Go on with the next instruction.
    Continue,
    /// Stop the invocation and resume after `ticks` ticks.
    Suspend {
        /// Delay before resuming.
        ticks: u32,
    },
}

/// Counters describing what one dispatch pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Instructions that took effect.
    pub executed: u32,
    /// Invalid instructions skipped as no-ops.
    pub skipped: u32,
    /// `Duplicate` instructions suppressed inside `OnDuplicate`.
    pub suppressed_duplicates: u32,
    /// Spawn requests emitted.
    pub spawn_requests: u32,
}

impl DispatchStats {
    /// Accumulate another pass into this one.
    pub const fn merge(&mut self, other: Self) {
        self.executed = self.executed.saturating_add(other.executed);
        self.skipped = self.skipped.saturating_add(other.skipped);
        self.suppressed_duplicates = self
            .suppressed_duplicates
            .saturating_add(other.suppressed_duplicates);
        self.spawn_requests = self.spawn_requests.saturating_add(other.spawn_requests);
    }
}

/// One live sprite inside a session.
#[derive(Debug, Clone)]
pub struct RuntimeEntity {
    /// Arena slot, equal to registration order.
    id: EntityId,
    /// Placement this entity derives from.
    template_id: TemplateId,
    /// Entity whose `Duplicate` created this one, if any.
    duplicated_from: Option<EntityId>,
    /// Shared scripts.
    scripts: Arc<ScriptSet>,
    /// Current absolute position of the shape's top-left cell.
    position: Position,
    /// Working copy of the shape, after any turns.
    shape: Shape,
    /// Whether the compositor paints this entity.
    visible: bool,
    /// Entity-local tick counter, 0 at creation.
    tick: u64,
    /// Resumptions keyed by the tick they are due at.
    pending: BTreeMap<u64, Vec<Resumption>>,
}

impl RuntimeEntity {
    /// Create the entity for a placement and run its `OnStart` hook.
    ///
    /// Spawn requests emitted by `OnStart` are appended to `spawns`.
    pub fn placed(
        id: EntityId,
        placement: &PlacedTemplate,
        policy: WaitPolicy,
        spawns: &mut Vec<SpawnRequest>,
    ) -> (Self, DispatchStats) {
        let mut entity = Self {
            id,
            template_id: placement.id,
            duplicated_from: None,
            scripts: Arc::clone(&placement.scripts),
            position: placement.anchor,
            shape: placement.template.shape,
            visible: true,
            tick: 0,
            pending: BTreeMap::new(),
        };
        let stats = entity.run_hook(Hook::OnStart, 0, policy, spawns);
        (entity, stats)
    }

    /// Create an entity from a spawn request and run its `OnDuplicate`
    /// hook.
    ///
    /// `Duplicate` is suppressed inside `OnDuplicate`, so this never emits
    /// further spawn requests.
    pub fn duplicated(
        id: EntityId,
        request: SpawnRequest,
        policy: WaitPolicy,
    ) -> (Self, DispatchStats) {
        let mut entity = Self {
            id,
            template_id: request.template_id,
            duplicated_from: Some(request.origin),
            scripts: request.scripts,
            position: request.position,
            shape: request.shape,
            visible: request.visible,
            tick: 0,
            pending: BTreeMap::new(),
        };
        let mut spawns = Vec::new();
        let stats = entity.run_hook(Hook::OnDuplicate, 0, policy, &mut spawns);
        debug_assert!(spawns.is_empty(), "OnDuplicate must not spawn");
        (entity, stats)
    }

    /// Advance the entity by one tick: run due resumptions, then `OnTick`.
    pub fn advance(&mut self, policy: WaitPolicy, spawns: &mut Vec<SpawnRequest>) -> DispatchStats {
        self.tick = self.tick.saturating_add(1);
        let mut stats = DispatchStats::default();

        if let Some(due) = self.pending.remove(&self.tick) {
            trace!(entity = %self.id, tick = self.tick, count = due.len(), "Resuming hooks");
            for resumption in due {
                stats.merge(self.run_hook(resumption.hook, resumption.cursor, policy, spawns));
            }
        }

        stats.merge(self.run_hook(Hook::OnTick, 0, policy, spawns));
        stats
    }

    /// Run `hook` starting at `cursor` until it ends or reaches a `Wait`.
    fn run_hook(
        &mut self,
        hook: Hook,
        cursor: usize,
        policy: WaitPolicy,
        spawns: &mut Vec<SpawnRequest>,
    ) -> DispatchStats {
        let scripts = Arc::clone(&self.scripts);
        let commands = scripts.hook(hook);
        let mut stats = DispatchStats::default();

        for (index, command) in commands.iter().enumerate().skip(cursor) {
            match self.execute(hook, *command, spawns, &mut stats) {
                Step::Continue => {}
                Step::Suspend { ticks } => {
                    let next = index.saturating_add(1);
                    if policy == WaitPolicy::Resume && next < commands.len() {
                        self.schedule(ticks, Resumption { hook, cursor: next });
                    }
                    break;
                }
            }
        }

        stats
    }

    /// Queue a resumption `ticks` ticks from now.
    ///
    /// Resumptions landing on the same tick run in the order they were
    /// queued.
    fn schedule(&mut self, ticks: u32, resumption: Resumption) {
        let due = self.tick.saturating_add(u64::from(ticks));
        trace!(
            entity = %self.id,
            hook = ?resumption.hook,
            cursor = resumption.cursor,
            due,
            "Scheduled resumption"
        );
        self.pending.entry(due).or_default().push(resumption);
    }

    /// Apply one instruction.
    fn execute(
        &mut self,
        hook: Hook,
        command: Command,
        spawns: &mut Vec<SpawnRequest>,
        stats: &mut DispatchStats,
    ) -> Step {
        match command {
            Command::Move { direction, distance } => {
                if let Some(dir) = Direction::from_code(direction) {
                    self.move_by(dir, distance);
                    stats.executed = stats.executed.saturating_add(1);
                } else {
                    self.skip(hook, command, stats);
                }
            }
            Command::MoveTo { row, col } => {
                self.position = Position::new(row, col);
                stats.executed = stats.executed.saturating_add(1);
            }
            Command::Turn { mode } => {
                if let Some(mode) = TurnMode::from_code(mode) {
                    self.shape = self.shape.turned(mode);
                    stats.executed = stats.executed.saturating_add(1);
                } else {
                    self.skip(hook, command, stats);
                }
            }
            Command::SetHidden { flag } => {
                self.visible = !flag;
                stats.executed = stats.executed.saturating_add(1);
            }
            Command::Wait { ticks } => {
                if ticks == 0 {
                    self.skip(hook, command, stats);
                } else {
                    stats.executed = stats.executed.saturating_add(1);
                    return Step::Suspend { ticks };
                }
            }
            Command::Duplicate { row, col } => {
                if hook == Hook::OnDuplicate {
                    debug!(entity = %self.id, "Duplicate suppressed inside OnDuplicate");
                    stats.suppressed_duplicates = stats.suppressed_duplicates.saturating_add(1);
                } else {
                    spawns.push(SpawnRequest {
                        origin: self.id,
                        template_id: self.template_id,
                        scripts: Arc::clone(&self.scripts),
                        position: Position::new(row, col),
                        shape: self.shape,
                        visible: self.visible,
                    });
                    stats.executed = stats.executed.saturating_add(1);
                    stats.spawn_requests = stats.spawn_requests.saturating_add(1);
                }
            }
            Command::Unknown => self.skip(hook, command, stats),
        }
        Step::Continue
    }

    fn skip(&self, hook: Hook, command: Command, stats: &mut DispatchStats) {
        debug!(entity = %self.id, ?hook, ?command, "Skipping invalid instruction");
        stats.skipped = stats.skipped.saturating_add(1);
    }

    fn move_by(&mut self, direction: Direction, distance: u32) {
        let delta = i32::try_from(distance).unwrap_or(i32::MAX);
        let Position { row, col } = self.position;
        self.position = match direction {
            Direction::Right => Position::new(row, col.saturating_add(delta)),
            Direction::Down => Position::new(row.saturating_add(delta), col),
            Direction::Left => Position::new(row, col.saturating_sub(delta)),
            Direction::Up => Position::new(row.saturating_sub(delta), col),
        };
    }

    /// Arena slot of this entity.
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Placement this entity derives from.
    pub const fn template_id(&self) -> TemplateId {
        self.template_id
    }

    /// Entity that duplicated this one, if any.
    pub const fn duplicated_from(&self) -> Option<EntityId> {
        self.duplicated_from
    }

    /// Current position.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Current working shape.
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Whether the entity is painted.
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Entity-local tick counter.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Shared script set.
    pub fn scripts(&self) -> &ScriptSet {
        &self.scripts
    }

    /// Number of queued resumptions across all future ticks.
    pub fn pending_resumptions(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }
}

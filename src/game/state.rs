//! # Game State Module
//!
//! The play session: the grid handed over by generation, the avatar
//! controller, and the event-driven loop that connects an input source to a
//! render sink.

use crate::game::{AvatarController, ControllerState, MovementPolicy, Position, StepOutcome, TileGrid};
use crate::generation::GeneratedWorld;
use crate::input::InputSource;
use crate::rendering::RenderSink;
use crate::DelveResult;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

/// Counters for a play session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatistics {
    /// Successful steps
    pub steps_taken: u64,
    /// Direction keys refused by the movement policy
    pub blocked_moves: u64,
    /// Keys with no effect
    pub ignored_keys: u64,
}

impl GameStatistics {
    /// Creates new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates statistics from the outcome of one key.
    pub fn update_from_outcome(&mut self, outcome: &StepOutcome) {
        match outcome {
            StepOutcome::Moved { .. } => self.steps_taken += 1,
            StepOutcome::Blocked { .. } => self.blocked_moves += 1,
            StepOutcome::Ignored => self.ignored_keys += 1,
            StepOutcome::Terminated => {}
        }
    }
}

/// What happened on one tick of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No key was available
    NoInput,
    /// One key was consumed
    Step(StepOutcome),
}

/// Final state of a session, printable as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Seed the world was generated from
    pub seed: u64,
    /// Where the avatar ended up
    pub final_position: Position,
    /// Whether the session ended with the quit key
    pub terminated: bool,
    /// Keys consumed
    pub turns: u64,
    /// Session counters
    pub statistics: GameStatistics,
    /// Final grid as ASCII, top row first
    pub grid: String,
}

/// A single play session.
///
/// The session exclusively owns the grid; the only writes after generation
/// come from the avatar controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    grid: TileGrid,
    avatar: AvatarController,
    seed: u64,
    /// Keys consumed so far
    pub turn_number: u64,
    /// Session counters
    pub statistics: GameStatistics,
}

impl GameState {
    /// Creates a session on `grid` with the avatar already marked at `spawn`.
    pub fn new(grid: TileGrid, spawn: Position, seed: u64, policy: MovementPolicy) -> Self {
        Self {
            grid,
            avatar: AvatarController::new(spawn, policy),
            seed,
            turn_number: 0,
            statistics: GameStatistics::new(),
        }
    }

    /// Takes over a generated world.
    pub fn from_world(world: GeneratedWorld, policy: MovementPolicy) -> Self {
        Self::new(world.grid, world.spawn, world.seed, policy)
    }

    /// The current grid.
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// The avatar controller.
    pub fn avatar(&self) -> &AvatarController {
        &self.avatar
    }

    /// Current avatar position.
    pub fn avatar_position(&self) -> Position {
        self.avatar.position()
    }

    /// Seed of the world being played.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Whether the quit key has been received.
    pub fn is_terminated(&self) -> bool {
        self.avatar.is_terminated()
    }

    /// Runs one tick: consumes at most one key and renders if the avatar moved.
    pub fn tick<I, R>(&mut self, input: &mut I, sink: &mut R) -> DelveResult<TickOutcome>
    where
        I: InputSource + ?Sized,
        R: RenderSink + ?Sized,
    {
        if self.is_terminated() {
            return Ok(TickOutcome::Step(StepOutcome::Ignored));
        }

        let Some(key) = input.next_key() else {
            return Ok(TickOutcome::NoInput);
        };

        let outcome = self.avatar.apply(&mut self.grid, key);
        self.turn_number += 1;
        trace!("turn {}: key {:?} -> {:?}", self.turn_number, key, outcome);
        self.statistics.update_from_outcome(&outcome);

        if let ControllerState::Moving { from, to } = self.avatar.state() {
            debug!("turn {}: avatar {} -> {}", self.turn_number, from, to);
            sink.render(&self.grid)?;
            self.avatar.settle();
        }
        if outcome == StepOutcome::Terminated {
            info!("quit received after {} turns", self.turn_number);
        }

        Ok(TickOutcome::Step(outcome))
    }

    /// Renders the opening frame, then ticks until the input runs dry or the
    /// quit key arrives.
    ///
    /// Quitting returns control to the caller; it never exits the process.
    pub fn run<I, R>(&mut self, input: &mut I, sink: &mut R) -> DelveResult<SessionSummary>
    where
        I: InputSource + ?Sized,
        R: RenderSink + ?Sized,
    {
        sink.render(&self.grid)?;
        while input.possible_next_input() && !self.is_terminated() {
            self.tick(input, sink)?;
        }
        Ok(self.summary())
    }

    /// Snapshot of the session so far.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            seed: self.seed,
            final_position: self.avatar.position(),
            terminated: self.is_terminated(),
            turns: self.turn_number,
            statistics: self.statistics.clone(),
            grid: self.grid.to_ascii(),
        }
    }

    /// Gives back the grid.
    pub fn into_grid(self) -> TileGrid {
        self.grid
    }
}

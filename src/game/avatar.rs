//! # Avatar Control
//!
//! The avatar's position and the movement state machine that turns key events
//! into tile writes.

use crate::game::{Direction, Position, Tile, TileGrid};
use crate::input::PlayerInput;
use log::trace;
use serde::{Deserialize, Serialize};

/// Which tiles the avatar may step onto.
///
/// Off-grid targets are refused under every policy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum MovementPolicy {
    /// Only floor tiles
    #[default]
    Walkable,
    /// Any in-bounds tile, walls and empty space included. The tile left
    /// behind always becomes floor, so walking through a wall opens it.
    Unchecked,
}

impl MovementPolicy {
    /// Whether a move onto `target` is allowed.
    pub fn permits(self, grid: &TileGrid, target: Position) -> bool {
        match (self, grid.try_get(target)) {
            (_, None) => false,
            (MovementPolicy::Walkable, Some(tile)) => tile.is_walkable(),
            (MovementPolicy::Unchecked, Some(_)) => true,
        }
    }
}

/// Controller state between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControllerState {
    /// Waiting for the next key
    #[default]
    Idle,
    /// A step was applied and has not been rendered yet
    Moving { from: Position, to: Position },
    /// The quit key was received
    Terminated,
}

/// Result of feeding one key to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// The avatar moved
    Moved { from: Position, to: Position },
    /// A direction key was refused by the movement policy
    Blocked { target: Position },
    /// The key has no meaning, or the session is already over
    Ignored,
    /// The quit key ended the session
    Terminated,
}

/// Owns the avatar position and applies key events to the grid.
///
/// # Examples
///
/// ```
/// use delve::{AvatarController, MovementPolicy, Position, StepOutcome, Tile, TileGrid};
///
/// let mut grid = TileGrid::new(3, 3);
/// grid.fill(Tile::Floor);
/// grid.set(Position::new(1, 1), Tile::Avatar);
///
/// let mut avatar = AvatarController::new(Position::new(1, 1), MovementPolicy::Walkable);
/// let outcome = avatar.apply(&mut grid, 'w');
/// assert_eq!(outcome, StepOutcome::Moved { from: Position::new(1, 1), to: Position::new(1, 2) });
/// assert_eq!(grid.get(Position::new(1, 1)), Tile::Floor);
/// assert_eq!(grid.get(Position::new(1, 2)), Tile::Avatar);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarController {
    position: Position,
    state: ControllerState,
    policy: MovementPolicy,
}

impl AvatarController {
    /// Creates a controller for an avatar standing at `position`.
    pub fn new(position: Position, policy: MovementPolicy) -> Self {
        Self {
            position,
            state: ControllerState::Idle,
            policy,
        }
    }

    /// Current avatar position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Current state.
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Active movement policy.
    pub fn policy(&self) -> MovementPolicy {
        self.policy
    }

    /// Whether the quit key has been received.
    pub fn is_terminated(&self) -> bool {
        self.state == ControllerState::Terminated
    }

    /// Feeds one key character to the state machine.
    pub fn apply(&mut self, grid: &mut TileGrid, key: char) -> StepOutcome {
        if self.is_terminated() {
            return StepOutcome::Ignored;
        }

        match PlayerInput::from_key(key) {
            PlayerInput::Quit => {
                self.state = ControllerState::Terminated;
                StepOutcome::Terminated
            }
            PlayerInput::Move(direction) => self.step(grid, direction),
            PlayerInput::Unknown(_) => {
                trace!("ignoring key {:?}", key);
                StepOutcome::Ignored
            }
        }
    }

    /// Moves one tile in `direction` if the policy allows it.
    pub fn step(&mut self, grid: &mut TileGrid, direction: Direction) -> StepOutcome {
        let from = self.position;
        let delta = direction.to_delta();
        let to = from.shift(delta.x, delta.y);

        if !self.policy.permits(grid, to) {
            trace!("move {:?} from {} blocked", direction, from);
            return StepOutcome::Blocked { target: to };
        }

        grid.set(from, Tile::Floor);
        grid.set(to, Tile::Avatar);
        self.position = to;
        self.state = ControllerState::Moving { from, to };
        StepOutcome::Moved { from, to }
    }

    /// Returns a `Moving` controller to `Idle` once the step has been drawn.
    pub fn settle(&mut self) {
        if let ControllerState::Moving { .. } = self.state {
            self.state = ControllerState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 5x5 floor block surrounded by a wall ring, avatar in the middle.
    fn walled_room() -> (TileGrid, AvatarController) {
        let mut grid = TileGrid::new(7, 7);
        grid.fill(Tile::Wall);
        for y in 1..6 {
            for x in 1..6 {
                grid.set(Position::new(x, y), Tile::Floor);
            }
        }
        let start = Position::new(3, 3);
        grid.set(start, Tile::Avatar);
        (grid, AvatarController::new(start, MovementPolicy::Walkable))
    }

    #[test]
    fn test_key_mapping() {
        let (mut grid, mut avatar) = walled_room();
        let start = avatar.position();

        avatar.apply(&mut grid, 'w');
        assert_eq!(avatar.position(), start.shift(0, 1));
        avatar.apply(&mut grid, 's');
        avatar.apply(&mut grid, 's');
        assert_eq!(avatar.position(), start.shift(0, -1));
        avatar.apply(&mut grid, 'a');
        assert_eq!(avatar.position(), start.shift(-1, -1));
        avatar.apply(&mut grid, 'd');
        avatar.apply(&mut grid, 'd');
        assert_eq!(avatar.position(), start.shift(1, -1));
    }

    #[test]
    fn test_previous_tile_becomes_floor() {
        let (mut grid, mut avatar) = walled_room();
        for key in "wwddss".chars() {
            let before = avatar.position();
            if let StepOutcome::Moved { from, to } = avatar.apply(&mut grid, key) {
                assert_eq!(from, before);
                assert_eq!(grid.get(from), Tile::Floor);
                assert_eq!(grid.get(to), Tile::Avatar);
            }
            assert_eq!(grid.count(Tile::Avatar), 1);
        }
    }

    #[test]
    fn test_walkable_policy_blocks_walls() {
        let (mut grid, mut avatar) = walled_room();
        avatar.apply(&mut grid, 'w');
        avatar.apply(&mut grid, 'w');
        let before = grid.clone();
        let outcome = avatar.apply(&mut grid, 'w');
        assert_eq!(
            outcome,
            StepOutcome::Blocked {
                target: Position::new(3, 6)
            }
        );
        assert_eq!(avatar.position(), Position::new(3, 5));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_unchecked_policy_walks_through_walls() {
        let (mut grid, _) = walled_room();
        let mut avatar = AvatarController::new(Position::new(3, 3), MovementPolicy::Unchecked);
        for _ in 0..3 {
            avatar.apply(&mut grid, 'w');
        }
        assert_eq!(avatar.position(), Position::new(3, 6));
        avatar.apply(&mut grid, 's');
        // The wall tile the avatar stood on is now open floor
        assert_eq!(grid.get(Position::new(3, 6)), Tile::Floor);
    }

    #[test]
    fn test_off_grid_is_refused_under_every_policy() {
        for policy in [MovementPolicy::Walkable, MovementPolicy::Unchecked] {
            let mut grid = TileGrid::new(2, 1);
            grid.fill(Tile::Floor);
            grid.set(Position::new(0, 0), Tile::Avatar);
            let mut avatar = AvatarController::new(Position::new(0, 0), policy);
            assert!(matches!(avatar.apply(&mut grid, 'a'), StepOutcome::Blocked { .. }));
            assert!(matches!(avatar.apply(&mut grid, 'w'), StepOutcome::Blocked { .. }));
            assert_eq!(avatar.position(), Position::new(0, 0));
        }
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let (mut grid, mut avatar) = walled_room();
        let before = grid.clone();
        for key in ['x', ' ', '1', '\n'] {
            assert_eq!(avatar.apply(&mut grid, key), StepOutcome::Ignored);
        }
        assert_eq!(grid, before);
        assert_eq!(avatar.state(), ControllerState::Idle);
    }

    #[test]
    fn test_upper_case_keys_move() {
        let (mut grid, mut avatar) = walled_room();
        assert!(matches!(avatar.apply(&mut grid, 'W'), StepOutcome::Moved { .. }));
        assert_eq!(avatar.position(), Position::new(3, 4));
    }

    #[test]
    fn test_quit_terminates_and_freezes() {
        let (mut grid, mut avatar) = walled_room();
        assert_eq!(avatar.apply(&mut grid, 'q'), StepOutcome::Terminated);
        assert!(avatar.is_terminated());
        let before = grid.clone();
        assert_eq!(avatar.apply(&mut grid, 'w'), StepOutcome::Ignored);
        assert_eq!(grid, before);
        assert_eq!(avatar.state(), ControllerState::Terminated);
    }

    #[test]
    fn test_moving_settles_to_idle() {
        let (mut grid, mut avatar) = walled_room();
        avatar.apply(&mut grid, 'd');
        assert_eq!(
            avatar.state(),
            ControllerState::Moving {
                from: Position::new(3, 3),
                to: Position::new(4, 3)
            }
        );
        avatar.settle();
        assert_eq!(avatar.state(), ControllerState::Idle);

        avatar.apply(&mut grid, 'q');
        avatar.settle();
        assert_eq!(avatar.state(), ControllerState::Terminated);
    }
}

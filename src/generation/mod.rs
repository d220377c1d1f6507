//! # Generation Module
//!
//! Procedural world generation: room placement, hallway routing and avatar
//! spawning.
//!
//! Every step draws from one [`RandomStream`] handed down by the caller, so a
//! seed fully determines the generated world.

pub mod builder;
pub mod hallways;
pub mod random;
pub mod rooms;

pub use builder::*;
pub use hallways::*;
pub use random::*;
pub use rooms::*;

use crate::config::{
    DEFAULT_MAX_SPAWN_ATTEMPTS, DEFAULT_SEED, DEFAULT_WORLD_HEIGHT, DEFAULT_WORLD_WIDTH,
    MAX_WORLD_SIDE, MIN_ROOM_SIDE,
};
use crate::game::Position;
use crate::{DelveError, DelveResult};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::Path;

/// Configuration for world generation.
///
/// All ranges are half-open, matching [`RandomStream::next_int`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Grid width in tiles
    pub width: u32,
    /// Grid height in tiles
    pub height: u32,
    /// Range the number of room candidates is drawn from
    pub room_attempts: Range<u32>,
    /// Range each room's length and width are drawn from, walls excluded
    pub room_size: Range<i32>,
    /// Range of a room anchor's x coordinate
    pub anchor_x: Range<i32>,
    /// Range of a room anchor's y coordinate
    pub anchor_y: Range<i32>,
    /// Random attempts at a spawn tile before falling back to a floor scan
    pub max_spawn_attempts: u32,
    /// How hallway endpoints are drawn while routing
    pub endpoint_selection: EndpointSelection,
}

impl GenerationConfig {
    /// Creates the standard 50x50 configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(42);
    /// assert_eq!(config.seed, 42);
    /// assert!(config.room_size.start >= 3);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            width: DEFAULT_WORLD_WIDTH,
            height: DEFAULT_WORLD_HEIGHT,
            room_attempts: 15..500,
            room_size: MIN_ROOM_SIDE..8,
            anchor_x: 1..38,
            anchor_y: 12..49,
            max_spawn_attempts: DEFAULT_MAX_SPAWN_ATTEMPTS,
            endpoint_selection: EndpointSelection::default(),
        }
    }

    /// Creates a configuration for testing with a smaller grid and fewer rooms.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            room_attempts: 5..40,
            room_size: MIN_ROOM_SIDE..6,
            ..Self::new(seed)
        }
        .with_dimensions(30, 30)
    }

    /// Resizes the grid and re-derives the anchor ranges so that every room
    /// footprint the ranges can produce fits inside it.
    ///
    /// Room sides are capped below the shorter grid side. Grids too small for
    /// any room keep a one-value anchor range on the grid edge; candidates are
    /// still drawn but every one of them is rejected.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        let w = width.min(i32::MAX as u32) as i32;
        let h = height.min(i32::MAX as u32) as i32;
        self.room_size.end = self.room_size.end.min(w.min(h));
        let max_side = self.room_size.end;
        self.width = width;
        self.height = height;
        self.anchor_x = non_empty(1, w.saturating_sub(max_side).saturating_sub(4));
        self.anchor_y = non_empty(max_side.saturating_add(4).min(h - 1), h - 1);
        self
    }

    /// Loads a configuration from a JSON file. Missing fields take their
    /// default values; missing anchor ranges are re-derived from the file's
    /// grid size.
    pub fn from_json_file(path: impl AsRef<Path>) -> DelveResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(text: &str) -> DelveResult<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let mut config: Self = serde_json::from_value(value.clone())?;

        let fitted = config.clone().with_dimensions(config.width, config.height);
        if value.get("anchor_x").is_none() {
            config.anchor_x = fitted.anchor_x;
        }
        if value.get("anchor_y").is_none() {
            config.anchor_y = fitted.anchor_y;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks that every range is usable, the grid is non-empty and bounded,
    /// anchors lie on the grid and room sides stay below the shorter grid side.
    pub fn validate(&self) -> DelveResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(DelveError::InvalidConfig(format!(
                "grid must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > MAX_WORLD_SIDE || self.height > MAX_WORLD_SIDE {
            return Err(DelveError::InvalidConfig(format!(
                "grid sides are limited to {}, got {}x{}",
                MAX_WORLD_SIDE, self.width, self.height
            )));
        }
        if self.room_attempts.start >= self.room_attempts.end {
            return Err(DelveError::InvalidConfig(format!(
                "room_attempts range {:?} is empty",
                self.room_attempts
            )));
        }
        if self.room_size.start < MIN_ROOM_SIDE {
            return Err(DelveError::InvalidConfig(format!(
                "rooms must be at least {} tiles on a side, got {:?}",
                MIN_ROOM_SIDE, self.room_size
            )));
        }
        for (name, range) in [
            ("room_size", &self.room_size),
            ("anchor_x", &self.anchor_x),
            ("anchor_y", &self.anchor_y),
        ] {
            if range.start >= range.end {
                return Err(DelveError::InvalidConfig(format!(
                    "{} range {:?} is empty",
                    name, range
                )));
            }
        }
        let shorter = self.width.min(self.height) as i32;
        if self.room_size.end - 1 >= shorter {
            return Err(DelveError::InvalidConfig(format!(
                "largest room side {} does not fit a {}x{} grid",
                self.room_size.end - 1,
                self.width,
                self.height
            )));
        }
        for (name, range, limit) in [
            ("anchor_x", &self.anchor_x, self.width),
            ("anchor_y", &self.anchor_y, self.height),
        ] {
            if range.start < 0 || range.end > limit as i32 {
                return Err(DelveError::InvalidConfig(format!(
                    "{} range {:?} leaves the {}x{} grid",
                    name, range, self.width, self.height
                )));
            }
        }
        if self.room_attempts.end > i32::MAX as u32 {
            return Err(DelveError::InvalidConfig(
                "room_attempts upper bound does not fit in an i32".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

fn non_empty(lo: i32, hi: i32) -> Range<i32> {
    lo..hi.max(lo + 1)
}

/// A rectangular room.
///
/// The anchor is the top-left interior tile: the interior spans `width`
/// columns east of it and `length` rows south of it. The bordered footprint
/// adds a one-tile wall margin on every side.
///
/// # Examples
///
/// ```
/// use delve::{Position, Room};
///
/// let room = Room::new(Position::new(5, 10), 3, 4);
/// assert!(room.contains(Position::new(8, 8)));
/// assert!(!room.contains(Position::new(9, 8)));
/// assert_eq!(room.interior_positions().len(), 12);
/// assert_eq!(room.footprint_positions().len(), 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    /// Top-left interior tile
    pub anchor: Position,
    /// Interior rows
    pub length: i32,
    /// Interior columns
    pub width: i32,
}

impl Room {
    /// Creates a new room with the given anchor and interior size.
    pub fn new(anchor: Position, length: i32, width: i32) -> Self {
        Self {
            anchor,
            length,
            width,
        }
    }

    /// Westmost interior column.
    pub fn min_x(&self) -> i32 {
        self.anchor.x
    }

    /// Eastmost interior column.
    pub fn max_x(&self) -> i32 {
        self.anchor.x + self.width - 1
    }

    /// Southmost interior row.
    pub fn min_y(&self) -> i32 {
        self.anchor.y - self.length + 1
    }

    /// Northmost interior row.
    pub fn max_y(&self) -> i32 {
        self.anchor.y
    }

    /// Gets the center position of the room.
    pub fn center(&self) -> Position {
        Position::new(
            self.anchor.x + self.width / 2,
            self.anchor.y - self.length / 2,
        )
    }

    /// Checks if a position is an interior tile of this room.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.min_x() && pos.x <= self.max_x() && pos.y >= self.min_y() && pos.y <= self.max_y()
    }

    /// Checks if a position is inside the bordered footprint.
    pub fn footprint_contains(&self, pos: Position) -> bool {
        pos.x >= self.min_x() - 1
            && pos.x <= self.max_x() + 1
            && pos.y >= self.min_y() - 1
            && pos.y <= self.max_y() + 1
    }

    /// Checks if a position is on the wall border.
    pub fn is_border(&self, pos: Position) -> bool {
        self.footprint_contains(pos) && !self.contains(pos)
    }

    /// Checks if the bordered footprints of two rooms share any tile.
    pub fn footprint_overlaps(&self, other: &Room) -> bool {
        !(self.max_x() + 1 < other.min_x() - 1
            || other.max_x() + 1 < self.min_x() - 1
            || self.max_y() + 1 < other.min_y() - 1
            || other.max_y() + 1 < self.min_y() - 1)
    }

    /// Gets all interior positions, north row first.
    pub fn interior_positions(&self) -> Vec<Position> {
        let mut positions = Vec::with_capacity((self.length * self.width) as usize);
        for y in (self.min_y()..=self.max_y()).rev() {
            for x in self.min_x()..=self.max_x() {
                positions.push(Position::new(x, y));
            }
        }
        positions
    }

    /// Gets all positions of the bordered footprint, north row first.
    pub fn footprint_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();
        for y in (self.min_y() - 1..=self.max_y() + 1).rev() {
            for x in self.min_x() - 1..=self.max_x() + 1 {
                positions.push(Position::new(x, y));
            }
        }
        positions
    }

    /// Gets all wall positions of the border.
    pub fn wall_positions(&self) -> Vec<Position> {
        self.footprint_positions()
            .into_iter()
            .filter(|&pos| !self.contains(pos))
            .collect()
    }

    /// Draws a hallway endpoint from the two-by-two block around the center.
    ///
    /// Draws x first, then y.
    pub fn random_interior_point(&self, rng: &mut RandomStream) -> Position {
        let center = self.center();
        let x = rng.next_int(center.x - 1, center.x + 1);
        let y = rng.next_int(center.y - 1, center.y + 1);
        Position::new(x, y)
    }
}

/// Trait for procedural generators.
///
/// Generators take the configuration and the caller's random stream, so a
/// single stream can be threaded through several generators in sequence.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random stream.
    fn generate(&self, config: &GenerationConfig, rng: &mut RandomStream) -> DelveResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> DelveResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

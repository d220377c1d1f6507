//! # Room Placement
//!
//! Proposes rectangular rooms and carves the ones whose bordered footprint lands
//! on untouched ground.

use crate::game::{Position, Tile, TileGrid};
use crate::generation::{GenerationConfig, RandomStream, Room};
use log::{debug, info};
use std::ops::Range;

/// Room proposer and carver.
///
/// A candidate is accepted only if every tile of its bordered footprint is in
/// bounds and still [`Tile::Nothing`]. There is no retry loop here: the caller
/// decides how many candidates to draw, so the number of placed rooms is
/// usually lower than the number of attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomPlanner {
    /// Range of anchor x coordinates
    pub anchor_x: Range<i32>,
    /// Range of anchor y coordinates
    pub anchor_y: Range<i32>,
    /// Range of room lengths and widths
    pub room_size: Range<i32>,
}

impl RoomPlanner {
    /// Creates a planner using the ranges of a generation config.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{GenerationConfig, RandomStream, RoomPlanner};
    ///
    /// let planner = RoomPlanner::from_config(&GenerationConfig::new(1));
    /// let room = planner.propose_room(&mut RandomStream::new(1));
    /// assert!((3..8).contains(&room.length));
    /// ```
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self {
            anchor_x: config.anchor_x.clone(),
            anchor_y: config.anchor_y.clone(),
            room_size: config.room_size.clone(),
        }
    }

    /// Draws a candidate room: anchor x, anchor y, length, width, in that order.
    pub fn propose_room(&self, rng: &mut RandomStream) -> Room {
        let x = rng.next_int(self.anchor_x.start, self.anchor_x.end);
        let y = rng.next_int(self.anchor_y.start, self.anchor_y.end);
        let length = rng.next_int(self.room_size.start, self.room_size.end);
        let width = rng.next_int(self.room_size.start, self.room_size.end);
        Room::new(Position::new(x, y), length, width)
    }

    /// Checks that the whole bordered footprint is in bounds and empty.
    pub fn footprint_is_clear(grid: &TileGrid, room: &Room) -> bool {
        room.footprint_positions()
            .into_iter()
            .all(|pos| grid.try_get(pos) == Some(Tile::Nothing))
    }

    /// Carves `room` if its footprint is clear.
    ///
    /// Returns whether the room was placed. A rejected candidate leaves the
    /// grid untouched.
    pub fn try_place(&self, grid: &mut TileGrid, room: &Room) -> bool {
        if !Self::footprint_is_clear(grid, room) {
            return false;
        }
        Self::carve_room(grid, room);
        true
    }

    /// Writes the wall border and the floor interior of `room`.
    pub fn carve_room(grid: &mut TileGrid, room: &Room) {
        for pos in room.footprint_positions() {
            let tile = if room.contains(pos) {
                Tile::Floor
            } else {
                Tile::Wall
            };
            grid.set(pos, tile);
        }
    }

    /// Proposes and tries `attempts` candidates, returning the accepted rooms
    /// in placement order.
    pub fn plan(&self, grid: &mut TileGrid, rng: &mut RandomStream, attempts: u32) -> Vec<Room> {
        let mut rooms = Vec::new();

        for attempt in 0..attempts {
            let candidate = self.propose_room(rng);
            if self.try_place(grid, &candidate) {
                debug!(
                    "attempt {}: placed {}x{} room at {}",
                    attempt, candidate.width, candidate.length, candidate.anchor
                );
                rooms.push(candidate);
            }
        }

        info!("placed {} of {} room candidates", rooms.len(), attempts);
        rooms
    }
}

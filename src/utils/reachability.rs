//! # Reachability
//!
//! Breadth-first reachability over open tiles, used to check that generation
//! really produced one connected floor plan.

use crate::game::{Position, Tile, TileGrid};
use crate::generation::Room;
use pathfinding::prelude::{bfs, bfs_reach};
use std::collections::HashSet;

/// Tiles a path may cross: floor and the avatar's own tile.
pub fn is_open(tile: Tile) -> bool {
    matches!(tile, Tile::Floor | Tile::Avatar)
}

fn open_neighbours(grid: &TileGrid, pos: Position) -> Vec<Position> {
    pos.cardinal_adjacent_positions()
        .into_iter()
        .filter(|&next| grid.try_get(next).is_some_and(is_open))
        .collect()
}

/// Every open tile reachable from `from` in cardinal steps.
///
/// Returns an empty set if `from` is not open.
pub fn reachable_tiles(grid: &TileGrid, from: Position) -> HashSet<Position> {
    if !grid.try_get(from).is_some_and(is_open) {
        return HashSet::new();
    }
    bfs_reach(from, |&pos| open_neighbours(grid, pos)).collect()
}

/// Shortest cardinal path over open tiles, both ends included.
pub fn open_path(grid: &TileGrid, from: Position, to: Position) -> Option<Vec<Position>> {
    if !grid.try_get(from).is_some_and(is_open) {
        return None;
    }
    bfs(&from, |&pos| open_neighbours(grid, pos), |&pos| pos == to)
}

/// Whether every interior tile of every room lies in one open region.
pub fn rooms_connected(grid: &TileGrid, rooms: &[Room]) -> bool {
    let Some(first) = rooms.first() else {
        return true;
    };
    let region = reachable_tiles(grid, first.anchor);
    rooms
        .iter()
        .flat_map(|room| room.interior_positions())
        .all(|pos| region.contains(&pos))
}

//! # World Building
//!
//! Runs the whole generation pipeline: empty grid, room placement, hallway
//! routing, avatar spawn.

use crate::game::{Position, Tile, TileGrid};
use crate::generation::{
    GenerationConfig, Generator, Hallway, HallwayRouter, RandomStream, Room, RoomPlanner,
    UnionFind,
};
use crate::utils::rooms_connected;
use crate::{DelveError, DelveResult};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// What generation did, kept for validation and debugging.
///
/// Rooms and hallways only survive here; the grid holds their effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Number of room candidates drawn
    pub room_attempts: u32,
    /// Accepted rooms in placement order
    pub rooms: Vec<Room>,
    /// Hallways in the order they were routed
    pub hallways: Vec<Hallway>,
    /// Random attempts spent finding the spawn tile
    pub spawn_attempts: u32,
}

impl GenerationReport {
    /// Replays the hallway unions and counts the resulting room components.
    pub fn component_count(&self) -> usize {
        let mut uf = UnionFind::new(self.rooms.len());
        for hallway in &self.hallways {
            uf.union(hallway.rooms.0, hallway.rooms.1);
        }
        uf.component_count()
    }
}

/// A finished world ready to be played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedWorld {
    /// Seed of the stream the world was drawn from
    pub seed: u64,
    /// The carved grid with the avatar marked on it
    pub grid: TileGrid,
    /// Where the avatar starts
    pub spawn: Position,
    /// Generation log
    pub report: GenerationReport,
}

/// Orchestrates room placement, hallway routing and avatar placement.
///
/// # Examples
///
/// ```
/// use delve::{GenerationConfig, Tile, WorldBuilder};
///
/// let world = WorldBuilder::build(&GenerationConfig::new(7)).unwrap();
/// assert_eq!(world.grid.get(world.spawn), Tile::Avatar);
/// assert_eq!(world.report.component_count(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WorldBuilder;

impl WorldBuilder {
    /// Creates a new world builder.
    pub fn new() -> Self {
        Self
    }

    /// Generates a world from `config`, seeding a fresh stream from
    /// `config.seed`.
    pub fn build(config: &GenerationConfig) -> DelveResult<GeneratedWorld> {
        let mut rng = RandomStream::new(config.seed);
        Self::new().generate(config, &mut rng)
    }

    /// Puts the avatar on a random floor tile.
    ///
    /// Tries uniform positions (x, then y) up to `max_attempts` times; if no
    /// attempt lands on floor, picks uniformly among the floor tiles instead.
    /// Returns the spawn and the number of attempts spent, or `None` if the grid
    /// has no floor at all.
    pub fn place_avatar(
        grid: &mut TileGrid,
        rng: &mut RandomStream,
        max_attempts: u32,
    ) -> Option<(Position, u32)> {
        if grid.count(Tile::Floor) == 0 {
            return None;
        }

        let width = grid.width() as i32;
        let height = grid.height() as i32;
        for attempt in 1..=max_attempts {
            let pos = Position::new(rng.next_int(0, width), rng.next_int(0, height));
            if grid.get(pos) == Tile::Floor {
                grid.set(pos, Tile::Avatar);
                return Some((pos, attempt));
            }
        }

        warn!(
            "no floor tile hit in {} spawn attempts, falling back to a floor scan",
            max_attempts
        );
        let floors = grid.positions_of(Tile::Floor);
        let pos = floors[rng.next_index(floors.len())];
        grid.set(pos, Tile::Avatar);
        Some((pos, max_attempts))
    }
}

impl Generator<GeneratedWorld> for WorldBuilder {
    fn generate(
        &self,
        config: &GenerationConfig,
        rng: &mut RandomStream,
    ) -> DelveResult<GeneratedWorld> {
        config.validate()?;

        let mut grid = TileGrid::new(config.width, config.height);
        grid.fill(Tile::Nothing);

        let room_attempts = rng.next_int(
            config.room_attempts.start as i32,
            config.room_attempts.end as i32,
        ) as u32;
        debug!("drawing {} room candidates", room_attempts);

        let planner = RoomPlanner::from_config(config);
        let rooms = planner.plan(&mut grid, rng, room_attempts);

        let router = HallwayRouter::new(config.endpoint_selection);
        let hallways = router.connect(&mut grid, &rooms, rng);

        let (spawn, spawn_attempts) =
            Self::place_avatar(&mut grid, rng, config.max_spawn_attempts).ok_or(
                DelveError::NoValidSpawn {
                    room_attempts,
                    rooms_placed: rooms.len(),
                },
            )?;

        info!(
            "generated {}x{} world: {} rooms, {} hallways, avatar at {}",
            config.width,
            config.height,
            rooms.len(),
            hallways.len(),
            spawn
        );

        Ok(GeneratedWorld {
            seed: rng.seed(),
            grid,
            spawn,
            report: GenerationReport {
                room_attempts,
                rooms,
                hallways,
                spawn_attempts,
            },
        })
    }

    fn validate(&self, world: &GeneratedWorld, config: &GenerationConfig) -> DelveResult<()> {
        if world.grid.width() != config.width || world.grid.height() != config.height {
            return Err(DelveError::GenerationFailed(format!(
                "grid is {}x{}, expected {}x{}",
                world.grid.width(),
                world.grid.height(),
                config.width,
                config.height
            )));
        }

        if world.grid.positions_of(Tile::Avatar) != vec![world.spawn] {
            return Err(DelveError::GenerationFailed(format!(
                "expected a single avatar at {}",
                world.spawn
            )));
        }

        let rooms = &world.report.rooms;
        for (i, a) in rooms.iter().enumerate() {
            if let Some(b) = rooms[i + 1..].iter().find(|b| a.footprint_overlaps(b)) {
                return Err(DelveError::GenerationFailed(format!(
                    "rooms at {} and {} overlap",
                    a.anchor, b.anchor
                )));
            }
        }

        let components = world.report.component_count();
        if components > 1 {
            return Err(DelveError::GenerationFailed(format!(
                "room network has {} components",
                components
            )));
        }
        if !rooms_connected(&world.grid, rooms) {
            return Err(DelveError::GenerationFailed(
                "room interiors are not mutually reachable".to_string(),
            ));
        }

        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "WorldBuilder"
    }
}

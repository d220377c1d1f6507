//! # Hallway Routing
//!
//! Joins every placed room into one network. Routing is a greedy nearest-pair
//! loop over a union-find of room indices: each round finds the closest pair of
//! rooms that are not yet connected, joins them with an L-shaped corridor and
//! merges their components, until one component remains.

use crate::game::{Position, Tile, TileGrid};
use crate::generation::{RandomStream, Room};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Disjoint-set forest over room indices, weighted by component size with
/// path compression.
///
/// # Examples
///
/// ```
/// use delve::UnionFind;
///
/// let mut uf = UnionFind::new(3);
/// assert_eq!(uf.component_count(), 3);
/// assert!(uf.union(0, 2));
/// assert!(uf.connected(2, 0));
/// assert!(!uf.union(2, 0));
/// assert_eq!(uf.component_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
    components: usize,
}

impl UnionFind {
    /// Creates `n` singleton components.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
            components: n,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Whether the forest has no elements.
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Root of the component containing `x`.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Merges the components of `a` and `b`. Returns false if they were
    /// already one component.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }

        let (small, large) = if self.size[root_a] < self.size[root_b] {
            (root_a, root_b)
        } else {
            (root_b, root_a)
        };
        self.parent[small] = large;
        self.size[large] += self.size[small];
        self.components -= 1;
        true
    }

    /// Whether `a` and `b` are in the same component.
    pub fn connected(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Number of disjoint components.
    pub fn component_count(&self) -> usize {
        self.components
    }
}

/// How hallway endpoints are drawn during the nearest-pair scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointSelection {
    /// One point per room, drawn in room order before routing starts and reused
    /// for every comparison and corridor.
    #[default]
    PerRoom,
    /// Fresh points for both rooms on every compared pair. The same pair can
    /// measure differently on each scan; the winning pair keeps the points
    /// drawn on its winning comparison.
    PerComparison,
}

/// An L-shaped corridor between interior points of two rooms.
///
/// The corridor runs horizontally along `start.y` from `start.x` to `end.x`,
/// bends at `(end.x, start.y)`, then runs vertically along `end.x` to `end.y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hallway {
    /// Interior point of the first room
    pub start: Position,
    /// Interior point of the second room
    pub end: Position,
    /// Indices of the joined rooms in the accepted room list
    pub rooms: (usize, usize),
}

impl Hallway {
    /// Creates a hallway joining rooms `rooms.0` and `rooms.1`.
    pub fn new(start: Position, end: Position, rooms: (usize, usize)) -> Self {
        Self { start, end, rooms }
    }

    /// Corner where the horizontal run turns into the vertical run.
    pub fn bend(&self) -> Position {
        Position::new(self.end.x, self.start.y)
    }

    /// Length of the corridor in steps.
    pub fn length(&self) -> u32 {
        self.start.manhattan_distance(self.end)
    }

    /// Tiles of the corridor, from `start` to `end`.
    pub fn floor_positions(&self) -> Vec<Position> {
        let mut positions = Vec::with_capacity(self.length() as usize + 1);
        let step_x = (self.end.x - self.start.x).signum();
        let step_y = (self.end.y - self.start.y).signum();

        let mut pos = self.start;
        positions.push(pos);
        while pos.x != self.end.x {
            pos = pos.shift(step_x, 0);
            positions.push(pos);
        }
        while pos.y != self.end.y {
            pos = pos.shift(0, step_y);
            positions.push(pos);
        }
        positions
    }

    /// Flanking wall tiles.
    ///
    /// The horizontal run is flanked north and south and extends one tile past
    /// the bend to close the outer corner; the vertical run is flanked east and
    /// west over its whole length. Tiles of the corridor itself are never
    /// included.
    pub fn wall_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();
        let step_x = if self.end.x > self.start.x { 1 } else { -1 };
        let run_x = self.start.x.abs_diff(self.end.x) as i32;

        for i in 0..=run_x + 1 {
            let x = self.start.x + step_x * i;
            positions.push(Position::new(x, self.start.y + 1));
            positions.push(Position::new(x, self.start.y - 1));
        }

        let (low_y, high_y) = if self.start.y <= self.end.y {
            (self.start.y, self.end.y)
        } else {
            (self.end.y, self.start.y)
        };
        for y in low_y..=high_y {
            positions.push(Position::new(self.end.x - 1, y));
            positions.push(Position::new(self.end.x + 1, y));
        }

        let floor = self.floor_positions();
        positions.retain(|pos| !floor.contains(pos));
        positions
    }
}

/// Greedy nearest-pair router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HallwayRouter {
    /// Endpoint drawing strategy
    pub endpoint_selection: EndpointSelection,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    first: usize,
    second: usize,
    start: Position,
    end: Position,
    distance: u32,
}

impl HallwayRouter {
    /// Creates a router with the given endpoint strategy.
    pub fn new(endpoint_selection: EndpointSelection) -> Self {
        Self { endpoint_selection }
    }

    /// Routes and carves hallways so every room ends up in one network.
    ///
    /// Zero or one room needs no hallway and draws nothing from `rng`.
    pub fn connect(
        &self,
        grid: &mut TileGrid,
        rooms: &[Room],
        rng: &mut RandomStream,
    ) -> Vec<Hallway> {
        let hallways = self.route(rooms, rng);
        Self::carve(grid, rooms, &hallways);
        info!(
            "connected {} rooms with {} hallways",
            rooms.len(),
            hallways.len()
        );
        hallways
    }

    /// Chooses the hallways without touching the grid.
    pub fn route(&self, rooms: &[Room], rng: &mut RandomStream) -> Vec<Hallway> {
        if rooms.len() < 2 {
            return Vec::new();
        }

        let fixed_points: Vec<Position> = match self.endpoint_selection {
            EndpointSelection::PerRoom => rooms
                .iter()
                .map(|room| room.random_interior_point(rng))
                .collect(),
            EndpointSelection::PerComparison => Vec::new(),
        };

        let mut uf = UnionFind::new(rooms.len());
        let mut hallways = Vec::with_capacity(rooms.len() - 1);

        while uf.component_count() > 1 {
            let mut best: Option<Candidate> = None;

            for i in 0..rooms.len() {
                for j in (i + 1)..rooms.len() {
                    if uf.connected(i, j) {
                        continue;
                    }
                    let (start, end) = match self.endpoint_selection {
                        EndpointSelection::PerRoom => (fixed_points[i], fixed_points[j]),
                        EndpointSelection::PerComparison => (
                            rooms[i].random_interior_point(rng),
                            rooms[j].random_interior_point(rng),
                        ),
                    };
                    let distance = start.manhattan_distance(end);
                    if best.map_or(true, |b| distance < b.distance) {
                        best = Some(Candidate {
                            first: i,
                            second: j,
                            start,
                            end,
                            distance,
                        });
                    }
                }
            }

            // component_count > 1 guarantees at least one unconnected pair
            let Some(chosen) = best else { break };
            uf.union(chosen.first, chosen.second);
            debug!(
                "hallway {} -> {} between rooms {} and {} (distance {})",
                chosen.start, chosen.end, chosen.first, chosen.second, chosen.distance
            );
            hallways.push(Hallway::new(
                chosen.start,
                chosen.end,
                (chosen.first, chosen.second),
            ));
        }

        hallways
    }

    /// Carves routed hallways in two passes.
    ///
    /// First every hallway lays its flanking walls; then every room interior
    /// and every corridor run is written as floor. Walls laid by a later
    /// hallway therefore never cut an earlier corridor or a room.
    pub fn carve(grid: &mut TileGrid, rooms: &[Room], hallways: &[Hallway]) {
        for hallway in hallways {
            for pos in hallway.wall_positions() {
                grid.set(pos, Tile::Wall);
            }
        }
        for room in rooms {
            for pos in room.interior_positions() {
                grid.set(pos, Tile::Floor);
            }
        }
        for hallway in hallways {
            for pos in hallway.floor_positions() {
                grid.set(pos, Tile::Floor);
            }
        }
    }
}

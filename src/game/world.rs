//! # World Representation
//!
//! The tile enumeration and the fixed-size grid that generation carves into and
//! the avatar walks across.

use crate::game::Position;
use crate::{DelveError, DelveResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tile {
    /// Unused space outside every room and corridor
    #[default]
    Nothing,
    /// Walkable ground
    Floor,
    /// Boundary around rooms and corridors
    Wall,
    /// Marker for the avatar's current cell
    Avatar,
}

impl Tile {
    /// Character used by the ASCII renderer.
    pub fn glyph(self) -> char {
        match self {
            Tile::Nothing => ' ',
            Tile::Floor => '.',
            Tile::Wall => '#',
            Tile::Avatar => '@',
        }
    }

    /// Parses a glyph produced by [`Tile::glyph`].
    pub fn from_glyph(glyph: char) -> Option<Tile> {
        match glyph {
            ' ' => Some(Tile::Nothing),
            '.' => Some(Tile::Floor),
            '#' => Some(Tile::Wall),
            '@' => Some(Tile::Avatar),
            _ => None,
        }
    }

    /// Whether the avatar may step onto this tile under the default policy.
    pub fn is_walkable(self) -> bool {
        self == Tile::Floor
    }
}

/// A width x height buffer of tiles.
///
/// Every in-bounds position holds exactly one tile. Reading or writing outside
/// the grid through [`TileGrid::get`] or [`TileGrid::set`] is a programming error
/// and panics; use [`TileGrid::try_get`] to read positions that may be off-grid.
///
/// # Examples
///
/// ```
/// use delve::{Position, Tile, TileGrid};
///
/// let mut grid = TileGrid::new(4, 3);
/// grid.set(Position::new(1, 2), Tile::Floor);
/// assert_eq!(grid.get(Position::new(1, 2)), Tile::Floor);
/// assert_eq!(grid.try_get(Position::new(4, 0)), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: u32,
    height: u32,
    /// Row-major, row 0 is the bottom row
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Creates a grid filled with [`Tile::Nothing`].
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::Nothing; (width as usize) * (height as usize)],
        }
    }

    /// Parses the text produced by [`TileGrid::to_ascii`].
    ///
    /// All lines must have the same length; the first line is the top row.
    pub fn from_ascii(text: &str) -> DelveResult<Self> {
        let rows: Vec<&str> = text.lines().collect();
        let width = rows.first().map_or(0, |row| row.chars().count());
        let mut grid = Self::new(width as u32, rows.len() as u32);

        for (row_index, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(DelveError::InvalidInput(format!(
                    "grid row {} has {} columns, expected {}",
                    row_index,
                    row.chars().count(),
                    width
                )));
            }
            let y = (rows.len() - 1 - row_index) as i32;
            for (x, glyph) in row.chars().enumerate() {
                let tile = Tile::from_glyph(glyph).ok_or_else(|| {
                    DelveError::InvalidInput(format!("unknown tile glyph {:?}", glyph))
                })?;
                grid.set(Position::new(x as i32, y), tile);
            }
        }

        Ok(grid)
    }

    /// Grid width in tiles.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in tiles.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Checks whether a position lies inside the grid.
    pub fn is_valid_position(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.is_valid_position(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    fn index_or_panic(&self, pos: Position) -> usize {
        match self.index(pos) {
            Some(index) => index,
            None => panic!(
                "tile access at {} is outside the {}x{} grid",
                pos, self.width, self.height
            ),
        }
    }

    /// Reads the tile at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of bounds.
    pub fn get(&self, pos: Position) -> Tile {
        self.tiles[self.index_or_panic(pos)]
    }

    /// Reads the tile at `pos`, or `None` when it is off-grid.
    pub fn try_get(&self, pos: Position) -> Option<Tile> {
        self.index(pos).map(|index| self.tiles[index])
    }

    /// Writes the tile at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of bounds.
    pub fn set(&mut self, pos: Position, tile: Tile) {
        let index = self.index_or_panic(pos);
        self.tiles[index] = tile;
    }

    /// Overwrites every tile.
    pub fn fill(&mut self, tile: Tile) {
        self.tiles.fill(tile);
    }

    /// Iterates over every position in row-major order, bottom row first.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let width = self.width as i32;
        (0..self.height as i32).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    /// Counts the tiles of the given kind.
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    /// All positions currently holding `tile`, in row-major order.
    pub fn positions_of(&self, tile: Tile) -> Vec<Position> {
        self.positions().filter(|&pos| self.get(pos) == tile).collect()
    }

    /// Renders the grid as text, top row first, one line per row.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.tiles.len() + self.height as usize);
        for y in (0..self.height as i32).rev() {
            for x in 0..self.width as i32 {
                out.push(self.get(Position::new(x, y)).glyph());
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ascii())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_empty() {
        let grid = TileGrid::new(7, 5);
        assert_eq!(grid.width(), 7);
        assert_eq!(grid.height(), 5);
        assert_eq!(grid.count(Tile::Nothing), 35);
        assert_eq!(grid.positions().count(), 35);
    }

    #[test]
    fn test_set_and_get() {
        let mut grid = TileGrid::new(5, 5);
        grid.set(Position::new(0, 0), Tile::Wall);
        grid.set(Position::new(4, 4), Tile::Avatar);
        assert_eq!(grid.get(Position::new(0, 0)), Tile::Wall);
        assert_eq!(grid.get(Position::new(4, 4)), Tile::Avatar);
        assert_eq!(grid.get(Position::new(2, 2)), Tile::Nothing);
        assert_eq!(grid.positions_of(Tile::Wall), vec![Position::new(0, 0)]);
    }

    #[test]
    fn test_bounds() {
        let grid = TileGrid::new(5, 3);
        assert!(grid.is_valid_position(Position::new(4, 2)));
        assert!(!grid.is_valid_position(Position::new(5, 2)));
        assert!(!grid.is_valid_position(Position::new(4, 3)));
        assert!(!grid.is_valid_position(Position::new(-1, 0)));
        assert_eq!(grid.try_get(Position::new(0, -1)), None);
        assert_eq!(grid.try_get(Position::new(1, 1)), Some(Tile::Nothing));
    }

    #[test]
    #[should_panic(expected = "outside the 5x3 grid")]
    fn test_out_of_bounds_read_panics() {
        let grid = TileGrid::new(5, 3);
        grid.get(Position::new(5, 0));
    }

    #[test]
    #[should_panic(expected = "outside the 5x3 grid")]
    fn test_out_of_bounds_write_panics() {
        let mut grid = TileGrid::new(5, 3);
        grid.set(Position::new(0, -1), Tile::Floor);
    }

    #[test]
    fn test_fill() {
        let mut grid = TileGrid::new(3, 3);
        grid.fill(Tile::Wall);
        assert_eq!(grid.count(Tile::Wall), 9);
        grid.fill(Tile::Nothing);
        assert_eq!(grid.count(Tile::Nothing), 9);
    }

    #[test]
    fn test_ascii_puts_top_row_first() {
        let mut grid = TileGrid::new(3, 2);
        grid.set(Position::new(0, 1), Tile::Wall);
        grid.set(Position::new(2, 0), Tile::Avatar);
        grid.set(Position::new(1, 0), Tile::Floor);
        assert_eq!(grid.to_ascii(), "#  \n .@\n");
        assert_eq!(grid.to_string(), grid.to_ascii());
    }

    #[test]
    fn test_from_ascii() {
        let grid = TileGrid::from_ascii("###\n#@#\n#.#\n###\n").unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.get(Position::new(1, 2)), Tile::Avatar);
        assert_eq!(grid.get(Position::new(1, 1)), Tile::Floor);
        assert_eq!(grid.to_ascii(), "###\n#@#\n#.#\n###\n");

        assert!(TileGrid::from_ascii("##\n#\n").is_err());
        assert!(TileGrid::from_ascii("#x#\n").is_err());
    }

    #[test]
    fn test_glyphs() {
        for tile in [Tile::Nothing, Tile::Floor, Tile::Wall, Tile::Avatar] {
            assert_eq!(Tile::from_glyph(tile.glyph()), Some(tile));
        }
        assert_eq!(Tile::from_glyph('x'), None);
        assert!(Tile::Floor.is_walkable());
        assert!(!Tile::Wall.is_walkable());
        assert!(!Tile::Nothing.is_walkable());
    }
}

//! # Display Management
//!
//! Live rendering of the tile grid in a macroquad window.

use crate::config::TILE_PIXELS;
use crate::game::{Position, Tile, TileGrid};
use crate::rendering::RenderSink;
use crate::{DelveError, DelveResult};
use macroquad::prelude::*;

/// Macroquad render sink.
///
/// Draws every tile as a colored square with its glyph on top, and a short
/// message log under the map. Only usable inside a running macroquad window.
pub struct MacroquadDisplay {
    /// Tile size in pixels
    pub tile_size: f32,
    /// Height reserved under the map for messages, in pixels
    pub message_area_height: f32,
    /// Message history
    pub messages: Vec<String>,
    /// Maximum number of messages to keep
    pub max_messages: usize,
}

impl MacroquadDisplay {
    /// Creates a display manager with the default tile size.
    pub fn new() -> Self {
        Self {
            tile_size: TILE_PIXELS,
            message_area_height: 60.0,
            messages: Vec::new(),
            max_messages: 3,
        }
    }

    /// Window size in pixels needed to show a `width` x `height` grid.
    pub fn window_size(&self, width: u32, height: u32) -> (f32, f32) {
        (
            width as f32 * self.tile_size,
            height as f32 * self.tile_size + self.message_area_height,
        )
    }

    /// Adds a message to the log, dropping the oldest past the limit.
    pub fn add_message(&mut self, message: String) {
        self.messages.push(message);
        if self.messages.len() > self.max_messages {
            let excess = self.messages.len() - self.max_messages;
            self.messages.drain(..excess);
        }
    }

    /// Gets the display character and color for a tile.
    fn tile_display_data(tile: Tile) -> (char, Color) {
        match tile {
            Tile::Nothing => (' ', BLACK),
            Tile::Floor => ('.', DARKGRAY),
            Tile::Wall => ('#', BROWN),
            Tile::Avatar => ('@', YELLOW),
        }
    }

    fn render_map(&self, grid: &TileGrid) {
        for pos in grid.positions() {
            let tile = grid.get(pos);
            if tile == Tile::Nothing {
                continue;
            }
            let (glyph, color) = Self::tile_display_data(tile);
            let origin = self.tile_origin(grid, pos);

            draw_rectangle(origin.x, origin.y, self.tile_size, self.tile_size, color);
            draw_text(
                &glyph.to_string(),
                origin.x + self.tile_size * 0.25,
                origin.y + self.tile_size * 0.85,
                self.tile_size,
                WHITE,
            );
        }
    }

    fn render_messages(&self, grid: &TileGrid) {
        let mut line_y = grid.height() as f32 * self.tile_size + 18.0;
        for message in &self.messages {
            draw_text(message, 8.0, line_y, 18.0, LIGHTGRAY);
            line_y += 18.0;
        }
    }

    /// Screen pixel of the top-left corner of the tile at `pos`.
    pub fn tile_origin(&self, grid: &TileGrid, pos: Position) -> Vec2 {
        vec2(
            pos.x as f32 * self.tile_size,
            (grid.height() as i32 - 1 - pos.y) as f32 * self.tile_size,
        )
    }
}

impl Default for MacroquadDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSink for MacroquadDisplay {
    fn render(&mut self, grid: &TileGrid) -> DelveResult<()> {
        if grid.width() == 0 || grid.height() == 0 {
            return Err(DelveError::Render("cannot draw an empty grid".to_string()));
        }
        clear_background(BLACK);
        self.render_map(grid);
        self.render_messages(grid);
        Ok(())
    }
}

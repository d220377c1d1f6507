//! # Rendering Module
//!
//! Render sinks that consume finished grids: plain text for scripted runs and
//! tests, and a macroquad window for live play.

pub mod display;

pub use display::*;

use crate::game::TileGrid;
use crate::DelveResult;
use std::io::Write;

/// Anything that can draw a finished grid.
pub trait RenderSink {
    /// Draws one frame.
    fn render(&mut self, grid: &TileGrid) -> DelveResult<()>;
}

/// Writes each frame as ASCII text followed by a blank line.
#[derive(Debug)]
pub struct AsciiRenderer<W: Write> {
    out: W,
    frames: usize,
}

impl<W: Write> AsciiRenderer<W> {
    /// Creates a renderer writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out, frames: 0 }
    }

    /// Number of frames written.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Gives back the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSink for AsciiRenderer<W> {
    fn render(&mut self, grid: &TileGrid) -> DelveResult<()> {
        self.out.write_all(grid.to_ascii().as_bytes())?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        self.frames += 1;
        Ok(())
    }
}

/// Keeps every frame in memory.
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    /// Frames in the order they were rendered
    pub frames: Vec<String>,
}

impl FrameRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent frame, if any.
    pub fn last(&self) -> Option<&str> {
        self.frames.last().map(String::as_str)
    }
}

impl RenderSink for FrameRecorder {
    fn render(&mut self, grid: &TileGrid) -> DelveResult<()> {
        self.frames.push(grid.to_ascii());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Position, Tile};

    #[test]
    fn test_ascii_renderer_writes_frames() {
        let mut grid = TileGrid::new(2, 2);
        grid.set(Position::new(0, 0), Tile::Avatar);
        grid.set(Position::new(1, 1), Tile::Wall);

        let mut renderer = AsciiRenderer::new(Vec::new());
        renderer.render(&grid).unwrap();
        renderer.render(&grid).unwrap();
        assert_eq!(renderer.frames(), 2);

        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(text, " #\n@ \n\n #\n@ \n\n");
    }

    #[test]
    fn test_frame_recorder() {
        let mut recorder = FrameRecorder::new();
        assert!(recorder.last().is_none());
        let grid = TileGrid::new(1, 1);
        recorder.render(&grid).unwrap();
        assert_eq!(recorder.frames.len(), 1);
        assert_eq!(recorder.last(), Some(" \n"));
    }
}

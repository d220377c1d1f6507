//! # Delve
//!
//! A deterministic procedural world generator for a fixed-size tile grid, plus a
//! minimal avatar that can walk the generated floor plan.
//!
//! ## Architecture Overview
//!
//! Generation is a straight pipeline over a single owned [`TileGrid`]:
//!
//! - **RandomStream**: one seeded random source passed explicitly to every step
//! - **RoomPlanner**: proposes rectangular rooms and carves the ones that fit
//! - **HallwayRouter**: joins every room into one network with L-shaped corridors
//! - **WorldBuilder**: runs the pipeline and drops the avatar on a floor tile
//!
//! Play is an event-driven loop ([`GameState`]) that pulls keys from an
//! [`InputSource`] and pushes frames to a [`RenderSink`], so the same session can
//! run in a macroquad window or be replayed from a scripted string.
//!
//! ## Determinism
//!
//! The same seed always yields the same world, and the same seed plus the same
//! scripted input always yields the same final grid and avatar position.

pub mod cli;
pub mod game;
pub mod generation;
pub mod input;
pub mod rendering;
pub mod utils;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use input::*;
pub use rendering::*;
pub use utils::*;

/// Core error type for the Delve engine.
#[derive(thiserror::Error, Debug)]
pub enum DelveError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Generation parameters are inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Scripted input contains characters the controller does not understand
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No floor tile exists to place the avatar on
    #[error(
        "No valid spawn: {rooms_placed} of {room_attempts} room attempts succeeded and no floor tile exists"
    )]
    NoValidSpawn {
        /// Number of room candidates that were proposed
        room_attempts: u32,
        /// Number of candidates that were actually carved
        rooms_placed: usize,
    },

    /// Generated world failed validation
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// A render sink could not draw a frame
    #[error("Render error: {0}")]
    Render(String),
}

/// Result type used throughout the Delve codebase.
pub type DelveResult<T> = Result<T, DelveError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// World configuration constants.
pub mod config {
    /// Default world width in tiles
    pub const DEFAULT_WORLD_WIDTH: u32 = 50;

    /// Default world height in tiles
    pub const DEFAULT_WORLD_HEIGHT: u32 = 50;

    /// Largest accepted grid side in tiles
    pub const MAX_WORLD_SIDE: u32 = 1024;

    /// Seed used when none is supplied on the command line
    pub const DEFAULT_SEED: u64 = 3_080_248;

    /// Smallest legal room side, walls excluded
    pub const MIN_ROOM_SIDE: i32 = 3;

    /// Upper bound on random spawn attempts before falling back to a floor scan
    pub const DEFAULT_MAX_SPAWN_ATTEMPTS: u32 = 10_000;

    /// Pixel size of one tile in the macroquad window
    pub const TILE_PIXELS: f32 = 14.0;
}

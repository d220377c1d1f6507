//! Command line arguments for the `delve` binary.

use crate::config::DEFAULT_SEED;
use crate::game::MovementPolicy;
use crate::generation::GenerationConfig;
use crate::{DelveError, DelveResult};
use clap::Parser;
use log::error;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

/// Command line arguments for Delve.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "delve")]
#[command(about = "Generate a room-and-corridor world and walk it")]
#[command(version)]
pub struct Args {
    /// Replay a string of w/a/s/d/q keys instead of opening a window
    #[arg(short = 's', value_name = "INPUT")]
    pub script: Option<String>,

    /// Random seed for world generation
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON file with generation parameters
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Which tiles the avatar may step onto
    #[arg(long, value_enum, default_value_t = MovementPolicy::Walkable)]
    pub movement: MovementPolicy,

    /// Print the scripted session summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// How the session is driven.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMode {
    /// Live keys from the window
    Keyboard,
    /// A fixed key string
    Scripted(String),
}

impl Args {
    /// Session mode implied by the arguments.
    pub fn mode(&self) -> SessionMode {
        match &self.script {
            Some(script) => SessionMode::Scripted(script.clone()),
            None => SessionMode::Keyboard,
        }
    }

    /// Generation parameters: the config file if given, then the seed override.
    pub fn generation_config(&self) -> DelveResult<GenerationConfig> {
        let mut config = match &self.config {
            Some(path) => GenerationConfig::from_json_file(path)?,
            None => GenerationConfig::new(DEFAULT_SEED),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Carries a session failure out of the window future.
///
/// macroquad's `Window::from_config` takes a future returning `()`, so the
/// loop's error is parked here and read back once the window closes.
#[derive(Debug, Clone, Default)]
pub struct FailureSlot(Rc<RefCell<Option<DelveError>>>);

impl FailureSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the error of a failed run; a later error replaces an earlier one.
    pub fn record(&self, result: DelveResult<()>) {
        if let Err(e) = result {
            error!("Game loop failed: {}", e);
            *self.0.borrow_mut() = Some(e);
        }
    }

    /// The recorded failure, if any, as the session result.
    pub fn into_result(self) -> DelveResult<()> {
        let failure = self.0.borrow_mut().take();
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

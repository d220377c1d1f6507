//! # Keyboard Input
//!
//! Live key events from the macroquad window.

use crate::input::InputSource;
use macroquad::input::get_char_pressed;

/// Reads characters typed into the macroquad window.
///
/// Only valid inside a running macroquad window; poll it once per frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyboardInput;

impl KeyboardInput {
    /// Creates a keyboard input source.
    pub fn new() -> Self {
        Self
    }
}

impl InputSource for KeyboardInput {
    fn next_key(&mut self) -> Option<char> {
        get_char_pressed()
    }

    fn possible_next_input(&self) -> bool {
        true
    }
}

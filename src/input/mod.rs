//! # Input Module
//!
//! Key events for the avatar loop and the two interchangeable sources that
//! deliver them: a live macroquad keyboard and a replayable scripted string.

pub mod keyboard;

pub use keyboard::*;

use crate::game::Direction;
use crate::{DelveError, DelveResult};
use std::collections::VecDeque;

/// Meaning of a single key character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    /// Step one tile
    Move(Direction),
    /// End the session
    Quit,
    /// Any other key
    Unknown(char),
}

impl PlayerInput {
    /// Maps a key character to an input. Letters are case-insensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Direction, PlayerInput};
    ///
    /// assert_eq!(PlayerInput::from_key('w'), PlayerInput::Move(Direction::North));
    /// assert_eq!(PlayerInput::from_key('Q'), PlayerInput::Quit);
    /// assert_eq!(PlayerInput::from_key('x'), PlayerInput::Unknown('x'));
    /// ```
    pub fn from_key(key: char) -> Self {
        match key.to_ascii_lowercase() {
            'w' => PlayerInput::Move(Direction::North),
            'a' => PlayerInput::Move(Direction::West),
            's' => PlayerInput::Move(Direction::South),
            'd' => PlayerInput::Move(Direction::East),
            'q' => PlayerInput::Quit,
            _ => PlayerInput::Unknown(key),
        }
    }

    /// Whether the key is one the controller acts on.
    pub fn is_recognized(self) -> bool {
        !matches!(self, PlayerInput::Unknown(_))
    }
}

/// A source of discrete key events.
pub trait InputSource {
    /// Takes the next key if one is available right now.
    fn next_key(&mut self) -> Option<char>;

    /// Whether more keys may still arrive.
    fn possible_next_input(&self) -> bool;
}

/// Keys replayed from a string, one per tick.
///
/// # Examples
///
/// ```
/// use delve::{InputSource, ScriptedInput};
///
/// let mut input = ScriptedInput::parse("w a\tq").unwrap();
/// assert_eq!(input.remaining(), 3);
/// assert_eq!(input.next_key(), Some('w'));
/// assert!(ScriptedInput::parse("wx").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScriptedInput {
    keys: VecDeque<char>,
}

impl ScriptedInput {
    /// Parses a script, dropping whitespace.
    ///
    /// Every other character must be a movement or quit key.
    pub fn parse(script: &str) -> DelveResult<Self> {
        let mut keys = VecDeque::with_capacity(script.len());
        for (index, key) in script.char_indices() {
            if key.is_whitespace() {
                continue;
            }
            if !PlayerInput::from_key(key).is_recognized() {
                return Err(DelveError::InvalidInput(format!(
                    "unrecognized key {:?} at byte {} of the input script",
                    key, index
                )));
            }
            keys.push_back(key.to_ascii_lowercase());
        }
        Ok(Self { keys })
    }

    /// Keys not yet consumed.
    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl InputSource for ScriptedInput {
    fn next_key(&mut self) -> Option<char> {
        self.keys.pop_front()
    }

    fn possible_next_input(&self) -> bool {
        !self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(PlayerInput::from_key('a'), PlayerInput::Move(Direction::West));
        assert_eq!(PlayerInput::from_key('s'), PlayerInput::Move(Direction::South));
        assert_eq!(PlayerInput::from_key('D'), PlayerInput::Move(Direction::East));
        assert_eq!(PlayerInput::from_key('q'), PlayerInput::Quit);
        assert!(!PlayerInput::from_key('?').is_recognized());
    }

    #[test]
    fn test_script_is_whitespace_insensitive() {
        let spaced = ScriptedInput::parse("wwaaddss q").unwrap();
        let packed = ScriptedInput::parse("wwaaddssq").unwrap();
        assert_eq!(spaced, packed);
        assert_eq!(spaced.remaining(), 9);
    }

    #[test]
    fn test_script_is_consumed_in_order() {
        let mut input = ScriptedInput::parse("WdQ").unwrap();
        assert!(input.possible_next_input());
        assert_eq!(input.next_key(), Some('w'));
        assert_eq!(input.next_key(), Some('d'));
        assert_eq!(input.next_key(), Some('q'));
        assert!(!input.possible_next_input());
        assert_eq!(input.next_key(), None);
    }

    #[test]
    fn test_script_rejects_unknown_keys() {
        let err = ScriptedInput::parse("ww:q").unwrap_err();
        assert!(matches!(err, DelveError::InvalidInput(_)));
        assert!(err.to_string().contains("':'"));
    }

    #[test]
    fn test_empty_script() {
        let input = ScriptedInput::parse("  \n").unwrap();
        assert!(!input.possible_next_input());
    }
}

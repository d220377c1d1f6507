//! # Utilities Module
//!
//! Reachability checks over generated grids.

pub mod reachability;

pub use reachability::*;

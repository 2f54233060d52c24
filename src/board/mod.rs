//! Board representation and game-state types.
//!
//! Contains the core data structures for the grid, coordinates, and the
//! immutable game state with its move generation.

pub mod grid;
pub mod state;

pub use grid::{Cell, Coord, CELL_COUNT, CENTER, HEIGHT, KNIGHT_OFFSETS, WIDTH};
pub use state::{Action, Board, GameState, PlayerId};

//! Knightfall engine library.
//!
//! Exposes the board representation, evaluation heuristics, search, and
//! protocol modules for use by integration tests and the binary entry
//! points.

pub mod archive;
pub mod board;
pub mod engine;
pub mod eval;
pub mod protocol;
pub mod search;
pub mod selfplay;

//! Position evaluation.
//!
//! Scores truncated search leaves from a given player's perspective
//! through a single strategy trait, with a small named registry of the
//! shipped variants.

pub mod heuristic;

pub use heuristic::{
    heuristic_by_name, CenterSeeking, Decay, EnemyProximity, Heuristic, MobilityDiff,
    ObstacleAware, HEURISTIC_NAMES,
};

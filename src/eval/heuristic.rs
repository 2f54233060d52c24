//! Heuristic position evaluation.
//!
//! Scores a non-terminal position from a given player's perspective.
//! All strategies share the single `Heuristic::score` capability so the
//! search engine can swap them without code changes. The empirically
//! tuned constants (opponent weight, window radius, density thresholds)
//! are plain struct fields.

use crate::board::{GameState, PlayerId, CENTER};

/// A pluggable evaluation strategy for truncated search leaves.
///
/// `score` must only be called on non-terminal states; the search engine
/// checks `terminal_test` first.
pub trait Heuristic {
    fn score(&self, state: &GameState, player: PlayerId) -> f64;
}

/// How the center-seeking term fades as the game progresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decay {
    /// Divide by the ply count.
    Linear,
    /// Divide by the square root of the ply count.
    Sqrt,
}

impl Decay {
    fn divisor(self, ply_count: u32) -> f64 {
        // Search leaves are always at least one ply deep.
        let ply = ply_count.max(1) as f64;
        match self {
            Decay::Linear => ply,
            Decay::Sqrt => ply.sqrt(),
        }
    }
}

/// Own liberty count minus the weighted opponent liberty count.
///
/// Returns negative infinity when the player is out of moves and positive
/// infinity when the opponent is; only one side can be out of moves in a
/// non-terminal state, so the two outcomes are mutually exclusive.
fn mobility_differential(state: &GameState, player: PlayerId, opp_weight: f64) -> f64 {
    debug_assert!(
        !state.terminal_test(),
        "heuristics are undefined on terminal states"
    );
    let own = state.liberties(state.loc(player)).len();
    let opp = state.liberties(state.loc(player.opponent())).len();
    if own == 0 {
        f64::NEG_INFINITY
    } else if opp == 0 {
        f64::INFINITY
    } else {
        own as f64 - opp_weight * opp as f64
    }
}

/// Negative Manhattan distance from the player to the board center,
/// faded by the decay divisor.
fn center_term(state: &GameState, player: PlayerId, decay: Decay) -> f64 {
    let dist = state.loc(player).manhattan(CENTER) as f64;
    -dist / decay.divisor(state.ply_count())
}

/// Fraction of blocked cells in the square window of the given radius
/// around the player. The denominator is the full window size even when
/// the window is clipped at a board edge.
fn window_density(state: &GameState, player: PlayerId, radius: u8) -> f64 {
    let own = state.loc(player);
    let r = radius as i8;
    let mut blocked = 0u32;
    for dr in -r..=r {
        for dc in -r..=r {
            if let Some(at) = own.offset(dr, dc) {
                if !state.board().is_open(at) {
                    blocked += 1;
                }
            }
        }
    }
    let window = (2 * radius as u32 + 1).pow(2);
    blocked as f64 / window as f64
}

/// Mobility differential with a configurable opponent weight.
#[derive(Debug, Clone, Copy)]
pub struct MobilityDiff {
    pub opp_weight: f64,
}

impl Heuristic for MobilityDiff {
    fn score(&self, state: &GameState, player: PlayerId) -> f64 {
        mobility_differential(state, player, self.opp_weight)
    }
}

/// Mobility differential with a center-seeking tie-break.
///
/// When the differential is exactly zero, prefers positions near the
/// board center, with influence decaying as the game progresses.
#[derive(Debug, Clone, Copy)]
pub struct CenterSeeking {
    pub opp_weight: f64,
    pub decay: Decay,
}

impl Heuristic for CenterSeeking {
    fn score(&self, state: &GameState, player: PlayerId) -> f64 {
        let m = mobility_differential(state, player, self.opp_weight);
        if m == 0.0 {
            center_term(state, player, self.decay)
        } else {
            m
        }
    }
}

/// Center-seeking tie-break that backs off in cluttered regions.
///
/// When the mobility differential is zero, the local blocked-cell density
/// around the player decides: below `lower` the center term applies,
/// above `upper` the signed density itself is the score, and in between
/// the (zero) differential stands.
#[derive(Debug, Clone, Copy)]
pub struct ObstacleAware {
    pub opp_weight: f64,
    pub window_radius: u8,
    pub lower: f64,
    pub upper: f64,
}

impl Heuristic for ObstacleAware {
    fn score(&self, state: &GameState, player: PlayerId) -> f64 {
        let m = mobility_differential(state, player, self.opp_weight);
        let away = -window_density(state, player, self.window_radius);
        if m == 0.0 && away.abs() <= self.lower {
            center_term(state, player, Decay::Sqrt)
        } else if m == 0.0 && away.abs() > self.upper {
            away
        } else {
            m
        }
    }
}

/// Late-game fallback chain ending in enemy proximity.
///
/// Priority: nonzero mobility differential, then a center term of
/// magnitude at least `center_threshold`, then nonzero local density,
/// then closing the Manhattan distance to the opponent.
#[derive(Debug, Clone, Copy)]
pub struct EnemyProximity {
    pub opp_weight: f64,
    pub window_radius: u8,
    pub center_threshold: f64,
}

impl Heuristic for EnemyProximity {
    fn score(&self, state: &GameState, player: PlayerId) -> f64 {
        let m = mobility_differential(state, player, self.opp_weight);
        if m != 0.0 {
            return m;
        }
        let center = center_term(state, player, Decay::Linear);
        if center.abs() >= self.center_threshold {
            return center;
        }
        let density = window_density(state, player, self.window_radius);
        if density != 0.0 {
            return density;
        }
        let own = state.loc(player);
        let opp = state.loc(player.opponent());
        -(own.manhattan(opp) as f64)
    }
}

/// Registry names accepted by `heuristic_by_name`, in declaration order.
pub const HEURISTIC_NAMES: [&str; 6] = [
    "mobility",
    "mobility3",
    "center",
    "center-sqrt",
    "obstacle",
    "proximity",
];

/// Looks up an evaluation strategy by its registry name.
pub fn heuristic_by_name(name: &str) -> Option<Box<dyn Heuristic + Send + Sync>> {
    match name {
        "mobility" => Some(Box::new(MobilityDiff { opp_weight: 1.0 })),
        "mobility3" => Some(Box::new(MobilityDiff { opp_weight: 3.0 })),
        "center" => Some(Box::new(CenterSeeking {
            opp_weight: 3.0,
            decay: Decay::Linear,
        })),
        "center-sqrt" => Some(Box::new(CenterSeeking {
            opp_weight: 3.0,
            decay: Decay::Sqrt,
        })),
        "obstacle" => Some(Box::new(ObstacleAware {
            opp_weight: 3.0,
            window_radius: 2,
            lower: 0.25,
            upper: 0.75,
        })),
        "proximity" => Some(Box::new(EnemyProximity {
            opp_weight: 3.0,
            window_radius: 2,
            center_threshold: 1.0,
        })),
        _ => None,
    }
}

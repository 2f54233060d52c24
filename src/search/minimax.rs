//! Depth- and time-bounded minimax search.
//!
//! Alpha-beta pruned minimax over `GameState` with a per-call memo table
//! keyed by canonical position. Terminal values and heuristic leaf values
//! are never memoized: the former are cheap and viewpoint-specific, the
//! latter depend on the depth and time context in which they were taken.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::board::{Action, Board, Coord, GameState, PlayerId};
use crate::eval::Heuristic;

/// Errors from a search invocation.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search invoked on a position with no legal moves")]
    TerminalRoot,
}

/// Canonical position identity, independent of the path taken to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct MemoKey {
    board: Board,
    loc0: Coord,
    loc1: Coord,
    side: PlayerId,
}

impl MemoKey {
    fn of(state: &GameState) -> MemoKey {
        MemoKey {
            board: *state.board(),
            loc0: state.loc(PlayerId::P0),
            loc1: state.loc(PlayerId::P1),
            side: state.side_to_move(),
        }
    }
}

/// Outcome of a top-level search call.
#[derive(Debug, Clone, Copy)]
pub struct SearchResult {
    /// The best action found at the root.
    pub action: Action,
    /// Minimax value of that action from the root player's viewpoint.
    pub score: f64,
    /// Number of nodes expanded.
    pub nodes: u64,
    /// Wall-clock time spent in the call.
    pub elapsed: Duration,
}

/// One search invocation: owns the memo table, so the cache lives exactly
/// as long as one top-level move decision.
pub struct Searcher<'a> {
    heuristic: &'a (dyn Heuristic + Send + Sync),
    player: PlayerId,
    budget: Duration,
    use_memo: bool,
    start: Instant,
    memo: HashMap<MemoKey, f64>,
    nodes: u64,
}

impl<'a> Searcher<'a> {
    /// Creates a searcher for the given root player with the given
    /// expansion-time budget.
    pub fn new(
        heuristic: &'a (dyn Heuristic + Send + Sync),
        player: PlayerId,
        budget: Duration,
    ) -> Searcher<'a> {
        Searcher {
            heuristic,
            player,
            budget,
            use_memo: true,
            start: Instant::now(),
            memo: HashMap::new(),
            nodes: 0,
        }
    }

    /// Creates a searcher with memoization disabled. Slower, but useful
    /// as a reference for equivalence checks.
    pub fn without_memo(
        heuristic: &'a (dyn Heuristic + Send + Sync),
        player: PlayerId,
        budget: Duration,
    ) -> Searcher<'a> {
        Searcher {
            use_memo: false,
            ..Searcher::new(heuristic, player, budget)
        }
    }

    /// Picks the best action for the root player at the given depth.
    ///
    /// Every root action is evaluated through the minimizing role with a
    /// full alpha-beta window; ties resolve to the first action in
    /// enumeration order. Returns `SearchError::TerminalRoot` on a
    /// position with no legal moves.
    pub fn choose(&mut self, state: &GameState, depth: u32) -> Result<SearchResult, SearchError> {
        self.start = Instant::now();
        self.memo.clear();
        self.nodes = 0;

        let actions = state.actions();
        if actions.is_empty() {
            return Err(SearchError::TerminalRoot);
        }

        let mut best_action = actions[0];
        let mut best_value = f64::NEG_INFINITY;
        for (i, &action) in actions.iter().enumerate() {
            let value = self.min_value(
                &state.result(action),
                depth.saturating_sub(1),
                f64::NEG_INFINITY,
                f64::INFINITY,
            );
            if i == 0 || value > best_value {
                best_action = action;
                best_value = value;
            }
        }

        Ok(SearchResult {
            action: best_action,
            score: best_value,
            nodes: self.nodes,
            elapsed: self.start.elapsed(),
        })
    }

    /// True once the expansion budget is spent. Any node already entered
    /// runs to completion; the cutoff is observed at its children.
    fn out_of_time(&self) -> bool {
        self.start.elapsed() > self.budget
    }

    fn min_value(&mut self, state: &GameState, depth: u32, alpha: f64, mut beta: f64) -> f64 {
        let key = MemoKey::of(state);
        if self.use_memo {
            if let Some(&value) = self.memo.get(&key) {
                return value;
            }
        }
        if state.terminal_test() {
            return state.utility(self.player);
        }
        if depth == 0 || self.out_of_time() {
            return self.heuristic.score(state, self.player);
        }

        self.nodes += 1;
        let mut value = f64::INFINITY;
        for action in state.actions() {
            value = value.min(self.max_value(&state.result(action), depth - 1, alpha, beta));
            beta = beta.min(value);
            if beta <= alpha {
                break;
            }
        }
        if self.use_memo {
            self.memo.insert(key, value);
        }
        value
    }

    fn max_value(&mut self, state: &GameState, depth: u32, mut alpha: f64, beta: f64) -> f64 {
        let key = MemoKey::of(state);
        if self.use_memo {
            if let Some(&value) = self.memo.get(&key) {
                return value;
            }
        }
        if state.terminal_test() {
            return state.utility(self.player);
        }
        if depth == 0 || self.out_of_time() {
            return self.heuristic.score(state, self.player);
        }

        self.nodes += 1;
        let mut value = f64::NEG_INFINITY;
        for action in state.actions() {
            value = value.max(self.min_value(&state.result(action), depth - 1, alpha, beta));
            alpha = alpha.max(value);
            if alpha >= beta {
                break;
            }
        }
        if self.use_memo {
            self.memo.insert(key, value);
        }
        value
    }
}

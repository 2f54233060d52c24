//! Engine state management.
//!
//! Holds the current position, engine options, and the RNG used for
//! opening randomization, and runs search for the `go` command. The
//! expansion-time budget is kept well below any sane external per-move
//! deadline so a legal move is always delivered in time.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::archive::{Archive, DecisionRecord};
use crate::board::GameState;
use crate::eval::{heuristic_by_name, HEURISTIC_NAMES};
use crate::protocol::ifen::parse_ifen;
use crate::protocol::parser::GoParams;
use crate::search::Searcher;

/// Default expansion-time budget in milliseconds.
const DEFAULT_SEARCH_TIME_MS: u64 = 100;

/// Default nominal search depth in plies.
const DEFAULT_DEPTH: u32 = 10;

/// Default evaluation strategy.
const DEFAULT_HEURISTIC: &str = "center";

/// Plies below which the opening move is randomized instead of searched.
/// Opening moves carry little heuristic signal, and randomizing them
/// avoids deterministic, exploitable openings.
const OPENING_RANDOM_PLIES: u32 = 2;

/// Holds the mutable state of the engine between commands.
pub struct Engine {
    pub position: Option<GameState>,
    pub options: HashMap<String, String>,
    rng: SmallRng,
    archive: Option<Archive>,
}

impl Engine {
    /// Creates a new engine with no position set.
    pub fn new() -> Self {
        Engine {
            position: None,
            options: HashMap::new(),
            rng: SmallRng::from_entropy(),
            archive: None,
        }
    }

    /// Resets all engine state for a new game.
    pub fn new_game(&mut self) {
        self.position = None;
    }

    /// Sets the current position from an IFEN string, or to the
    /// conventional starting position for the literal `startpos`.
    /// Returns an error message on failure.
    pub fn set_position(&mut self, input: &str) -> Result<(), String> {
        if input == "startpos" {
            self.position = Some(GameState::initial());
            return Ok(());
        }
        match parse_ifen(input) {
            Ok(state) => {
                self.position = Some(state);
                Ok(())
            }
            Err(e) => Err(format!("failed to parse IFEN: {}", e)),
        }
    }

    /// Sets an engine option. The `Archive` option opens the decision
    /// archive at the given path; a failure to open is logged and leaves
    /// archival disabled.
    pub fn set_option(&mut self, name: String, value: Option<String>) {
        let value = value.unwrap_or_default();
        if name == "Archive" {
            if value.is_empty() {
                self.archive = None;
            } else {
                match Archive::open(Path::new(&value)) {
                    Ok(archive) => self.archive = Some(archive),
                    Err(e) => eprintln!("archive: failed to open '{}': {}", value, e),
                }
            }
        }
        self.options.insert(name, value);
    }

    /// Returns the configured expansion budget from options, or the default.
    fn movetime(&self) -> Duration {
        let ms = self
            .options
            .get("SearchTime")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_SEARCH_TIME_MS);
        Duration::from_millis(ms)
    }

    /// Returns the configured search depth from options, or the default.
    fn depth(&self) -> u32 {
        self.options
            .get("Depth")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_DEPTH)
    }

    /// Returns the configured heuristic name from options, or the default.
    fn heuristic_name(&self) -> String {
        self.options
            .get("Heuristic")
            .cloned()
            .unwrap_or_else(|| DEFAULT_HEURISTIC.to_string())
    }

    /// Handles the III handshake: writes id, options, protocol_version,
    /// and iiiok.
    pub fn handle_iii<W: Write>(&self, out: &mut W) {
        writeln!(out, "id name knightfall").unwrap();
        writeln!(out, "id author knightfall").unwrap();
        writeln!(
            out,
            "option name SearchTime type spin default {} min 1 max 60000",
            DEFAULT_SEARCH_TIME_MS
        )
        .unwrap();
        writeln!(
            out,
            "option name Depth type spin default {} min 1 max 64",
            DEFAULT_DEPTH
        )
        .unwrap();
        let variants: Vec<String> = HEURISTIC_NAMES
            .iter()
            .map(|n| format!("var {}", n))
            .collect();
        writeln!(
            out,
            "option name Heuristic type combo default {} {}",
            DEFAULT_HEURISTIC,
            variants.join(" ")
        )
        .unwrap();
        writeln!(out, "option name Archive type string default").unwrap();
        writeln!(out, "protocol_version 1").unwrap();
        writeln!(out, "iiiok").unwrap();
        out.flush().unwrap();
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) {
        writeln!(out, "readyok").unwrap();
        out.flush().unwrap();
    }

    /// Handles the `go` command: randomizes the move below the opening
    /// ply threshold, otherwise searches at the configured depth with the
    /// configured heuristic, then emits `bestmove`.
    pub fn handle_go<W: Write>(&mut self, out: &mut W, params: &GoParams) {
        let state = match &self.position {
            Some(s) => s.clone(),
            None => {
                eprintln!("go: no position set");
                return;
            }
        };

        let actions = state.actions();
        if actions.is_empty() {
            eprintln!("go: side to move has no legal moves");
            return;
        }

        if state.ply_count() < OPENING_RANDOM_PLIES {
            let action = actions[self.rng.gen_range(0..actions.len())];
            writeln!(out, "bestmove {}", action.square()).unwrap();
            out.flush().unwrap();
            return;
        }

        let depth = params.depth.unwrap_or_else(|| self.depth());
        let movetime = params
            .movetime
            .map(Duration::from_millis)
            .unwrap_or_else(|| self.movetime());
        let name = self.heuristic_name();
        let heuristic = match heuristic_by_name(&name) {
            Some(h) => h,
            None => {
                eprintln!("unknown heuristic '{}', using {}", name, DEFAULT_HEURISTIC);
                heuristic_by_name(DEFAULT_HEURISTIC).unwrap()
            }
        };

        let player = state.side_to_move();
        let mut searcher = Searcher::new(heuristic.as_ref(), player, movetime);
        let action = match searcher.choose(&state, depth) {
            Ok(result) => {
                writeln!(
                    out,
                    "info depth {} nodes {} score {} time {}",
                    depth,
                    result.nodes,
                    result.score,
                    result.elapsed.as_millis()
                )
                .unwrap();
                self.archive_decision(&state, result.score);
                result.action
            }
            Err(e) => {
                // The empty-actions guard above makes this unreachable,
                // but a legal move must go out either way.
                eprintln!("search failed: {}", e);
                actions[self.rng.gen_range(0..actions.len())]
            }
        };

        writeln!(out, "bestmove {}", action.square()).unwrap();
        out.flush().unwrap();
    }

    /// Hands a completed decision to the archive, if one is configured.
    /// Archive failures never influence move selection.
    fn archive_decision(&mut self, state: &GameState, value: f64) {
        if let Some(archive) = self.archive.as_mut() {
            let record = DecisionRecord::of(state, value);
            if let Err(e) = archive.record(&record) {
                eprintln!("archive: {}", e);
            }
        }
    }
}

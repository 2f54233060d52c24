//! Self-play game generation.
//!
//! Plays full Isolation games engine-vs-engine, using the search to
//! select moves on both sides. Records the position, chosen move, and
//! searched value at every ply for later analysis or archival.

use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::archive::{Archive, ArchiveError, DecisionRecord};
use crate::board::GameState;
use crate::eval::heuristic_by_name;
use crate::protocol::ifen::{encode_ifen, parse_ifen};
use crate::search::Searcher;

/// Plies below which moves are randomized rather than searched.
const OPENING_RANDOM_PLIES: u32 = 2;

/// Configuration for self-play game generation.
#[derive(Clone)]
pub struct SelfPlayConfig {
    /// Number of games to play.
    pub num_games: usize,
    /// Expansion-time budget per move search (milliseconds).
    pub movetime_ms: u64,
    /// Nominal search depth in plies.
    pub depth: u32,
    /// Registry name of the evaluation strategy for both sides.
    pub heuristic: String,
    /// Maximum game length before forced termination.
    pub max_plies: u32,
    /// Number of parallel threads for concurrent games.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Suppress per-game progress output.
    pub quiet: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 10,
            movetime_ms: 100,
            depth: 6,
            heuristic: "center".to_string(),
            max_plies: 200,
            threads: 4,
            seed: 0,
            quiet: false,
        }
    }
}

/// A single recorded move from a self-play game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Ply at which the move was made.
    pub ply: u32,
    /// The player who moved, 0 or 1.
    pub player: u8,
    /// IFEN of the position before the move.
    pub ifen: String,
    /// Destination square of the chosen move.
    pub action: String,
    /// Root value of the searched move, when finite. Randomized opening
    /// moves and proven win/loss values carry no finite score.
    pub score: Option<f64>,
    /// Nodes expanded by the search for this move.
    pub nodes: u64,
}

/// A complete self-play game record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    /// Sequential game ID.
    pub game_id: usize,
    /// The winning player, or `None` if the game hit the ply limit.
    pub winner: Option<u8>,
    /// Total plies played.
    pub plies: u32,
    /// Every move of the game in order.
    pub moves: Vec<MoveRecord>,
}

/// Plays a single game to completion and records every move.
pub fn play_game(config: &SelfPlayConfig, game_id: usize, rng: &mut SmallRng) -> GameRecord {
    let heuristic = heuristic_by_name(&config.heuristic)
        .unwrap_or_else(|| heuristic_by_name("center").expect("default heuristic exists"));
    let movetime = Duration::from_millis(config.movetime_ms);

    let mut state = GameState::initial();
    let mut moves = Vec::new();

    while !state.terminal_test() && state.ply_count() < config.max_plies {
        let player = state.side_to_move();
        let actions = state.actions();
        let ifen = encode_ifen(&state);

        let (action, score, nodes) = if state.ply_count() < OPENING_RANDOM_PLIES {
            (actions[rng.gen_range(0..actions.len())], None, 0)
        } else {
            let mut searcher = Searcher::new(heuristic.as_ref(), player, movetime);
            match searcher.choose(&state, config.depth) {
                Ok(result) => (
                    result.action,
                    result.score.is_finite().then_some(result.score),
                    result.nodes,
                ),
                Err(_) => (actions[rng.gen_range(0..actions.len())], None, 0),
            }
        };

        moves.push(MoveRecord {
            ply: state.ply_count(),
            player: player.digit(),
            ifen,
            action: action.square(),
            score,
            nodes,
        });
        state = state.result(action);
    }

    let winner = if state.terminal_test() {
        // The stuck side to move has lost.
        Some(state.side_to_move().opponent().digit())
    } else {
        None
    };

    GameRecord {
        game_id,
        winner,
        plies: state.ply_count(),
        moves,
    }
}

/// Runs self-play generation, producing multiple game records.
///
/// When `config.threads > 1`, games are played concurrently using rayon.
pub fn run_self_play(config: &SelfPlayConfig) -> Vec<GameRecord> {
    let mut games = Vec::with_capacity(config.num_games);
    run_self_play_with_callback(config, |game| {
        games.push(game);
    });
    games
}

/// Runs self-play generation, calling `on_game` with each completed game
/// record so the caller can process games incrementally.
pub fn run_self_play_with_callback<F>(config: &SelfPlayConfig, on_game: F)
where
    F: FnMut(GameRecord) + Send,
{
    if config.threads > 1 {
        run_self_play_parallel(config, on_game);
    } else {
        run_self_play_sequential(config, on_game);
    }
}

/// Sequential self-play: plays games one at a time.
fn run_self_play_sequential<F>(config: &SelfPlayConfig, mut on_game: F)
where
    F: FnMut(GameRecord),
{
    let mut rng = if config.seed != 0 {
        SmallRng::seed_from_u64(config.seed)
    } else {
        SmallRng::from_entropy()
    };

    for i in 0..config.num_games {
        let game_start = Instant::now();
        let game = play_game(config, i, &mut rng);
        if !config.quiet {
            report_game(&game, i + 1, config.num_games, game_start.elapsed());
        }
        on_game(game);
    }
}

/// Parallel self-play: plays games concurrently using rayon. A channel
/// delivers completed games to the callback on the calling thread.
fn run_self_play_parallel<F>(config: &SelfPlayConfig, mut on_game: F)
where
    F: FnMut(GameRecord) + Send,
{
    use rayon::prelude::*;
    use std::sync::mpsc;

    let completed = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<GameRecord>();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
        .expect("failed to build rayon thread pool");

    let config_clone = config.clone();
    let handle = std::thread::spawn(move || {
        pool.install(|| {
            (0..config_clone.num_games)
                .into_par_iter()
                .for_each_with(tx, |tx, i| {
                    let mut rng = if config_clone.seed != 0 {
                        SmallRng::seed_from_u64(config_clone.seed.wrapping_add(i as u64))
                    } else {
                        SmallRng::from_entropy()
                    };
                    let game_start = Instant::now();
                    let game = play_game(&config_clone, i, &mut rng);
                    if !config_clone.quiet {
                        let n = completed.fetch_add(1, Ordering::Relaxed) + 1;
                        report_game(&game, n, config_clone.num_games, game_start.elapsed());
                    }
                    let _ = tx.send(game);
                });
        });
    });

    for game in rx {
        on_game(game);
    }

    handle.join().expect("selfplay worker thread panicked");
}

/// Prints one per-game progress line to stderr.
fn report_game(game: &GameRecord, n: usize, total: usize, elapsed: Duration) {
    let outcome = match game.winner {
        Some(w) => format!("player {} wins", w),
        None => "unfinished".to_string(),
    };
    eprintln!(
        "Game {}/{}: {} in {} plies ({:.1}s)",
        n,
        total,
        outcome,
        game.plies,
        elapsed.as_secs_f64(),
    );
}

/// Feeds every searched decision from the games into the archive at
/// `path`. Duplicate positions are skipped, as are moves without a
/// finite score. Returns the number of records written.
pub fn archive_games(games: &[GameRecord], path: &Path) -> Result<usize, ArchiveError> {
    let mut archive = Archive::open(path)?;
    let mut written = 0;
    for game in games {
        for m in &game.moves {
            let Some(value) = m.score else { continue };
            let Ok(state) = parse_ifen(&m.ifen) else { continue };
            match archive.record(&DecisionRecord::of(&state, value)) {
                Ok(()) => written += 1,
                Err(ArchiveError::DuplicateKey(_)) => {}
                Err(e) => return Err(e),
            }
        }
    }
    Ok(written)
}

/// Writes game records as JSONL (one JSON object per game, one per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> std::io::Result<()> {
    for game in games {
        let line = serde_json::to_string(game)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        writeln!(out, "{}", line)?;
    }
    out.flush()
}

/// Prints aggregate win and game-length statistics to stderr.
pub fn print_summary(games: &[GameRecord]) {
    let mut wins = [0usize; 2];
    let mut unfinished = 0usize;
    let mut total_plies = 0u64;
    for game in games {
        match game.winner {
            Some(0) => wins[0] += 1,
            Some(1) => wins[1] += 1,
            _ => unfinished += 1,
        }
        total_plies += game.plies as u64;
    }
    eprintln!(
        "Player 0 wins: {}, player 1 wins: {}, unfinished: {}",
        wins[0], wins[1], unfinished
    );
    if !games.is_empty() {
        eprintln!(
            "Average game length: {:.1} plies",
            total_plies as f64 / games.len() as f64
        );
    }
}

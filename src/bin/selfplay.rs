//! Self-play game generation CLI.
//!
//! Plays Isolation games via self-play and outputs game records as JSONL.
//!
//! Usage:
//!   cargo run --release --bin selfplay -- [OPTIONS]
//!
//! Options:
//!   --games N       Number of games to play (default: 10)
//!   --movetime MS   Expansion budget per move in ms (default: 100)
//!   --depth N       Search depth in plies (default: 6)
//!   --heuristic H   Evaluation strategy name (default: center)
//!   --threads N     Number of parallel threads (default: 4)
//!   --seed N        Random seed, 0 for entropy (default: 0)
//!   --output FILE   Output file path (default: stdout)
//!   --archive FILE  Also archive searched decisions as JSONL
//!   --quiet         Suppress summary output

use std::env;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use std::time::Instant;

use knightfall::selfplay::{self, SelfPlayConfig};

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut config = SelfPlayConfig::default();
    let mut output_path: Option<String> = None;
    let mut archive_path: Option<String> = None;
    let mut quiet = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => {
                i += 1;
                config.num_games = args[i].parse().expect("invalid --games value");
            }
            "--movetime" => {
                i += 1;
                config.movetime_ms = args[i].parse().expect("invalid --movetime value");
            }
            "--depth" => {
                i += 1;
                config.depth = args[i].parse().expect("invalid --depth value");
            }
            "--heuristic" => {
                i += 1;
                config.heuristic = args[i].clone();
            }
            "--threads" => {
                i += 1;
                config.threads = args[i].parse().expect("invalid --threads value");
            }
            "--seed" => {
                i += 1;
                config.seed = args[i].parse().expect("invalid --seed value");
            }
            "--output" => {
                i += 1;
                output_path = Some(args[i].clone());
            }
            "--archive" => {
                i += 1;
                archive_path = Some(args[i].clone());
            }
            "--quiet" => {
                quiet = true;
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    config.quiet = quiet;

    if !quiet {
        eprintln!(
            "Self-play: {} games, {}ms/move, depth {}, heuristic {}, {} threads",
            config.num_games, config.movetime_ms, config.depth, config.heuristic, config.threads
        );
    }

    let start = Instant::now();
    let games = selfplay::run_self_play(&config);
    let elapsed = start.elapsed();

    if !quiet {
        eprintln!(
            "Completed {} games in {:.1}s",
            games.len(),
            elapsed.as_secs_f64()
        );
        selfplay::print_summary(&games);
    }

    if let Some(path) = archive_path {
        match selfplay::archive_games(&games, Path::new(&path)) {
            Ok(n) => {
                if !quiet {
                    eprintln!("Archived {} decisions to {}", n, path);
                }
            }
            Err(e) => eprintln!("archive: {}", e),
        }
    }

    match output_path {
        Some(path) => {
            let file = File::create(&path).expect("failed to create output file");
            let mut writer = BufWriter::new(file);
            selfplay::write_jsonl(&games, &mut writer).expect("failed to write output");
            if !quiet {
                eprintln!("Wrote {} games to {}", games.len(), path);
            }
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            selfplay::write_jsonl(&games, &mut writer).expect("failed to write output");
        }
    }
}

fn print_usage() {
    eprintln!("Usage: selfplay [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --games N        Number of games to play (default: 10)");
    eprintln!("  --movetime MS    Expansion budget per move in ms (default: 100)");
    eprintln!("  --depth N        Search depth in plies (default: 6)");
    eprintln!("  --heuristic H    Evaluation strategy name (default: center)");
    eprintln!("  --threads N      Number of parallel threads (default: 4)");
    eprintln!("  --seed N         Random seed, 0 for entropy (default: 0)");
    eprintln!("  --output FILE    Output file path (default: stdout)");
    eprintln!("  --archive FILE   Also archive searched decisions as JSONL");
    eprintln!("  --quiet          Suppress summary output");
    eprintln!("  --help           Show this help");
}

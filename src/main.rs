//! Knightfall -- an Isolation engine implementing the III protocol.
//!
//! This binary reads commands from stdin and writes responses to stdout,
//! following the III (Isolation Interface) convention.

use std::io::{self, BufRead};

use knightfall::engine::Engine;
use knightfall::protocol::parser::{parse_command, Command};

/// Runs the main III protocol loop, reading commands from stdin
/// and writing responses to stdout.
fn main() {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut engine = Engine::new();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        match cmd {
            Command::Iii => {
                engine.handle_iii(&mut out);
            }
            Command::IsReady => {
                engine.handle_isready(&mut out);
            }
            Command::SetOption { name, value } => {
                engine.set_option(name, value);
            }
            Command::NewGame => {
                engine.new_game();
            }
            Command::Position { ifen } => {
                if let Err(e) = engine.set_position(&ifen) {
                    eprintln!("{}", e);
                }
            }
            Command::Go(params) => {
                engine.handle_go(&mut out, &params);
            }
            Command::Stop => {
                // No async search to interrupt; no-op
            }
            Command::Quit => {
                break;
            }
        }
    }
}

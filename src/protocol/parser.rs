//! III command parser.
//!
//! Parses incoming III protocol commands from raw text into structured
//! `Command` variants that the engine main loop can dispatch on.

/// Search constraints passed with the `go` command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GoParams {
    pub movetime: Option<u64>,
    pub depth: Option<u32>,
}

/// A parsed server-to-engine III command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Initialize the III protocol handshake.
    Iii,

    /// Synchronization ping; engine must reply `readyok`.
    IsReady,

    /// Set an engine option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Reset engine state for a new game.
    NewGame,

    /// Set the position from an IFEN string or the literal `startpos`.
    Position { ifen: String },

    /// Begin calculating a move with optional search constraints.
    Go(GoParams),

    /// Interrupt the current search immediately.
    Stop,

    /// Terminate the engine process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging to stderr.
pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    match tokens[0] {
        "iii" => Some(Command::Iii),
        "isready" => Some(Command::IsReady),
        "quit" => Some(Command::Quit),
        "newgame" => Some(Command::NewGame),
        "stop" => Some(Command::Stop),

        "setoption" => parse_setoption(&tokens),
        "position" => parse_position(&tokens),
        "go" => parse_go(&tokens),

        other => {
            eprintln!("unknown command: {}", other);
            None
        }
    }
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 3 || tokens[1] != "name" {
        eprintln!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }

    let value_idx = tokens.iter().position(|&t| t == "value");

    let (name, value) = match value_idx {
        Some(vi) => {
            let name_parts = &tokens[2..vi];
            let value_parts = &tokens[vi + 1..];
            if name_parts.is_empty() {
                eprintln!("malformed setoption: empty name");
                return None;
            }
            let name = name_parts.join(" ");
            let value = if value_parts.is_empty() {
                None
            } else {
                Some(value_parts.join(" "))
            };
            (name, value)
        }
        None => (tokens[2..].join(" "), None),
    };

    Some(Command::SetOption { name, value })
}

/// Parses `position <ifen>` (or `position startpos`).
fn parse_position(tokens: &[&str]) -> Option<Command> {
    if tokens.len() != 2 {
        eprintln!("malformed position: expected 'position <ifen>'");
        return None;
    }
    Some(Command::Position {
        ifen: tokens[1].to_string(),
    })
}

/// Parses `go [movetime <ms>] [depth <plies>]`.
fn parse_go(tokens: &[&str]) -> Option<Command> {
    let mut params = GoParams::default();
    let mut i = 1;
    while i < tokens.len() {
        match tokens[i] {
            "movetime" => {
                i += 1;
                let Some(ms) = tokens.get(i).and_then(|t| t.parse().ok()) else {
                    eprintln!("malformed go: movetime expects a millisecond count");
                    return None;
                };
                params.movetime = Some(ms);
            }
            "depth" => {
                i += 1;
                let Some(d) = tokens.get(i).and_then(|t| t.parse().ok()) else {
                    eprintln!("malformed go: depth expects a ply count");
                    return None;
                };
                params.depth = Some(d);
            }
            other => {
                eprintln!("malformed go: unknown parameter '{}'", other);
                return None;
            }
        }
        i += 1;
    }
    Some(Command::Go(params))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_commands() {
        assert_eq!(parse_command("iii"), Some(Command::Iii));
        assert_eq!(parse_command("isready"), Some(Command::IsReady));
        assert_eq!(parse_command("newgame"), Some(Command::NewGame));
        assert_eq!(parse_command("stop"), Some(Command::Stop));
        assert_eq!(parse_command("quit"), Some(Command::Quit));
    }

    #[test]
    fn ignores_empty_and_unknown_lines() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("   "), None);
        assert_eq!(parse_command("frobnicate"), None);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(parse_command("  isready  "), Some(Command::IsReady));
    }

    #[test]
    fn parses_setoption_with_value() {
        assert_eq!(
            parse_command("setoption name Depth value 6"),
            Some(Command::SetOption {
                name: "Depth".to_string(),
                value: Some("6".to_string()),
            })
        );
    }

    #[test]
    fn parses_setoption_without_value() {
        assert_eq!(
            parse_command("setoption name Archive"),
            Some(Command::SetOption {
                name: "Archive".to_string(),
                value: None,
            })
        );
    }

    #[test]
    fn rejects_malformed_setoption() {
        assert_eq!(parse_command("setoption"), None);
        assert_eq!(parse_command("setoption Depth 6"), None);
    }

    #[test]
    fn parses_position() {
        assert_eq!(
            parse_command("position startpos"),
            Some(Command::Position {
                ifen: "startpos".to_string(),
            })
        );
        let ifen = "...........|...........|...........|...........|...........|...........|...........|...........|.........../c5/i5/0";
        assert_eq!(
            parse_command(&format!("position {}", ifen)),
            Some(Command::Position {
                ifen: ifen.to_string(),
            })
        );
    }

    #[test]
    fn rejects_position_without_argument() {
        assert_eq!(parse_command("position"), None);
    }

    #[test]
    fn parses_go_with_params() {
        assert_eq!(parse_command("go"), Some(Command::Go(GoParams::default())));
        assert_eq!(
            parse_command("go movetime 250"),
            Some(Command::Go(GoParams {
                movetime: Some(250),
                depth: None,
            }))
        );
        assert_eq!(
            parse_command("go depth 4 movetime 50"),
            Some(Command::Go(GoParams {
                movetime: Some(50),
                depth: Some(4),
            }))
        );
    }

    #[test]
    fn rejects_malformed_go() {
        assert_eq!(parse_command("go movetime"), None);
        assert_eq!(parse_command("go depth soon"), None);
        assert_eq!(parse_command("go sideways"), None);
    }
}

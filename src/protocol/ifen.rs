//! IFEN (Isolation FEN) encoding and decoding.
//!
//! IFEN is a compact string notation for a full Isolation position,
//! inspired by chess FEN. Format: `<rows>/<p0>/<p1>/<ply>` where `rows`
//! is nine `|`-separated row strings of eleven cells ('.' open, '#'
//! blocked) from the top of the board down, `p0` and `p1` are algebraic
//! squares, and `ply` is the number of plies played. The side to move
//! follows from ply parity and is not encoded separately.

use crate::board::{Board, Cell, Coord, GameState, PlayerId, HEIGHT, WIDTH};

/// Errors that can occur during IFEN parsing.
#[derive(Debug, thiserror::Error)]
pub enum IfenError {
    #[error("expected 4 sections separated by '/', got {0}")]
    WrongSectionCount(usize),

    #[error("expected 9 rows, got {0}")]
    WrongRowCount(usize),

    #[error("row {row} has {len} cells, expected 11")]
    WrongRowLength { row: usize, len: usize },

    #[error("invalid cell character: '{0}'")]
    InvalidCell(char),

    #[error("invalid square: '{0}'")]
    InvalidSquare(String),

    #[error("invalid ply count: '{0}'")]
    InvalidPly(String),

    #[error("player positions coincide at '{0}'")]
    CoincidentPlayers(String),

    #[error("player standing on a blocked cell at '{0}'")]
    PlayerOnBlocked(String),
}

/// Encodes the cell grid as nine '|'-separated row strings.
pub fn encode_rows(board: &Board) -> String {
    let mut rows = Vec::with_capacity(HEIGHT);
    for row in 0..HEIGHT {
        let mut line = String::with_capacity(WIDTH);
        for col in 0..WIDTH {
            line.push(board.cell(Coord::new(row as u8, col as u8)).ifen_char());
        }
        rows.push(line);
    }
    rows.join("|")
}

/// Parses the row section into a cell grid.
fn parse_rows(s: &str) -> Result<Board, IfenError> {
    let rows: Vec<&str> = s.split('|').collect();
    if rows.len() != HEIGHT {
        return Err(IfenError::WrongRowCount(rows.len()));
    }

    let mut board = Board::open();
    for (row, line) in rows.iter().enumerate() {
        let cells: Vec<char> = line.chars().collect();
        if cells.len() != WIDTH {
            return Err(IfenError::WrongRowLength {
                row,
                len: cells.len(),
            });
        }
        for (col, &c) in cells.iter().enumerate() {
            match Cell::from_ifen_char(c) {
                Some(Cell::Open) => {}
                Some(Cell::Blocked) => board.block(Coord::new(row as u8, col as u8)),
                None => return Err(IfenError::InvalidCell(c)),
            }
        }
    }
    Ok(board)
}

/// Parses an algebraic square section.
fn parse_square(s: &str) -> Result<Coord, IfenError> {
    Coord::from_square(s).ok_or_else(|| IfenError::InvalidSquare(s.to_string()))
}

/// Encodes a full game state as IFEN.
pub fn encode_ifen(state: &GameState) -> String {
    format!(
        "{}/{}/{}/{}",
        encode_rows(state.board()),
        state.loc(PlayerId::P0).square(),
        state.loc(PlayerId::P1).square(),
        state.ply_count()
    )
}

/// Parses an IFEN string into a game state, validating shape, bounds,
/// distinct player positions, and that neither player stands on a
/// blocked cell.
pub fn parse_ifen(s: &str) -> Result<GameState, IfenError> {
    let sections: Vec<&str> = s.split('/').collect();
    if sections.len() != 4 {
        return Err(IfenError::WrongSectionCount(sections.len()));
    }

    let board = parse_rows(sections[0])?;
    let p0 = parse_square(sections[1])?;
    let p1 = parse_square(sections[2])?;
    let ply: u32 = sections[3]
        .parse()
        .map_err(|_| IfenError::InvalidPly(sections[3].to_string()))?;

    if p0 == p1 {
        return Err(IfenError::CoincidentPlayers(p0.square()));
    }
    for loc in [p0, p1] {
        if !board.is_open(loc) {
            return Err(IfenError::PlayerOnBlocked(loc.square()));
        }
    }

    Ok(GameState::new(board, p0, p1, ply))
}

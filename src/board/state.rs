//! Game state representation.
//!
//! Holds the complete snapshot of an Isolation game at a given point in
//! time: the cell grid, both knight positions, and the ply count. States
//! are immutable; `result` produces a successor by copy-on-write and never
//! mutates the parent.

use super::grid::{Cell, Coord, CELL_COUNT, HEIGHT, KNIGHT_OFFSETS, WIDTH};

/// One of the two players. Player 0 moves on even plies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerId {
    P0,
    P1,
}

impl PlayerId {
    /// Returns the other player.
    pub const fn opponent(self) -> PlayerId {
        match self {
            PlayerId::P0 => PlayerId::P1,
            PlayerId::P1 => PlayerId::P0,
        }
    }

    /// Index into per-player arrays.
    pub const fn index(self) -> usize {
        match self {
            PlayerId::P0 => 0,
            PlayerId::P1 => 1,
        }
    }

    /// Returns the single-digit protocol abbreviation.
    pub const fn digit(self) -> u8 {
        self.index() as u8
    }

    /// Parses a player from its single-digit abbreviation.
    pub fn from_digit(d: u8) -> Option<PlayerId> {
        match d {
            0 => Some(PlayerId::P0),
            1 => Some(PlayerId::P1),
            _ => None,
        }
    }
}

/// The cell grid.
///
/// Invariant: the Blocked set is exactly the set of cells either player
/// has vacated, plus any obstacles present at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    /// Creates a board with every cell open.
    pub fn open() -> Board {
        Board {
            cells: [Cell::Open; CELL_COUNT],
        }
    }

    /// Returns the state of a cell.
    pub fn cell(&self, at: Coord) -> Cell {
        self.cells[at.index()]
    }

    /// Returns true if the cell is open.
    pub fn is_open(&self, at: Coord) -> bool {
        self.cells[at.index()] == Cell::Open
    }

    /// Marks a cell blocked.
    pub fn block(&mut self, at: Coord) {
        self.cells[at.index()] = Cell::Blocked;
    }

    /// Number of blocked cells on the board.
    pub fn blocked_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Blocked).count()
    }
}

/// A legal move: the destination cell of a knight jump. Valid only
/// relative to the state whose `actions()` produced it.
pub type Action = Coord;

/// Complete game state at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameState {
    board: Board,
    locs: [Coord; 2],
    ply_count: u32,
}

impl GameState {
    /// Creates a state from its parts. Panics if the player positions
    /// coincide or stand on blocked cells.
    pub fn new(board: Board, loc0: Coord, loc1: Coord, ply_count: u32) -> GameState {
        assert!(loc0 != loc1, "player positions must be distinct");
        assert!(
            board.is_open(loc0) && board.is_open(loc1),
            "player positions must be open cells"
        );
        GameState {
            board,
            locs: [loc0, loc1],
            ply_count,
        }
    }

    /// The conventional two-knight starting position: an empty board with
    /// the players facing each other across the center.
    pub fn initial() -> GameState {
        GameState::new(Board::open(), Coord::new(4, 2), Coord::new(4, 8), 0)
    }

    /// The cell grid.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The given player's position.
    pub fn loc(&self, player: PlayerId) -> Coord {
        self.locs[player.index()]
    }

    /// Number of plies played so far.
    pub fn ply_count(&self) -> u32 {
        self.ply_count
    }

    /// The player whose turn it is.
    pub fn side_to_move(&self) -> PlayerId {
        if self.ply_count % 2 == 0 {
            PlayerId::P0
        } else {
            PlayerId::P1
        }
    }

    /// Cells reachable from `from` by one knight move: in-bounds, open,
    /// and not occupied by either player. Enumerated in the fixed order
    /// of the knight-offset table.
    pub fn liberties(&self, from: Coord) -> Vec<Coord> {
        let mut out = Vec::with_capacity(8);
        for (dr, dc) in KNIGHT_OFFSETS {
            if let Some(to) = from.offset(dr, dc) {
                if self.board.is_open(to) && to != self.locs[0] && to != self.locs[1] {
                    out.push(to);
                }
            }
        }
        out
    }

    /// All legal moves for the side to move. Empty means that side has no
    /// moves and loses.
    pub fn actions(&self) -> Vec<Action> {
        self.liberties(self.loc(self.side_to_move()))
    }

    /// True iff the side to move has no legal moves.
    pub fn terminal_test(&self) -> bool {
        self.actions().is_empty()
    }

    /// Game value for `player`. Defined only on terminal states: the
    /// stuck side to move has lost.
    pub fn utility(&self, player: PlayerId) -> f64 {
        debug_assert!(
            self.terminal_test(),
            "utility is defined only on terminal states"
        );
        if player == self.side_to_move() {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        }
    }

    /// Applies an action: blocks the mover's vacated cell, moves the
    /// mover to the target cell, and advances the ply count (which flips
    /// the side to move). Panics if `action` was not produced by this
    /// state's own `actions()`.
    pub fn result(&self, action: Action) -> GameState {
        let mover = self.side_to_move();
        let from = self.loc(mover);
        assert!(
            self.actions().contains(&action),
            "illegal action {} from {}",
            action.square(),
            from.square()
        );

        let mut board = self.board;
        board.block(from);
        let mut locs = self.locs;
        locs[mover.index()] = action;
        GameState {
            board,
            locs,
            ply_count: self.ply_count + 1,
        }
    }

    /// Projects the position into a 9x11 grid for heuristic consumption:
    /// `perspective`'s cell is -1, the opponent's cell is 2, blocked cells
    /// are 0, and open cells are 1. Row 0 is the top of the board.
    pub fn obstacles_matrix(&self, perspective: PlayerId) -> [[i8; WIDTH]; HEIGHT] {
        let mut grid = [[0i8; WIDTH]; HEIGHT];
        for row in 0..HEIGHT {
            for col in 0..WIDTH {
                let at = Coord::new(row as u8, col as u8);
                grid[row][col] = match self.board.cell(at) {
                    Cell::Open => 1,
                    Cell::Blocked => 0,
                };
            }
        }
        let own = self.loc(perspective);
        let opp = self.loc(perspective.opponent());
        grid[own.row as usize][own.col as usize] = -1;
        grid[opp.row as usize][opp.col as usize] = 2;
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocked_board(cells: &[Coord]) -> Board {
        let mut board = Board::open();
        for &c in cells {
            board.block(c);
        }
        board
    }

    #[test]
    fn initial_state_is_open_and_at_ply_zero() {
        let state = GameState::initial();
        assert_eq!(state.ply_count(), 0);
        assert_eq!(state.side_to_move(), PlayerId::P0);
        assert_eq!(state.board().blocked_count(), 0);
        assert_ne!(state.loc(PlayerId::P0), state.loc(PlayerId::P1));
    }

    #[test]
    fn side_to_move_follows_ply_parity() {
        let board = Board::open();
        let s0 = GameState::new(board, Coord::new(0, 0), Coord::new(8, 10), 0);
        assert_eq!(s0.side_to_move(), PlayerId::P0);
        let s1 = GameState::new(board, Coord::new(0, 0), Coord::new(8, 10), 1);
        assert_eq!(s1.side_to_move(), PlayerId::P1);
    }

    #[test]
    fn liberties_in_open_center() {
        let state = GameState::new(Board::open(), Coord::new(4, 5), Coord::new(0, 0), 0);
        // All eight knight jumps from the center stay on the board.
        assert_eq!(state.liberties(Coord::new(4, 5)).len(), 8);
    }

    #[test]
    fn liberties_clipped_at_corner() {
        let state = GameState::new(Board::open(), Coord::new(0, 0), Coord::new(8, 10), 0);
        let libs = state.liberties(Coord::new(0, 0));
        assert_eq!(libs.len(), 2);
        assert!(libs.contains(&Coord::new(1, 2)));
        assert!(libs.contains(&Coord::new(2, 1)));
    }

    #[test]
    fn liberties_exclude_blocked_and_occupied() {
        let board = blocked_board(&[Coord::new(1, 2)]);
        // The opponent sits on the other knight target from a1.
        let state = GameState::new(board, Coord::new(0, 0), Coord::new(2, 1), 0);
        assert!(state.liberties(Coord::new(0, 0)).is_empty());
    }

    #[test]
    fn result_blocks_vacated_cell_and_flips_side() {
        let state = GameState::new(Board::open(), Coord::new(4, 5), Coord::new(0, 0), 0);
        let action = state.actions()[0];
        let next = state.result(action);

        assert_eq!(next.ply_count(), 1);
        assert_eq!(next.side_to_move(), PlayerId::P1);
        assert_eq!(next.loc(PlayerId::P0), action);
        assert!(!next.board().is_open(Coord::new(4, 5)));
        // The parent is untouched.
        assert_eq!(state.ply_count(), 0);
        assert!(state.board().is_open(Coord::new(4, 5)));
    }

    #[test]
    #[should_panic(expected = "illegal action")]
    fn result_rejects_foreign_action() {
        let state = GameState::initial();
        // One square sideways is not a knight move.
        state.result(Coord::new(4, 3));
    }

    #[test]
    fn terminal_and_utility() {
        // P1 to move, both of the corner's knight targets blocked.
        let board = blocked_board(&[Coord::new(6, 9), Coord::new(7, 8)]);
        let state = GameState::new(board, Coord::new(0, 0), Coord::new(8, 10), 3);

        assert!(state.terminal_test());
        assert_eq!(state.utility(PlayerId::P1), f64::NEG_INFINITY);
        assert_eq!(state.utility(PlayerId::P0), f64::INFINITY);
    }

    #[test]
    fn non_terminal_when_mover_has_moves() {
        // Same blocked corner, but P0 to move with open jumps.
        let board = blocked_board(&[Coord::new(6, 9), Coord::new(7, 8)]);
        let state = GameState::new(board, Coord::new(0, 0), Coord::new(8, 10), 2);
        assert!(!state.terminal_test());
    }

    #[test]
    fn obstacles_matrix_census() {
        let state = GameState::initial();
        let grid = state.obstacles_matrix(PlayerId::P0);

        let mut own = 0;
        let mut opp = 0;
        let mut open = 0;
        let mut blocked = 0;
        for row in grid.iter() {
            for &v in row.iter() {
                match v {
                    -1 => own += 1,
                    2 => opp += 1,
                    1 => open += 1,
                    0 => blocked += 1,
                    other => panic!("unexpected matrix value {}", other),
                }
            }
        }
        assert_eq!(own, 1);
        assert_eq!(opp, 1);
        assert_eq!(blocked, 0);
        assert_eq!(own + opp + open + blocked, CELL_COUNT);
    }

    #[test]
    fn obstacles_matrix_tracks_perspective() {
        let state = GameState::initial();
        let p0 = state.loc(PlayerId::P0);
        let p1 = state.loc(PlayerId::P1);

        let from_p0 = state.obstacles_matrix(PlayerId::P0);
        assert_eq!(from_p0[p0.row as usize][p0.col as usize], -1);
        assert_eq!(from_p0[p1.row as usize][p1.col as usize], 2);

        let from_p1 = state.obstacles_matrix(PlayerId::P1);
        assert_eq!(from_p1[p1.row as usize][p1.col as usize], -1);
        assert_eq!(from_p1[p0.row as usize][p0.col as usize], 2);
    }

    #[test]
    fn obstacles_matrix_marks_trail() {
        let state = GameState::new(Board::open(), Coord::new(4, 5), Coord::new(0, 0), 0);
        let next = state.result(state.actions()[0]);
        let grid = next.obstacles_matrix(PlayerId::P0);
        assert_eq!(grid[4][5], 0, "vacated cell should project as blocked");
    }

    #[test]
    fn trail_grows_one_cell_per_ply() {
        let mut state = GameState::initial();
        for ply in 0..6 {
            assert_eq!(state.board().blocked_count(), ply);
            let action = state.actions()[0];
            state = state.result(action);
        }
    }
}

//! Board geometry.
//!
//! Coordinates, cell states, and the knight-move offset table for the
//! 9x11 Isolation board. The grid is row-major with row 0 at the top and
//! column 0 at the left.

/// Number of columns on the board.
pub const WIDTH: usize = 11;

/// Number of rows on the board.
pub const HEIGHT: usize = 9;

/// Total number of playable cells.
pub const CELL_COUNT: usize = WIDTH * HEIGHT;

/// The geometric center of the board.
pub const CENTER: Coord = Coord { row: 4, col: 5 };

/// The eight knight-move offsets, in the fixed enumeration order used by
/// `liberties` and `actions`.
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// The state of a single board cell.
///
/// Player occupancy is tracked by position, not in the cell grid; a cell
/// becomes `Blocked` when a player vacates it and never reopens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Open,
    Blocked,
}

impl Cell {
    /// Returns the single-character IFEN abbreviation.
    pub const fn ifen_char(self) -> char {
        match self {
            Cell::Open => '.',
            Cell::Blocked => '#',
        }
    }

    /// Parses a cell from its single-character IFEN abbreviation.
    pub fn from_ifen_char(c: char) -> Option<Cell> {
        match c {
            '.' => Some(Cell::Open),
            '#' => Some(Cell::Blocked),
            _ => None,
        }
    }
}

/// A board coordinate. Always in-bounds by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Coord {
    /// Creates a coordinate. Panics if out of bounds.
    pub fn new(row: u8, col: u8) -> Coord {
        assert!(
            (row as usize) < HEIGHT && (col as usize) < WIDTH,
            "coordinate ({}, {}) out of bounds",
            row,
            col
        );
        Coord { row, col }
    }

    /// Returns the row-major cell index.
    pub const fn index(self) -> usize {
        self.row as usize * WIDTH + self.col as usize
    }

    /// Reconstructs a coordinate from a row-major cell index.
    pub fn from_index(idx: usize) -> Coord {
        assert!(idx < CELL_COUNT, "cell index {} out of bounds", idx);
        Coord {
            row: (idx / WIDTH) as u8,
            col: (idx % WIDTH) as u8,
        }
    }

    /// Applies a (row, col) offset, returning `None` if the result leaves
    /// the board.
    pub fn offset(self, dr: i8, dc: i8) -> Option<Coord> {
        let row = self.row as i16 + dr as i16;
        let col = self.col as i16 + dc as i16;
        if row < 0 || row >= HEIGHT as i16 || col < 0 || col >= WIDTH as i16 {
            return None;
        }
        Some(Coord {
            row: row as u8,
            col: col as u8,
        })
    }

    /// Manhattan distance to another coordinate.
    pub fn manhattan(self, other: Coord) -> u32 {
        let dr = (self.row as i32 - other.row as i32).unsigned_abs();
        let dc = (self.col as i32 - other.col as i32).unsigned_abs();
        dr + dc
    }

    /// Formats the coordinate as an algebraic square: column letter
    /// 'a'..'k', then 1-based row number counted from the top ("a1" is the
    /// top-left corner, "k9" the bottom-right).
    pub fn square(self) -> String {
        let col = (b'a' + self.col) as char;
        format!("{}{}", col, self.row + 1)
    }

    /// Parses an algebraic square like "f5".
    pub fn from_square(s: &str) -> Option<Coord> {
        let mut chars = s.chars();
        let col_char = chars.next()?;
        if !col_char.is_ascii_lowercase() {
            return None;
        }
        let col = col_char as u8 - b'a';
        if col as usize >= WIDTH {
            return None;
        }
        let row_part: String = chars.collect();
        let row: u8 = row_part.parse().ok()?;
        if row == 0 || row as usize > HEIGHT {
            return None;
        }
        Some(Coord { row: row - 1, col })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_roundtrip() {
        for idx in 0..CELL_COUNT {
            assert_eq!(Coord::from_index(idx).index(), idx);
        }
    }

    #[test]
    fn center_is_middle_of_grid() {
        assert_eq!(CENTER.row as usize, HEIGHT / 2);
        assert_eq!(CENTER.col as usize, WIDTH / 2);
    }

    #[test]
    fn offset_stays_in_bounds() {
        let corner = Coord::new(0, 0);
        assert_eq!(corner.offset(-1, 0), None);
        assert_eq!(corner.offset(0, -1), None);
        assert_eq!(corner.offset(2, 1), Some(Coord::new(2, 1)));

        let far = Coord::new(8, 10);
        assert_eq!(far.offset(1, 0), None);
        assert_eq!(far.offset(0, 1), None);
        assert_eq!(far.offset(-2, -1), Some(Coord::new(6, 9)));
    }

    #[test]
    fn knight_offsets_are_all_l_shaped() {
        for (dr, dc) in KNIGHT_OFFSETS {
            let lengths = (dr.abs(), dc.abs());
            assert!(lengths == (1, 2) || lengths == (2, 1));
        }
    }

    #[test]
    fn manhattan_distance() {
        assert_eq!(Coord::new(0, 0).manhattan(Coord::new(0, 0)), 0);
        assert_eq!(Coord::new(0, 0).manhattan(Coord::new(2, 1)), 3);
        assert_eq!(Coord::new(4, 5).manhattan(Coord::new(8, 10)), 9);
        // symmetric
        assert_eq!(
            Coord::new(1, 7).manhattan(Coord::new(6, 2)),
            Coord::new(6, 2).manhattan(Coord::new(1, 7))
        );
    }

    #[test]
    fn square_roundtrip() {
        for idx in 0..CELL_COUNT {
            let c = Coord::from_index(idx);
            assert_eq!(Coord::from_square(&c.square()), Some(c));
        }
    }

    #[test]
    fn square_notation_corners() {
        assert_eq!(Coord::new(0, 0).square(), "a1");
        assert_eq!(Coord::new(8, 10).square(), "k9");
        assert_eq!(Coord::from_square("f5"), Some(Coord::new(4, 5)));
    }

    #[test]
    fn square_rejects_garbage() {
        assert_eq!(Coord::from_square(""), None);
        assert_eq!(Coord::from_square("z1"), None);
        assert_eq!(Coord::from_square("a0"), None);
        assert_eq!(Coord::from_square("a10"), None);
        assert_eq!(Coord::from_square("5f"), None);
    }

    #[test]
    fn cell_ifen_roundtrip() {
        for cell in [Cell::Open, Cell::Blocked] {
            assert_eq!(Cell::from_ifen_char(cell.ifen_char()), Some(cell));
        }
        assert_eq!(Cell::from_ifen_char('x'), None);
    }
}

//! Board coordinates.
//!
//! Row 0 is Black's back rank and row 9 is Red's. Columns run 0..9 from
//! Red's left, matching files `a`..`i`.

use serde::{Deserialize, Serialize};

use crate::types::Side;

pub const ROWS: u8 = 10;
pub const COLS: u8 = 9;
pub const SQUARE_COUNT: usize = ROWS as usize * COLS as usize;

/// A validated (row, column) coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(u8, u8)", into = "(u8, u8)")]
pub struct Square {
    row: u8,
    col: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SquareError {
    #[error("Invalid square: row {row}, column {col}")]
    InvalidSquare { row: i32, col: i32 },
}

/// True iff `(row, col)` lies on the 10x9 board.
pub fn is_valid_square(row: i32, col: i32) -> bool {
    (0..ROWS as i32).contains(&row) && (0..COLS as i32).contains(&col)
}

const fn palace(top: u8) -> [Square; 9] {
    let mut out = [Square { row: 0, col: 0 }; 9];
    let mut i = 0;
    while i < 9 {
        out[i] = Square {
            row: top + (i / 3) as u8,
            col: 3 + (i % 3) as u8,
        };
        i += 1;
    }
    out
}

pub const RED_PALACE: [Square; 9] = palace(7);
pub const BLACK_PALACE: [Square; 9] = palace(0);

impl Square {
    pub fn new(row: u8, col: u8) -> Result<Self, SquareError> {
        Self::from_signed(row as i32, col as i32)
    }

    fn from_signed(row: i32, col: i32) -> Result<Self, SquareError> {
        if !is_valid_square(row, col) {
            return Err(SquareError::InvalidSquare { row, col });
        }
        Ok(Self {
            row: row as u8,
            col: col as u8,
        })
    }

    pub fn row(self) -> u8 {
        self.row
    }

    pub fn col(self) -> u8 {
        self.col
    }

    /// Row-major index into a 90-entry cell array.
    pub fn index(self) -> usize {
        self.row as usize * COLS as usize + self.col as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if index >= SQUARE_COUNT {
            return None;
        }
        Some(Self {
            row: (index / COLS as usize) as u8,
            col: (index % COLS as usize) as u8,
        })
    }

    /// The square `(dr, dc)` away, or `None` when that falls off the board.
    pub fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        Self::from_signed(self.row as i32 + dr as i32, self.col as i32 + dc as i32).ok()
    }

    pub fn in_palace(self, side: Side) -> bool {
        let rows = match side {
            Side::Red => 7..=9,
            Side::Black => 0..=2,
        };
        rows.contains(&self.row) && (3..=5).contains(&self.col)
    }

    /// True on `side`'s half of the board, i.e. before the river.
    pub fn on_own_half(self, side: Side) -> bool {
        match side {
            Side::Red => self.row >= 5,
            Side::Black => self.row <= 4,
        }
    }

    pub fn has_crossed_river(self, side: Side) -> bool {
        !self.on_own_half(side)
    }

    /// Every square in row-major order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..SQUARE_COUNT).filter_map(Square::from_index)
    }
}

impl TryFrom<(u8, u8)> for Square {
    type Error = SquareError;

    fn try_from((row, col): (u8, u8)) -> Result<Self, Self::Error> {
        Self::new(row, col)
    }
}

impl From<Square> for (u8, u8) {
    fn from(sq: Square) -> Self {
        (sq.row, sq.col)
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::uci::format_square(*self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert!(is_valid_square(0, 0));
        assert!(is_valid_square(9, 8));
        assert!(!is_valid_square(10, 0));
        assert!(!is_valid_square(0, 9));
        assert!(!is_valid_square(-1, 4));
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert_eq!(
            Square::new(10, 3),
            Err(SquareError::InvalidSquare { row: 10, col: 3 })
        );
        assert!(Square::new(4, 9).is_err());
        assert!(Square::new(9, 8).is_ok());
    }

    #[test]
    fn test_index_round_trip() {
        for sq in Square::all() {
            assert_eq!(Square::from_index(sq.index()), Some(sq));
        }
        assert_eq!(Square::all().count(), SQUARE_COUNT);
        assert_eq!(Square::from_index(SQUARE_COUNT), None);
    }

    #[test]
    fn test_offset_stays_on_board() {
        let corner = Square::new(0, 0).unwrap();
        assert_eq!(corner.offset(-1, 0), None);
        assert_eq!(corner.offset(1, 1), Some(Square::new(1, 1).unwrap()));
    }

    #[test]
    fn test_palaces() {
        for sq in RED_PALACE {
            assert!(sq.in_palace(Side::Red));
            assert!(!sq.in_palace(Side::Black));
        }
        for sq in BLACK_PALACE {
            assert!(sq.in_palace(Side::Black));
        }
        let inside = Square::all().filter(|sq| sq.in_palace(Side::Red)).count();
        assert_eq!(inside, 9);
        assert!(RED_PALACE.contains(&Square::new(9, 4).unwrap()));
        assert!(!RED_PALACE.contains(&Square::new(6, 4).unwrap()));
    }

    #[test]
    fn test_river() {
        let red_side = Square::new(5, 0).unwrap();
        let black_side = Square::new(4, 0).unwrap();
        assert!(red_side.on_own_half(Side::Red));
        assert!(black_side.has_crossed_river(Side::Red));
        assert!(black_side.on_own_half(Side::Black));
        assert!(red_side.has_crossed_river(Side::Black));
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let sq: Square = serde_json::from_str("[3,4]").unwrap();
        assert_eq!((sq.row(), sq.col()), (3, 4));
        assert!(serde_json::from_str::<Square>("[10,4]").is_err());
    }
}

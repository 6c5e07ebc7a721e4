//! Lightweight board representation for rendering from FEN.

use crate::fen::{self, FenError};
use crate::movegen::Cells;
use crate::position::Position;
use crate::square::{COLS, ROWS};
use crate::types::{Piece, Side};

/// A 10x9 board for display purposes only. Unlike [`Position`] it accepts
/// any placement, including boards without generals.
#[derive(Debug, Clone)]
pub struct DisplayBoard {
    cells: Cells,
    side_to_move: Option<Side>,
}

impl DisplayBoard {
    /// Parse the board placement (and side to move, if present) from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut fields = fen.split_whitespace();
        let placement = fields.next().ok_or(FenError::InvalidFormat)?;
        let cells = fen::parse_placement(placement)?;
        let side_to_move = fields.next().map(fen::parse_side).transpose()?;
        Ok(Self {
            cells,
            side_to_move,
        })
    }

    /// Piece on `file` (0 = a) and `rank` (0 = Red's home rank).
    pub fn piece_at(&self, file: u8, rank: u8) -> Option<Piece> {
        if file >= COLS || rank >= ROWS {
            return None;
        }
        let row = (ROWS - 1 - rank) as usize;
        self.cells[row * COLS as usize + file as usize]
    }

    pub fn side_to_move(&self) -> Option<Side> {
        self.side_to_move
    }

    /// One line per rank, rank 9 first, `.` for an empty point.
    pub fn rank_lines(&self) -> Vec<String> {
        (0..ROWS)
            .rev()
            .map(|rank| {
                (0..COLS)
                    .map(|file| match self.piece_at(file, rank) {
                        Some(piece) => piece.to_char().to_string(),
                        None => ".".to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }

    /// Text diagram with rank labels on the left and the river between
    /// ranks 5 and 4.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (line, rank) in self.rank_lines().iter().zip((0..ROWS).rev()) {
            out.push_str(&format!("{} {}\n", rank, line));
            if rank == 5 {
                out.push_str("  ~~~~~~~~~~~~~~~~~\n");
            }
        }
        out.push_str("  a b c d e f g h i\n");
        if let Some(side) = self.side_to_move {
            out.push_str(&format!("{} to move\n", side));
        }
        out
    }
}

impl From<&Position> for DisplayBoard {
    fn from(position: &Position) -> Self {
        Self {
            cells: *position.cells(),
            side_to_move: Some(position.side_to_move()),
        }
    }
}

impl std::fmt::Display for DisplayBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::START_FEN;
    use crate::types::PieceKind;

    #[test]
    fn test_starting_position() {
        let board = DisplayBoard::from_fen(START_FEN).unwrap();
        assert_eq!(board.piece_at(0, 0), Some(Piece::red(PieceKind::Chariot)));
        assert_eq!(board.piece_at(4, 0), Some(Piece::red(PieceKind::General)));
        assert_eq!(board.piece_at(1, 7), Some(Piece::black(PieceKind::Cannon)));
        assert_eq!(board.piece_at(4, 4), None);
        assert_eq!(board.piece_at(9, 0), None);
    }

    #[test]
    fn test_empty_board() {
        let board = DisplayBoard::from_fen("9/9/9/9/9/9/9/9/9/9 w - - 0 1").unwrap();
        for rank in 0..ROWS {
            for file in 0..COLS {
                assert_eq!(board.piece_at(file, rank), None);
            }
        }
    }

    #[test]
    fn test_side_field_must_be_one_letter() {
        let board = DisplayBoard::from_fen("9/9/9/9/9/9/9/9/9/9 b").unwrap();
        assert_eq!(board.side_to_move(), Some(Side::Black));
        assert_eq!(DisplayBoard::from_fen("9/9/9/9/9/9/9/9/9/9").unwrap().side_to_move(), None);
        assert!(matches!(
            DisplayBoard::from_fen("9/9/9/9/9/9/9/9/9/9 wx"),
            Err(FenError::InvalidSide(_))
        ));
        assert!(DisplayBoard::from_fen("9/9/9/9/9/9/9/9/9/9 x").is_err());
    }

    #[test]
    fn test_rank_lines() {
        let lines = DisplayBoard::from(&Position::start()).rank_lines();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "r n b a k a b n r");
        assert_eq!(lines[4], ". . . . . . . . .");
        assert_eq!(lines[9], "R N B A K A B N R");
    }

    #[test]
    fn test_render() {
        let board = DisplayBoard::from(&Position::start());
        let text = board.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "9 r n b a k a b n r");
        assert_eq!(lines[5], "  ~~~~~~~~~~~~~~~~~");
        assert_eq!(lines[10], "0 R N B A K A B N R");
        assert_eq!(lines[11], "  a b c d e f g h i");
        assert_eq!(lines[12], "red to move");
    }
}

//! UCI-style move notation.
//!
//! Files are `a`..`i` by column. Ranks are digits `0`..`9` counted from
//! Red's home rank, so row `r` is written as `9 - r`. Every move is exactly
//! four ASCII characters, which is what Xiangqi engines report.

use crate::moves::Move;
use crate::position::Position;
use crate::square::{Square, COLS, ROWS};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UciError {
    #[error("Invalid move: {0}")]
    InvalidMove(String),
    #[error("Invalid square: {0}")]
    InvalidSquare(String),
}

/// Format a move in engine notation (e.g. "h2e2").
pub fn format_move(mv: Move) -> String {
    format!("{}{}", format_square(mv.from), format_square(mv.to))
}

pub fn format_square(sq: Square) -> String {
    let file = (b'a' + sq.col()) as char;
    let rank = (b'0' + (ROWS - 1 - sq.row())) as char;
    format!("{}{}", file, rank)
}

/// Parse engine notation back into a move.
pub fn parse_move(s: &str) -> Result<Move, UciError> {
    if s.len() != 4 || !s.is_ascii() {
        return Err(UciError::InvalidMove(s.to_string()));
    }

    let from = parse_square(&s[0..2])?;
    let to = parse_square(&s[2..4])?;
    Ok(Move::new(from, to))
}

pub fn parse_square(s: &str) -> Result<Square, UciError> {
    let invalid = || UciError::InvalidSquare(s.to_string());

    let bytes = s.as_bytes();
    if bytes.len() != 2 {
        return Err(invalid());
    }

    let file = bytes[0];
    let rank = bytes[1];
    if !(b'a'..b'a' + COLS).contains(&file) || !rank.is_ascii_digit() {
        return Err(invalid());
    }

    let col = file - b'a';
    let row = ROWS - 1 - (rank - b'0');
    Square::new(row, col).map_err(|_| invalid())
}

/// Resolve an engine move string against the legal moves of `position`.
///
/// Returns `None` when the string does not parse or names a move that is not
/// legal here.
pub fn find_legal_move(position: &Position, s: &str) -> Option<Move> {
    let mv = parse_move(s.trim()).ok()?;
    position.legal_moves().into_iter().find(|legal| *legal == mv)
}

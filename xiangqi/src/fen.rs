//! FEN parsing and formatting.
//!
//! Layout: ten `/`-separated ranks from row 0 (Black's back rank) to row 9,
//! then `<side> - - <halfmove> <fullmove>`. The two `-` slots stand in for
//! the chess castling and en-passant fields, which Xiangqi does not use.

use crate::movegen::{Cells, EMPTY_CELLS};
use crate::position::{Position, PositionError};
use crate::square::{COLS, ROWS};
use crate::types::{Piece, Side};

/// Parse a FEN string into a validated Position
pub fn parse_fen(fen: &str) -> Result<Position, FenError> {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.len() < 2 || parts.len() > 6 {
        return Err(FenError::InvalidFormat);
    }

    let cells = parse_placement(parts[0])?;
    let side = parse_side(parts[1])?;

    for slot in parts.iter().skip(2).take(2) {
        if *slot != "-" {
            return Err(FenError::InvalidPlaceholder(slot.to_string()));
        }
    }

    let halfmove_clock = match parts.get(4) {
        Some(s) => s
            .parse()
            .map_err(|_| FenError::InvalidHalfmove(s.to_string()))?,
        None => 0,
    };
    let fullmove_number = match parts.get(5) {
        Some(s) => match s.parse::<u32>() {
            Ok(n) if n >= 1 => n,
            _ => return Err(FenError::InvalidFullmove(s.to_string())),
        },
        None => 1,
    };

    let position = Position::new(cells, side, halfmove_clock, fullmove_number)?;
    tracing::debug!("Parsed FEN {}", fen);
    Ok(position)
}

/// Parse only the piece placement field.
pub fn parse_placement(placement: &str) -> Result<Cells, FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != ROWS as usize {
        return Err(FenError::RankCount(ranks.len()));
    }

    let mut cells = EMPTY_CELLS;
    for (row, rank) in ranks.iter().enumerate() {
        let mut col = 0usize;
        for c in rank.chars() {
            if let Some(skip) = c.to_digit(10) {
                if skip == 0 {
                    return Err(FenError::RankWidth { rank: row });
                }
                col += skip as usize;
            } else {
                let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece(c))?;
                if col >= COLS as usize {
                    return Err(FenError::RankWidth { rank: row });
                }
                cells[row * COLS as usize + col] = Some(piece);
                col += 1;
            }
            if col > COLS as usize {
                return Err(FenError::RankWidth { rank: row });
            }
        }
        if col != COLS as usize {
            return Err(FenError::RankWidth { rank: row });
        }
    }

    Ok(cells)
}

pub(crate) fn parse_side(s: &str) -> Result<Side, FenError> {
    let mut chars = s.chars();
    match (chars.next().and_then(Side::from_fen_char), chars.next()) {
        (Some(side), None) => Ok(side),
        _ => Err(FenError::InvalidSide(s.to_string())),
    }
}

/// Format the piece placement field.
pub fn format_placement(cells: &Cells) -> String {
    let mut out = String::with_capacity(64);
    for (row, rank) in cells.chunks(COLS as usize).enumerate() {
        if row > 0 {
            out.push('/');
        }
        let mut empty = 0;
        for cell in rank {
            match cell {
                None => empty += 1,
                Some(piece) => {
                    if empty > 0 {
                        out.push_str(&empty.to_string());
                        empty = 0;
                    }
                    out.push(piece.to_char());
                }
            }
        }
        if empty > 0 {
            out.push_str(&empty.to_string());
        }
    }
    out
}

/// Format a Position as a FEN string
pub fn format_fen(position: &Position) -> String {
    format!(
        "{} {} - - {} {}",
        format_placement(position.cells()),
        position.side_to_move().to_fen_char(),
        position.halfmove_clock(),
        position.fullmove_number()
    )
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    #[error("Invalid FEN format")]
    InvalidFormat,
    #[error("Expected 10 ranks, found {0}")]
    RankCount(usize),
    #[error("Rank {rank} does not cover exactly 9 files")]
    RankWidth { rank: usize },
    #[error("Invalid piece character: {0}")]
    InvalidPiece(char),
    #[error("Invalid side to move: {0}")]
    InvalidSide(String),
    #[error("Expected '-' placeholder, found: {0}")]
    InvalidPlaceholder(String),
    #[error("Invalid halfmove clock: {0}")]
    InvalidHalfmove(String),
    #[error("Invalid fullmove number: {0}")]
    InvalidFullmove(String),
    #[error("Invalid board layout: {0}")]
    InvalidBoardLayout(#[from] PositionError),
}

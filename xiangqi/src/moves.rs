use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::square::{Square, SquareError};
use crate::uci::{self, UciError};

/// A source and destination square. Legality is decided by the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    /// Build a move from raw coordinates, rejecting anything off the board.
    pub fn from_coords(
        from_row: u8,
        from_col: u8,
        to_row: u8,
        to_col: u8,
    ) -> Result<Self, SquareError> {
        Ok(Self {
            from: Square::new(from_row, from_col)?,
            to: Square::new(to_row, to_col)?,
        })
    }

    /// Four-character engine notation, e.g. `h2e2`.
    pub fn to_algebraic(&self) -> String {
        uci::format_move(*self)
    }
}

impl FromStr for Move {
    type Err = UciError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uci::parse_move(s)
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

impl Serialize for Move {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_algebraic())
    }
}

impl<'de> Deserialize<'de> for Move {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_coords_rejects_off_board() {
        assert!(Move::from_coords(6, 4, 5, 4).is_ok());
        assert_eq!(
            Move::from_coords(6, 4, 5, 9),
            Err(SquareError::InvalidSquare { row: 5, col: 9 })
        );
        assert!(Move::from_coords(10, 0, 9, 0).is_err());
    }

    #[test]
    fn test_equal_moves_share_notation() {
        let a = Move::from_coords(7, 7, 7, 4).unwrap();
        let b = Move::new(Square::new(7, 7).unwrap(), Square::new(7, 4).unwrap());
        assert_eq!(a, b);
        assert_eq!(a.to_algebraic(), b.to_algebraic());
        assert_eq!(a.to_string(), "h2e2");
    }

    #[test]
    fn test_serializes_as_notation() {
        let mv = Move::from_coords(6, 4, 5, 4).unwrap();
        let json = serde_json::to_string(&mv).unwrap();
        assert_eq!(json, "\"e3e4\"");
        let back: Move = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mv);
        assert!(serde_json::from_str::<Move>("\"z9z9\"").is_err());
    }
}

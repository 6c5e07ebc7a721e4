//! Canonical piece and side types for the project.

use serde::{Deserialize, Serialize};

/// The seven Xiangqi piece kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    General,
    Advisor,
    Elephant,
    Chariot,
    Cannon,
    Horse,
    Soldier,
}

/// The two sides. Red moves first and is written in uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Red,
    Black,
}

/// A piece on the board: a kind owned by a side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        Self::General,
        Self::Advisor,
        Self::Elephant,
        Self::Chariot,
        Self::Cannon,
        Self::Horse,
        Self::Soldier,
    ];

    pub fn to_char_upper(self) -> char {
        match self {
            Self::General => 'K',
            Self::Advisor => 'A',
            Self::Elephant => 'B',
            Self::Chariot => 'R',
            Self::Cannon => 'C',
            Self::Horse => 'N',
            Self::Soldier => 'P',
        }
    }

    pub fn to_char_lower(self) -> char {
        self.to_char_upper().to_ascii_lowercase()
    }

    /// Parse a piece letter, ignoring case. `E` and `H` are accepted as
    /// aliases for the elephant and horse.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'k' => Some(Self::General),
            'a' => Some(Self::Advisor),
            'b' | 'e' => Some(Self::Elephant),
            'r' => Some(Self::Chariot),
            'c' => Some(Self::Cannon),
            'n' | 'h' => Some(Self::Horse),
            'p' => Some(Self::Soldier),
            _ => None,
        }
    }
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Self::Red => Self::Black,
            Self::Black => Self::Red,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Black => "black",
        }
    }

    /// FEN side-to-move letter. Red keeps the chess `w`.
    pub fn to_fen_char(self) -> char {
        match self {
            Self::Red => 'w',
            Self::Black => 'b',
        }
    }

    pub fn from_fen_char(c: char) -> Option<Self> {
        match c {
            'w' | 'r' => Some(Self::Red),
            'b' => Some(Self::Black),
            _ => None,
        }
    }
}

impl Piece {
    pub const fn new(kind: PieceKind, side: Side) -> Self {
        Self { kind, side }
    }

    pub const fn red(kind: PieceKind) -> Self {
        Self::new(kind, Side::Red)
    }

    pub const fn black(kind: PieceKind) -> Self {
        Self::new(kind, Side::Black)
    }

    /// Build a piece from its FEN symbol. Ownership comes from the letter case.
    pub fn from_char(c: char) -> Option<Self> {
        let kind = PieceKind::from_char(c)?;
        let side = if owns_red(c) { Side::Red } else { Side::Black };
        Some(Self { kind, side })
    }

    pub fn to_char(self) -> char {
        match self.side {
            Side::Red => self.kind.to_char_upper(),
            Side::Black => self.kind.to_char_lower(),
        }
    }

    pub fn is_red(self) -> bool {
        self.side == Side::Red
    }

    pub fn is_black(self) -> bool {
        self.side == Side::Black
    }
}

/// True when a piece symbol belongs to Red (uppercase).
pub fn owns_red(symbol: char) -> bool {
    symbol.is_ascii_uppercase()
}

/// True when a piece symbol belongs to Black (lowercase).
pub fn owns_black(symbol: char) -> bool {
    symbol.is_ascii_lowercase()
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char_upper())
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

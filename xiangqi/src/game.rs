use serde::Serialize;

use crate::fen::FenError;
use crate::moves::Move;
use crate::position::{Position, PositionError};
use crate::types::{Piece, Side};
use crate::uci::UciError;

/// A game: the starting position plus one position per move played.
///
/// Positions are immutable, so undo is a pop and nothing needs rebuilding.
#[derive(Debug, Clone)]
pub struct Game {
    positions: Vec<Position>,
    history: Vec<HistoryEntry>,
    start_position: StartPosition,
}

/// Record of one applied move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub mv: Move,
    pub piece: Piece,
    pub captured: Option<Piece>,
    /// Engine notation of the move
    pub notation: String,
    /// FEN after this move
    pub fen: String,
    pub gives_check: bool,
}

/// Starting position of the game
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartPosition {
    Standard,
    Fen(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameStatus {
    Ongoing,
    /// The side to move is mated.
    Checkmate { winner: Side },
    /// The side to move has no legal move without being in check. This loses
    /// in Xiangqi.
    Stalemate { winner: Side },
}

impl Game {
    /// Create a new game from the standard starting position
    pub fn new() -> Self {
        Self {
            positions: vec![Position::start()],
            history: Vec::new(),
            start_position: StartPosition::Standard,
        }
    }

    /// Create a game from a FEN string
    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        let position = Position::from_fen(fen)?;
        Ok(Self {
            positions: vec![position],
            history: Vec::new(),
            start_position: StartPosition::Fen(fen.to_string()),
        })
    }

    /// Create a game starting from an already-built position
    pub fn from_position(position: Position) -> Self {
        let start_position = if position == Position::start() {
            StartPosition::Standard
        } else {
            StartPosition::Fen(position.to_fen())
        };
        Self {
            positions: vec![position],
            history: Vec::new(),
            start_position,
        }
    }

    pub fn start_position(&self) -> &StartPosition {
        &self.start_position
    }

    /// Get the current position
    pub fn position(&self) -> &Position {
        // `positions` always holds at least the start position.
        &self.positions[self.positions.len() - 1]
    }

    /// Every position from the start through the current one.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Get the move history
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Make a move on the board
    pub fn make_move(&mut self, mv: Move) -> Result<HistoryEntry, GameError> {
        let current = self.position();
        let piece = current
            .piece_at(mv.from)
            .ok_or(PositionError::IllegalMove(mv))?;
        let captured = current.piece_at(mv.to);

        let next = current.make_move(mv)?;
        let entry = HistoryEntry {
            mv,
            piece,
            captured,
            notation: mv.to_algebraic(),
            fen: next.to_fen(),
            gives_check: next.in_check(next.side_to_move()),
        };

        self.positions.push(next);
        self.history.push(entry.clone());
        Ok(entry)
    }

    /// Parse engine notation and play it.
    pub fn play_str(&mut self, notation: &str) -> Result<HistoryEntry, GameError> {
        let mv: Move = notation.trim().parse()?;
        self.make_move(mv)
    }

    /// Undo the last move
    pub fn undo(&mut self) -> Result<HistoryEntry, GameError> {
        let entry = self.history.pop().ok_or(GameError::NothingToUndo)?;
        self.positions.pop();
        Ok(entry)
    }

    /// Get all legal moves for the current position
    pub fn legal_moves(&self) -> Vec<Move> {
        self.position().legal_moves()
    }

    /// Get the side to move
    pub fn side_to_move(&self) -> Side {
        self.position().side_to_move()
    }

    /// Export position to FEN string
    pub fn to_fen(&self) -> String {
        self.position().to_fen()
    }

    /// FEN of every position, start first.
    pub fn fens(&self) -> Vec<String> {
        self.positions.iter().map(Position::to_fen).collect()
    }

    pub fn status(&self) -> GameStatus {
        let position = self.position();
        if !position.legal_moves().is_empty() {
            return GameStatus::Ongoing;
        }
        let winner = position.side_to_move().opposite();
        if position.in_check(position.side_to_move()) {
            GameStatus::Checkmate { winner }
        } else {
            GameStatus::Stalemate { winner }
        }
    }

    /// Play `moves` from `start` and return the FEN after each prefix.
    ///
    /// The first entry is the FEN after the first move; an empty move list
    /// yields an empty vector.
    #[tracing::instrument(level = "debug", skip_all, fields(moves = moves.len()))]
    pub fn replay<S: AsRef<str>>(start: &Position, moves: &[S]) -> Result<Vec<String>, GameError> {
        let mut position = start.clone();
        let mut fens = Vec::with_capacity(moves.len());
        for notation in moves {
            let mv: Move = notation.as_ref().trim().parse()?;
            position = position.make_move(mv)?;
            fens.push(position.to_fen());
        }
        tracing::debug!("Replayed {} moves", fens.len());
        Ok(fens)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Position(#[from] PositionError),
    #[error("Nothing to undo")]
    NothingToUndo,
    #[error("FEN parse error: {0}")]
    Fen(#[from] FenError),
    #[error("Move notation error: {0}")]
    Notation(#[from] UciError),
}

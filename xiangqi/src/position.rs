//! Immutable Xiangqi position.

use std::str::FromStr;

use crate::fen::{self, FenError};
use crate::movegen::{self, Cells, EMPTY_CELLS};
use crate::moves::Move;
use crate::square::{Square, SquareError, COLS};
use crate::types::{Piece, PieceKind, Side};

/// Standard opening position.
pub const START_FEN: &str = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w - - 0 1";

const BACK_RANK: [PieceKind; COLS as usize] = [
    PieceKind::Chariot,
    PieceKind::Horse,
    PieceKind::Elephant,
    PieceKind::Advisor,
    PieceKind::General,
    PieceKind::Advisor,
    PieceKind::Elephant,
    PieceKind::Horse,
    PieceKind::Chariot,
];

/// A snapshot of the board, the side to move and the move counters.
///
/// Positions are never mutated: [`Position::make_move`] returns a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    cells: Cells,
    side_to_move: Side,
    halfmove_clock: u32,
    fullmove_number: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error(transparent)]
    InvalidSquare(#[from] SquareError),
    #[error("Illegal move: {0}")]
    IllegalMove(Move),
    #[error("No {0} general on the board")]
    MissingGeneral(Side),
    #[error("More than one {0} general on the board")]
    ExtraGeneral(Side),
}

impl Position {
    /// Build a position, requiring exactly one general per side.
    pub fn new(
        cells: Cells,
        side_to_move: Side,
        halfmove_clock: u32,
        fullmove_number: u32,
    ) -> Result<Self, PositionError> {
        for side in [Side::Red, Side::Black] {
            let general = Piece::new(PieceKind::General, side);
            match cells.iter().filter(|cell| **cell == Some(general)).count() {
                0 => return Err(PositionError::MissingGeneral(side)),
                1 => {}
                _ => return Err(PositionError::ExtraGeneral(side)),
            }
        }
        Ok(Self::from_cells_unchecked(
            cells,
            side_to_move,
            halfmove_clock,
            fullmove_number,
        ))
    }

    /// Build a position without validating the generals. Used for rule
    /// exercises on sparse boards.
    pub fn from_cells_unchecked(
        cells: Cells,
        side_to_move: Side,
        halfmove_clock: u32,
        fullmove_number: u32,
    ) -> Self {
        Self {
            cells,
            side_to_move,
            halfmove_clock,
            fullmove_number: fullmove_number.max(1),
        }
    }

    /// The standard opening position.
    pub fn start() -> Self {
        let mut cells = EMPTY_CELLS;
        let mut put = |row: usize, col: usize, piece: Piece| {
            cells[row * COLS as usize + col] = Some(piece);
        };

        for (col, kind) in BACK_RANK.into_iter().enumerate() {
            put(0, col, Piece::black(kind));
            put(9, col, Piece::red(kind));
        }
        for col in [1, 7] {
            put(2, col, Piece::black(PieceKind::Cannon));
            put(7, col, Piece::red(PieceKind::Cannon));
        }
        for col in [0, 2, 4, 6, 8] {
            put(3, col, Piece::black(PieceKind::Soldier));
            put(6, col, Piece::red(PieceKind::Soldier));
        }

        Self::from_cells_unchecked(cells, Side::Red, 0, 1)
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        fen::parse_fen(fen)
    }

    pub fn to_fen(&self) -> String {
        fen::format_fen(self)
    }

    pub fn cells(&self) -> &Cells {
        &self.cells
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.index()]
    }

    /// Look up a square by raw coordinates.
    pub fn piece_at_coords(&self, row: u8, col: u8) -> Result<Option<Piece>, PositionError> {
        Ok(self.piece_at(Square::new(row, col)?))
    }

    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn find_general(&self, side: Side) -> Option<Square> {
        movegen::find_general(&self.cells, side)
    }

    /// Whether `side`'s general is attacked. A missing general counts as check.
    pub fn in_check(&self, side: Side) -> bool {
        movegen::is_in_check(&self.cells, side)
    }

    /// Moves that follow the piece rules, ignoring whether the mover's own
    /// general is left attacked.
    pub fn pseudo_legal_moves(&self) -> Vec<Move> {
        movegen::pseudo_legal_moves(&self.cells, self.side_to_move)
    }

    /// Pseudo-legal moves that do not leave the mover in check.
    ///
    /// Each candidate is played onto a scratch copy of the cells and the
    /// mover's general is tested there, so this never goes through
    /// [`Position::make_move`].
    pub fn legal_moves(&self) -> Vec<Move> {
        let side = self.side_to_move;
        let moves: Vec<Move> = self
            .pseudo_legal_moves()
            .into_iter()
            .filter(|mv| {
                let scratch = movegen::apply_to_cells(&self.cells, *mv);
                !movegen::is_in_check(&scratch, side)
            })
            .collect();
        tracing::trace!("{} legal moves for {}", moves.len(), side);
        moves
    }

    pub fn is_legal(&self, mv: Move) -> bool {
        self.legal_moves().contains(&mv)
    }

    /// Play a legal move and return the resulting position.
    pub fn make_move(&self, mv: Move) -> Result<Self, PositionError> {
        if !self.is_legal(mv) {
            tracing::debug!("Rejected illegal move {} in {}", mv, self.to_fen());
            return Err(PositionError::IllegalMove(mv));
        }
        Ok(self.play_unchecked(mv))
    }

    /// Apply `mv` with no legality check. The caller guarantees `mv.from`
    /// is occupied.
    fn play_unchecked(&self, mv: Move) -> Self {
        let moved = self.piece_at(mv.from);
        let captured = self.piece_at(mv.to);

        let resets_clock =
            captured.is_some() || moved.is_some_and(|piece| piece.kind == PieceKind::Soldier);
        let halfmove_clock = if resets_clock {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };
        let fullmove_number = match self.side_to_move {
            Side::Red => self.fullmove_number,
            Side::Black => self.fullmove_number.saturating_add(1),
        };

        Self {
            cells: movegen::apply_to_cells(&self.cells, mv),
            side_to_move: self.side_to_move.opposite(),
            halfmove_clock,
            fullmove_number,
        }
    }

    /// The side to move is in check and has no legal reply.
    pub fn is_checkmate(&self) -> bool {
        self.in_check(self.side_to_move) && self.legal_moves().is_empty()
    }

    /// The side to move is not in check but has no legal move.
    pub fn is_stalemate(&self) -> bool {
        !self.in_check(self.side_to_move) && self.legal_moves().is_empty()
    }

    /// Count leaf nodes of the legal move tree `depth` plies deep.
    pub fn perft(&self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.legal_moves();
        if depth == 1 {
            return moves.len() as u64;
        }
        moves
            .into_iter()
            .map(|mv| self.play_unchecked(mv).perft(depth - 1))
            .sum()
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fen::parse_fen(s)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(s: &str) -> Move {
        s.parse().unwrap()
    }

    #[test]
    fn test_start_matches_fen() {
        assert_eq!(Position::start().to_fen(), START_FEN);
        assert_eq!(Position::from_fen(START_FEN).unwrap(), Position::start());
    }

    #[test]
    fn test_start_has_44_moves() {
        let position = Position::start();
        assert_eq!(position.legal_moves().len(), 44);
        assert!(!position.in_check(Side::Red));
        assert!(!position.in_check(Side::Black));
    }

    #[test]
    fn test_new_requires_one_general_each() {
        assert_eq!(
            Position::new(EMPTY_CELLS, Side::Red, 0, 1),
            Err(PositionError::MissingGeneral(Side::Red))
        );

        let mut cells = *Position::start().cells();
        cells[Square::new(8, 4).unwrap().index()] = Some(Piece::black(PieceKind::General));
        assert_eq!(
            Position::new(cells, Side::Red, 0, 1),
            Err(PositionError::ExtraGeneral(Side::Black))
        );
    }

    #[test]
    fn test_piece_at_coords() {
        let position = Position::start();
        assert_eq!(
            position.piece_at_coords(9, 4),
            Ok(Some(Piece::red(PieceKind::General)))
        );
        assert_eq!(position.piece_at_coords(4, 4), Ok(None));
        assert!(matches!(
            position.piece_at_coords(10, 4),
            Err(PositionError::InvalidSquare(_))
        ));
    }

    #[test]
    fn test_make_move_returns_new_position() {
        let position = Position::start();
        let next = position.make_move(mv("h2e2")).unwrap();

        assert_eq!(position, Position::start());
        assert_eq!(next.side_to_move(), Side::Black);
        assert_eq!(next.halfmove_clock(), 1);
        assert_eq!(next.fullmove_number(), 1);
        assert_eq!(
            next.piece_at(Square::new(7, 4).unwrap()),
            Some(Piece::red(PieceKind::Cannon))
        );
        assert_eq!(next.piece_at(Square::new(7, 7).unwrap()), None);
    }

    #[test]
    fn test_illegal_move_is_rejected() {
        let position = Position::start();
        assert_eq!(
            position.make_move(mv("e0e2")),
            Err(PositionError::IllegalMove(mv("e0e2")))
        );
        // Black piece while Red is to move.
        assert!(position.make_move(mv("h7e7")).is_err());
        // Empty source square.
        assert!(position.make_move(mv("e4e5")).is_err());
    }

    #[test]
    fn test_soldier_move_resets_clock() {
        let position = Position::from_fen("rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w - - 7 4").unwrap();
        let next = position.make_move(mv("e3e4")).unwrap();
        assert_eq!(next.halfmove_clock(), 0);
    }

    #[test]
    fn test_capture_resets_clock() {
        // Red cannon takes the black horse through the black cannon screen.
        let position = Position::from_fen("rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w - - 5 3").unwrap();
        let next = position.make_move(mv("b2b9")).unwrap();
        assert_eq!(next.halfmove_clock(), 0);
        assert_eq!(
            next.piece_at(Square::new(0, 1).unwrap()),
            Some(Piece::red(PieceKind::Cannon))
        );
    }

    #[test]
    fn test_quiet_move_increments_clock() {
        let position = Position::from_fen("rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w - - 5 3").unwrap();
        let next = position.make_move(mv("b0c2")).unwrap();
        assert_eq!(next.halfmove_clock(), 6);
    }

    #[test]
    fn test_fullmove_increments_after_black() {
        let position = Position::start()
            .make_move(mv("h2e2"))
            .unwrap()
            .make_move(mv("h9g7"))
            .unwrap();
        assert_eq!(position.fullmove_number(), 2);
        assert_eq!(position.side_to_move(), Side::Red);
    }

    #[test]
    fn test_halfmove_clock_saturates() {
        let position = Position::from_fen("4k4/9/9/9/9/9/9/9/9/R2K5 w - - 4294967295 1").unwrap();
        let next = position.make_move(mv("a0a1")).unwrap();
        assert_eq!(next.halfmove_clock(), u32::MAX);
    }

    #[test]
    fn test_fullmove_number_saturates() {
        let position = Position::from_fen("4k4/9/9/9/9/9/9/9/9/R2K5 b - - 0 4294967295").unwrap();
        let next = position.make_move(mv("e9e8")).unwrap();
        assert_eq!(next.fullmove_number(), u32::MAX);
        assert_eq!(next.halfmove_clock(), 1);
    }

    #[test]
    fn test_pinned_piece_cannot_leave_file() {
        // The red chariot on e5 is the only thing between the generals.
        let position = Position::from_fen("4k4/9/9/9/4R4/9/9/9/9/4K4 w - - 0 1").unwrap();
        let moves = position.legal_moves();
        let chariot = Square::new(4, 4).unwrap();
        assert!(moves
            .iter()
            .filter(|m| m.from == chariot)
            .all(|m| m.to.col() == 4));
        assert!(moves.contains(&mv("e5e6")));
        assert!(moves.contains(&mv("e5e1")));
        assert!(!moves.contains(&mv("e5d5")));
    }

    #[test]
    fn test_generals_may_not_face() {
        let position = Position::from_fen("3k5/9/9/9/9/9/9/9/9/4K4 w - - 0 1").unwrap();
        let moves = position.legal_moves();
        assert!(!moves.contains(&mv("e0d0")));
        assert!(moves.contains(&mv("e0f0")));
        assert!(moves.contains(&mv("e0e1")));
    }

    #[test]
    fn test_checkmate() {
        // Double chariot mate on the back rank.
        let position = Position::from_fen("3k5/R8/9/9/9/9/9/9/9/R3K4 b - - 0 1").unwrap();
        assert!(!position.in_check(Side::Black));
        let mated = Position::from_fen("R2k5/1R7/9/9/9/9/9/9/9/4K4 b - - 0 1").unwrap();
        assert!(mated.in_check(Side::Black));
        assert!(mated.is_checkmate());
        assert!(!mated.is_stalemate());
        assert!(!position.is_checkmate());
    }

    #[test]
    fn test_stalemate() {
        // Red soldiers take every square of the black general, which is not attacked.
        let position = Position::from_fen("3k5/2P1P4/9/9/9/9/9/9/9/5K3 b - - 0 1").unwrap();
        assert!(!position.in_check(Side::Black));
        assert!(position.legal_moves().is_empty());
        assert!(position.is_stalemate());
    }

    #[test]
    fn test_lone_general_missing_opponent_is_in_check() {
        let mut cells = EMPTY_CELLS;
        cells[Square::new(9, 4).unwrap().index()] = Some(Piece::red(PieceKind::General));
        let position = Position::from_cells_unchecked(cells, Side::Red, 0, 1);
        assert!(position.in_check(Side::Black));
        assert!(!position.in_check(Side::Red));
    }

    #[test]
    fn test_perft_start() {
        let position = Position::start();
        assert_eq!(position.perft(0), 1);
        assert_eq!(position.perft(1), 44);
        assert_eq!(position.perft(2), 1920);
    }

    #[test]
    #[ignore = "slow without optimizations"]
    fn test_perft_start_depth_3() {
        assert_eq!(Position::start().perft(3), 79666);
    }
}

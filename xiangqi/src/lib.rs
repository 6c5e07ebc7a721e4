//! Xiangqi rules core: positions, legal move generation, check detection
//! and FEN.

pub mod board_display;
pub mod fen;
pub mod game;
pub mod movegen;
pub mod moves;
pub mod position;
pub mod square;
pub mod types;
pub mod uci;

pub use board_display::DisplayBoard;
pub use fen::{format_fen, parse_fen, FenError};
pub use game::{Game, GameError, GameStatus, HistoryEntry, StartPosition};
pub use movegen::Cells;
pub use moves::Move;
pub use position::{Position, PositionError, START_FEN};
pub use square::{is_valid_square, Square, SquareError, BLACK_PALACE, RED_PALACE};
pub use types::{owns_black, owns_red, Piece, PieceKind, Side};
pub use uci::{format_move, parse_move, UciError};

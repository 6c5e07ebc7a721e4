//! Pseudo-legal move generation and attack detection over raw cell arrays.
//!
//! Nothing here consults legality: these functions are the scratch-board
//! primitives that [`Position`](crate::Position) builds its legal move list
//! and check detection on top of.

use crate::moves::Move;
use crate::square::{Square, SQUARE_COUNT};
use crate::types::{Piece, PieceKind, Side};

/// Row-major board contents, indexed by [`Square::index`].
pub type Cells = [Option<Piece>; SQUARE_COUNT];

pub const EMPTY_CELLS: Cells = [None; SQUARE_COUNT];

const ORTHOGONAL: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONAL: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Horse jumps paired with the leg square that blocks them.
const HORSE_JUMPS: [((i8, i8), (i8, i8)); 8] = [
    ((-2, -1), (-1, 0)),
    ((-2, 1), (-1, 0)),
    ((2, -1), (1, 0)),
    ((2, 1), (1, 0)),
    ((-1, -2), (0, -1)),
    ((1, -2), (0, -1)),
    ((-1, 2), (0, 1)),
    ((1, 2), (0, 1)),
];

fn piece_on(cells: &Cells, sq: Square) -> Option<Piece> {
    cells[sq.index()]
}

/// Empty, or held by the other side.
fn can_land(cells: &Cells, sq: Square, side: Side) -> bool {
    !matches!(piece_on(cells, sq), Some(target) if target.side == side)
}

/// All pseudo-legal moves for `side`.
pub fn pseudo_legal_moves(cells: &Cells, side: Side) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    for sq in Square::all() {
        if let Some(piece) = piece_on(cells, sq) {
            if piece.side == side {
                piece_moves(cells, sq, piece, &mut moves);
            }
        }
    }
    tracing::trace!("{} pseudo-legal moves for {}", moves.len(), side);
    moves
}

/// Append the pseudo-legal moves of `piece` standing on `from`.
pub fn piece_moves(cells: &Cells, from: Square, piece: Piece, out: &mut Vec<Move>) {
    match piece.kind {
        PieceKind::General => general_moves(cells, from, piece.side, out),
        PieceKind::Advisor => advisor_moves(cells, from, piece.side, out),
        PieceKind::Elephant => elephant_moves(cells, from, piece.side, out),
        PieceKind::Chariot => chariot_moves(cells, from, piece.side, out),
        PieceKind::Cannon => cannon_moves(cells, from, piece.side, out),
        PieceKind::Horse => horse_moves(cells, from, piece.side, out),
        PieceKind::Soldier => soldier_moves(cells, from, piece.side, out),
    }
}

fn general_moves(cells: &Cells, from: Square, side: Side, out: &mut Vec<Move>) {
    for (dr, dc) in ORTHOGONAL {
        if let Some(to) = from.offset(dr, dc) {
            if to.in_palace(side) && can_land(cells, to, side) {
                out.push(Move::new(from, to));
            }
        }
    }

    // Flying general: the first piece up or down the file decides it.
    for dr in [-1, 1] {
        let mut cursor = from.offset(dr, 0);
        while let Some(sq) = cursor {
            if let Some(target) = piece_on(cells, sq) {
                if target.kind == PieceKind::General && target.side != side {
                    out.push(Move::new(from, sq));
                }
                break;
            }
            cursor = sq.offset(dr, 0);
        }
    }
}

fn advisor_moves(cells: &Cells, from: Square, side: Side, out: &mut Vec<Move>) {
    for (dr, dc) in DIAGONAL {
        if let Some(to) = from.offset(dr, dc) {
            if to.in_palace(side) && can_land(cells, to, side) {
                out.push(Move::new(from, to));
            }
        }
    }
}

fn elephant_moves(cells: &Cells, from: Square, side: Side, out: &mut Vec<Move>) {
    for (dr, dc) in DIAGONAL {
        let (Some(eye), Some(to)) = (from.offset(dr, dc), from.offset(dr * 2, dc * 2)) else {
            continue;
        };
        if to.on_own_half(side) && piece_on(cells, eye).is_none() && can_land(cells, to, side) {
            out.push(Move::new(from, to));
        }
    }
}

fn chariot_moves(cells: &Cells, from: Square, side: Side, out: &mut Vec<Move>) {
    for (dr, dc) in ORTHOGONAL {
        let mut cursor = from.offset(dr, dc);
        while let Some(sq) = cursor {
            match piece_on(cells, sq) {
                None => out.push(Move::new(from, sq)),
                Some(target) => {
                    if target.side != side {
                        out.push(Move::new(from, sq));
                    }
                    break;
                }
            }
            cursor = sq.offset(dr, dc);
        }
    }
}

fn cannon_moves(cells: &Cells, from: Square, side: Side, out: &mut Vec<Move>) {
    for (dr, dc) in ORTHOGONAL {
        // Quiet slides up to the screen.
        let mut cursor = from.offset(dr, dc);
        let screen = loop {
            match cursor {
                None => break None,
                Some(sq) if piece_on(cells, sq).is_none() => {
                    out.push(Move::new(from, sq));
                    cursor = sq.offset(dr, dc);
                }
                Some(sq) => break Some(sq),
            }
        };

        // Capture of the first piece beyond the screen.
        let mut cursor = screen.and_then(|sq| sq.offset(dr, dc));
        while let Some(sq) = cursor {
            if let Some(target) = piece_on(cells, sq) {
                if target.side != side {
                    out.push(Move::new(from, sq));
                }
                break;
            }
            cursor = sq.offset(dr, dc);
        }
    }
}

fn horse_moves(cells: &Cells, from: Square, side: Side, out: &mut Vec<Move>) {
    for ((dr, dc), (lr, lc)) in HORSE_JUMPS {
        let (Some(leg), Some(to)) = (from.offset(lr, lc), from.offset(dr, dc)) else {
            continue;
        };
        if piece_on(cells, leg).is_none() && can_land(cells, to, side) {
            out.push(Move::new(from, to));
        }
    }
}

fn soldier_moves(cells: &Cells, from: Square, side: Side, out: &mut Vec<Move>) {
    let forward = match side {
        Side::Red => -1,
        Side::Black => 1,
    };
    if let Some(to) = from.offset(forward, 0) {
        if can_land(cells, to, side) {
            out.push(Move::new(from, to));
        }
    }

    if from.has_crossed_river(side) {
        for dc in [-1, 1] {
            if let Some(to) = from.offset(0, dc) {
                if can_land(cells, to, side) {
                    out.push(Move::new(from, to));
                }
            }
        }
    }
}

/// Copy of `cells` with `mv` played. Does not check legality.
pub fn apply_to_cells(cells: &Cells, mv: Move) -> Cells {
    let mut next = *cells;
    next[mv.to.index()] = next[mv.from.index()].take();
    next
}

pub fn find_general(cells: &Cells, side: Side) -> Option<Square> {
    let general = Piece::new(PieceKind::General, side);
    Square::all().find(|sq| piece_on(cells, *sq) == Some(general))
}

/// True when any piece of `by` has a pseudo-legal move landing on `target`.
pub fn is_attacked(cells: &Cells, target: Square, by: Side) -> bool {
    let mut buffer = Vec::with_capacity(17);
    for sq in Square::all() {
        let Some(piece) = piece_on(cells, sq) else {
            continue;
        };
        if piece.side != by {
            continue;
        }
        buffer.clear();
        piece_moves(cells, sq, piece, &mut buffer);
        if buffer.iter().any(|mv| mv.to == target) {
            return true;
        }
    }
    false
}

/// Whether `side`'s general is attacked. A board without that general
/// counts as in check.
pub fn is_in_check(cells: &Cells, side: Side) -> bool {
    match find_general(cells, side) {
        Some(general) => is_attacked(cells, general, side.opposite()),
        None => true,
    }
}

//! Piece movement geometry, ignoring king safety.
//!
//! Every piece kind maps to one pure function through [`rule`]. Nothing here
//! looks at whose turn it is or at check: the piece on the source square
//! supplies its own color. Callers reject destinations occupied by the
//! mover's own color before asking.

use crate::board::{Board, Occupant};
use crate::state::EnPassant;
use chess_core::{Piece, Square};

/// Geometry test for one piece kind.
pub type Rule = fn(&Board, Option<EnPassant>, Occupant, Square, Square) -> bool;

/// Returns the movement rule of a piece kind.
pub const fn rule(piece: Piece) -> Rule {
    match piece {
        Piece::Pawn => pawn,
        Piece::Knight => knight,
        Piece::Bishop => bishop,
        Piece::Rook => rook,
        Piece::Queen => queen,
        Piece::King => king,
    }
}

/// Returns true if the piece on `from` may move to `to` by its own
/// movement pattern. Castling is not a geometric king move.
pub fn pseudo_legal(board: &Board, en_passant: Option<EnPassant>, from: Square, to: Square) -> bool {
    match board.get(from) {
        Some(mover) if from != to => rule(mover.piece)(board, en_passant, mover, from, to),
        _ => false,
    }
}

/// Returns true if the piece on `from` attacks `target`, whether or not
/// anything stands there.
///
/// Only pawns differ from [`pseudo_legal`]: they attack diagonally forward
/// and never by pushing.
pub fn attacks(board: &Board, from: Square, target: Square) -> bool {
    match board.get(from) {
        Some(attacker) if attacker.piece == Piece::Pawn => {
            let (d_row, d_col) = delta(from, target);
            d_row == attacker.color.forward() && d_col.abs() == 1
        }
        Some(attacker) if from != target => rule(attacker.piece)(board, None, attacker, from, target),
        _ => false,
    }
}

#[inline]
fn delta(from: Square, to: Square) -> (i8, i8) {
    (
        to.row() as i8 - from.row() as i8,
        to.col() as i8 - from.col() as i8,
    )
}

/// True if every square strictly between `from` and `to` is empty.
/// The squares must share a row, column or diagonal.
fn path_clear(board: &Board, from: Square, to: Square) -> bool {
    let (d_row, d_col) = delta(from, to);
    let step = (d_row.signum(), d_col.signum());
    let mut current = from.offset(step.0, step.1);
    while let Some(sq) = current {
        if sq == to {
            return true;
        }
        if !board.is_empty(sq) {
            return false;
        }
        current = sq.offset(step.0, step.1);
    }
    false
}

fn pawn(board: &Board, en_passant: Option<EnPassant>, pawn: Occupant, from: Square, to: Square) -> bool {
    let forward = pawn.color.forward();
    let (d_row, d_col) = delta(from, to);

    if d_col == 0 {
        if d_row == forward {
            return board.is_empty(to);
        }
        if d_row == 2 * forward && !pawn.has_moved && from.row() == pawn.color.pawn_row() {
            return from
                .offset(forward, 0)
                .is_some_and(|skipped| board.is_empty(skipped))
                && board.is_empty(to);
        }
        return false;
    }

    if d_col.abs() != 1 || d_row != forward {
        return false;
    }
    match board.get(to) {
        Some(target) => target.color != pawn.color,
        None => en_passant.is_some_and(|ep| {
            ep.pawn_color != pawn.color
                && ep.target_square() == Some(to)
                && Square::new(from.row(), to.col())
                    .and_then(|sq| board.get(sq))
                    .is_some_and(|victim| victim.is(Piece::Pawn, ep.pawn_color))
        }),
    }
}

fn knight(_: &Board, _: Option<EnPassant>, _: Occupant, from: Square, to: Square) -> bool {
    let (d_row, d_col) = delta(from, to);
    matches!((d_row.abs(), d_col.abs()), (1, 2) | (2, 1))
}

fn bishop(board: &Board, _: Option<EnPassant>, _: Occupant, from: Square, to: Square) -> bool {
    let (d_row, d_col) = delta(from, to);
    d_row != 0 && d_row.abs() == d_col.abs() && path_clear(board, from, to)
}

fn rook(board: &Board, _: Option<EnPassant>, _: Occupant, from: Square, to: Square) -> bool {
    let (d_row, d_col) = delta(from, to);
    (d_row == 0) != (d_col == 0) && path_clear(board, from, to)
}

fn queen(board: &Board, ep: Option<EnPassant>, queen: Occupant, from: Square, to: Square) -> bool {
    rook(board, ep, queen, from, to) || bishop(board, ep, queen, from, to)
}

fn king(_: &Board, _: Option<EnPassant>, _: Occupant, from: Square, to: Square) -> bool {
    let (d_row, d_col) = delta(from, to);
    d_row.abs().max(d_col.abs()) == 1
}

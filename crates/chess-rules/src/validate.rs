//! Full move legality.

use crate::board::{Occupant, KING_HOME_COL};
use crate::check::{is_king_in_check, is_square_attacked};
use crate::geometry::pseudo_legal;
use crate::state::CastleSide;
use crate::{BoardState, InvariantViolation, Rejection, RuleError};
use chess_core::{Color, MoveRequest, Piece, Square};

/// Checks a request for the side to move.
///
/// Leaves `state` untouched whatever the answer.
pub fn validate(state: &BoardState, request: &MoveRequest) -> Result<(), RuleError> {
    if state.is_game_over() {
        return Err(Rejection::GameOver.into());
    }
    let (from, to) = squares(request)?;
    validate_for(state, state.turn(), from, to)
}

/// Like [`validate`], but folds rejections into `false`.
///
/// Only a corrupt board is an error.
pub fn is_legal(state: &BoardState, request: &MoveRequest) -> Result<bool, InvariantViolation> {
    match validate(state, request) {
        Ok(()) => Ok(true),
        Err(RuleError::Rejected(_)) => Ok(false),
        Err(RuleError::Corrupt(violation)) => Err(violation),
    }
}

pub(crate) fn squares(request: &MoveRequest) -> Result<(Square, Square), Rejection> {
    match (request.from.to_square(), request.to.to_square()) {
        (Some(from), Some(to)) => Ok((from, to)),
        _ => Err(Rejection::OutOfBounds),
    }
}

/// Checks a move of `side`'s piece from `from` to `to`, regardless of whose
/// turn the state says it is.
pub fn validate_for(
    state: &BoardState,
    side: Color,
    from: Square,
    to: Square,
) -> Result<(), RuleError> {
    let board = state.board();
    let mover = board.get(from).ok_or(Rejection::EmptySource)?;
    if mover.color != side {
        return Err(Rejection::WrongTurn.into());
    }
    if board.get(to).is_some_and(|target| target.color == side) {
        return Err(Rejection::OwnPieceOnTarget.into());
    }

    let mut trial = *board;
    trial.play(from, to, Piece::Queen);
    if is_king_in_check(&trial, side)? {
        return Err(Rejection::KingLeftInCheck.into());
    }

    match castle_side(mover, from, to) {
        Some(castle) => check_castling(state, mover, castle),
        None if pseudo_legal(board, state.en_passant(), from, to) => Ok(()),
        None => Err(Rejection::IllegalGeometry.into()),
    }
}

/// A king stepping two columns along its back row from its home square.
fn castle_side(mover: Occupant, from: Square, to: Square) -> Option<CastleSide> {
    if mover.piece != Piece::King
        || from.row() != mover.color.back_row()
        || from.col() != KING_HOME_COL
        || to.row() != from.row()
    {
        return None;
    }
    CastleSide::BOTH
        .into_iter()
        .find(|side| side.king_target_col() == to.col())
}

fn check_castling(state: &BoardState, king: Occupant, side: CastleSide) -> Result<(), RuleError> {
    let board = state.board();
    let color = king.color;
    let row = color.back_row();

    let rook_ready = side
        .rook_home(color)
        .and_then(|sq| board.get(sq))
        .is_some_and(|rook| rook.is(Piece::Rook, color) && !rook.has_moved);
    if king.has_moved || !rook_ready || !state.castling().has(color, side) {
        return Err(Rejection::CastlingNotAllowed.into());
    }

    let (low, high) = if side.rook_col() < KING_HOME_COL {
        (side.rook_col() + 1, KING_HOME_COL)
    } else {
        (KING_HOME_COL + 1, side.rook_col())
    };
    let path_empty = (low..high)
        .filter_map(|col| Square::new(row, col))
        .all(|sq| board.is_empty(sq));
    if !path_empty {
        return Err(Rejection::CastlingNotAllowed.into());
    }

    if is_king_in_check(board, color)? {
        return Err(Rejection::CastlingNotAllowed.into());
    }

    let (first, last) = if side.king_target_col() < KING_HOME_COL {
        (side.king_target_col(), KING_HOME_COL)
    } else {
        (KING_HOME_COL, side.king_target_col())
    };
    let king_path_attacked = (first..=last)
        .filter_map(|col| Square::new(row, col))
        .any(|sq| is_square_attacked(board, sq, color.opposite()));
    if king_path_attacked {
        return Err(Rejection::CastlingNotAllowed.into());
    }
    Ok(())
}

//! Legal move enumeration and the "any legal move left" scan.

use crate::validate::validate_for;
use crate::{BoardState, InvariantViolation, RuleError};
use chess_core::{Color, Square};

/// Returns true if `color` has at least one legal move in `state`.
///
/// Stops at the first legal move found.
pub fn has_any_legal_move(state: &BoardState, color: Color) -> Result<bool, InvariantViolation> {
    for (from, _) in state.board().pieces_of(color) {
        for to in Square::all() {
            if is_legal_for(state, color, from, to)? {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// Lists every legal (from, to) pair for the side to move.
///
/// A promoting pawn move is listed once, whatever piece it becomes. Empty
/// once the game is over.
pub fn legal_moves(state: &BoardState) -> Result<Vec<(Square, Square)>, InvariantViolation> {
    let mut moves = Vec::new();
    if state.is_game_over() {
        return Ok(moves);
    }
    let side = state.turn();
    for (from, _) in state.board().pieces_of(side) {
        for to in Square::all() {
            if is_legal_for(state, side, from, to)? {
                moves.push((from, to));
            }
        }
    }
    Ok(moves)
}

fn is_legal_for(
    state: &BoardState,
    side: Color,
    from: Square,
    to: Square,
) -> Result<bool, InvariantViolation> {
    match validate_for(state, side, from, to) {
        Ok(()) => Ok(true),
        Err(RuleError::Rejected(_)) => Ok(false),
        Err(RuleError::Corrupt(violation)) => Err(violation),
    }
}

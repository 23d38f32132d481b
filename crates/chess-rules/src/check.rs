//! Check detection.
//!
//! Built on [`geometry`](crate::geometry) alone. The validator's king-safety
//! filter is built on top of this module, so nothing here may call back into
//! the validator.

use crate::board::Board;
use crate::geometry::attacks;
use crate::InvariantViolation;
use chess_core::{Color, Square};

/// Returns true if any piece of color `by` attacks `target`.
pub fn is_square_attacked(board: &Board, target: Square, by: Color) -> bool {
    board
        .pieces_of(by)
        .any(|(from, _)| attacks(board, from, target))
}

/// Returns true if the king of `color` is attacked.
///
/// Fails if `color` does not have exactly one king.
pub fn is_king_in_check(board: &Board, color: Color) -> Result<bool, InvariantViolation> {
    let king = board.king_square(color)?;
    Ok(is_square_attacked(board, king, color.opposite()))
}

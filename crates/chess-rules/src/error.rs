//! Error types for move processing.

use chess_core::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a move request was refused.
///
/// Rejections are ordinary outcomes: the board is left untouched and the
/// game continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    #[error("the game is already over")]
    GameOver,
    #[error("square lies outside the board")]
    OutOfBounds,
    #[error("no piece on the source square")]
    EmptySource,
    #[error("piece belongs to the side not on move")]
    WrongTurn,
    #[error("destination holds a piece of the same color")]
    OwnPieceOnTarget,
    #[error("move would leave the king in check")]
    KingLeftInCheck,
    #[error("piece cannot move that way")]
    IllegalGeometry,
    #[error("castling is not allowed")]
    CastlingNotAllowed,
}

/// A board that breaks the one-king-per-color invariant.
///
/// Never produced by legal play; seeing one means the state is corrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("{0} has no king on the board")]
    MissingKing(Color),
    #[error("{0} has more than one king on the board")]
    ExtraKing(Color),
}

/// Failure of a move call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("move rejected: {0}")]
    Rejected(#[from] Rejection),
    #[error("corrupt board: {0}")]
    Corrupt(#[from] InvariantViolation),
}

impl RuleError {
    /// Returns the rejection reason, if this is an ordinary rejection.
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            RuleError::Rejected(r) => Some(*r),
            RuleError::Corrupt(_) => None,
        }
    }
}

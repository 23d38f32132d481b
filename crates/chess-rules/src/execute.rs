//! Applying validated moves.

use crate::board::SpecialMove;
use crate::state::{CastleSide, EnPassant, Outcome};
use crate::validate::{squares, validate_for};
use crate::{BoardState, Rejection, RuleError};
use chess_core::{Color, MoveRequest, Piece, Square};
use serde::{Deserialize, Serialize};

/// Everything an applied move changed, so callers can emit events without
/// diffing states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub from: Square,
    pub to: Square,
    /// The piece that moved, before any promotion.
    pub piece: Piece,
    pub color: Color,
    pub captured: Option<Piece>,
    pub special: Option<SpecialMove>,
    /// The side left in check by this move, if any.
    pub check: Option<Color>,
    /// Set when this move ended the game.
    pub terminal: Option<Outcome>,
}

/// Validates `request` for the side to move and applies it.
///
/// A rejected request leaves `state` exactly as it was.
pub fn apply_move(state: &mut BoardState, request: &MoveRequest) -> Result<MoveOutcome, RuleError> {
    if state.is_game_over() {
        return Err(Rejection::GameOver.into());
    }
    let (from, to) = squares(request)?;
    validate_for(state, state.turn(), from, to)?;
    commit(state, from, to, request.promotion_piece())
}

/// Applies an already validated move.
pub(crate) fn commit(
    state: &mut BoardState,
    from: Square,
    to: Square,
    promotion: Piece,
) -> Result<MoveOutcome, RuleError> {
    let mover = state.board.get(from).ok_or(Rejection::EmptySource)?;
    let color = mover.color;

    state.en_passant = None;
    let played = state.board.play(from, to, promotion);

    if mover.piece == Piece::King {
        state.castling.revoke_color(color);
    }
    for owner in Color::BOTH {
        for side in CastleSide::BOTH {
            let home = side.rook_home(owner);
            if home == Some(from) || home == Some(to) {
                state.castling.revoke(owner, side);
            }
        }
    }

    state.move_count = state.move_count.saturating_add(1);
    if mover.piece == Piece::Pawn && from.row().abs_diff(to.row()) == 2 {
        state.en_passant = Some(EnPassant {
            file: from.col(),
            pawn_color: color,
        });
    }
    state.turn = color.opposite();
    state.settle()?;

    let opponent = color.opposite();
    let outcome = MoveOutcome {
        from,
        to,
        piece: mover.piece,
        color,
        captured: played.captured.map(|o| o.piece),
        special: played.special,
        check: state.is_in_check(opponent).then_some(opponent),
        terminal: state.terminal,
    };

    tracing::debug!(
        from = %from,
        to = %to,
        piece = %mover.piece,
        color = %color,
        captured = ?outcome.captured,
        special = ?outcome.special,
        "Move applied"
    );
    if let Some(terminal) = outcome.terminal {
        tracing::debug!(outcome = ?terminal, moves = state.move_count, "Game finished");
    }
    Ok(outcome)
}

//! Serializable copies of a game state.

use crate::board::{Board, Occupant};
use crate::state::{CastlingRights, EnPassant, Outcome};
use crate::{BoardState, InvariantViolation};
use chess_core::{Color, Square};
use serde::{Deserialize, Serialize};

/// A self-contained copy of a [`BoardState`], suitable for sending to
/// observers. `squares` is indexed `[row][col]`, row 0 being White's back
/// rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub squares: [[Option<Occupant>; 8]; 8],
    pub turn: Color,
    pub move_count: u32,
    pub white_in_check: bool,
    pub black_in_check: bool,
    pub terminal: Option<Outcome>,
    pub castling: CastlingRights,
    pub en_passant: Option<EnPassant>,
}

impl BoardState {
    /// Takes a snapshot of the current state.
    pub fn snapshot(&self) -> BoardSnapshot {
        let mut squares = [[None; 8]; 8];
        for sq in Square::all() {
            squares[sq.row() as usize][sq.col() as usize] = self.board.get(sq);
        }
        BoardSnapshot {
            squares,
            turn: self.turn,
            move_count: self.move_count,
            white_in_check: self.is_in_check(Color::White),
            black_in_check: self.is_in_check(Color::Black),
            terminal: self.terminal,
            castling: self.castling,
            en_passant: self.en_passant,
        }
    }

    /// Rebuilds a state from a snapshot.
    ///
    /// Check flags are recomputed from the grid rather than trusted. A
    /// recorded outcome is kept; otherwise the outcome is derived.
    pub fn from_snapshot(snapshot: &BoardSnapshot) -> Result<Self, InvariantViolation> {
        let mut board = Board::empty();
        for sq in Square::all() {
            board.set(sq, snapshot.squares[sq.row() as usize][sq.col() as usize]);
        }
        let mut state = BoardState::from_parts(
            board,
            snapshot.turn,
            snapshot.castling,
            snapshot.en_passant,
            snapshot.move_count,
        )?;
        if snapshot.terminal.is_some() {
            state.terminal = snapshot.terminal;
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{MoveRequest, Piece};

    #[test]
    fn snapshot_layout() {
        let snapshot = BoardState::new().snapshot();
        assert_eq!(
            snapshot.squares[0][4],
            Some(Occupant::new(Piece::King, Color::White))
        );
        assert_eq!(
            snapshot.squares[7][3],
            Some(Occupant::new(Piece::Queen, Color::Black))
        );
        assert_eq!(snapshot.squares[3][4], None);
        assert_eq!(snapshot.turn, Color::White);
        assert!(!snapshot.white_in_check);
    }

    #[test]
    fn roundtrip_keeps_metadata() {
        let mut state = BoardState::new();
        for (from, to) in [("e2", "e4"), ("d7", "d5"), ("e4", "e5"), ("f7", "f5")] {
            crate::apply_move(&mut state, &MoveRequest::from_algebraic(from, to).unwrap())
                .unwrap();
        }
        let restored = BoardState::from_snapshot(&state.snapshot()).unwrap();
        assert_eq!(restored, state);
        assert!(restored.en_passant().is_some());
    }

    #[test]
    fn check_flags_are_recomputed() {
        let state = BoardState::from_fen("4k3/8/8/8/8/8/8/4RK2 b - - 0 1").unwrap();
        let mut snapshot = state.snapshot();
        snapshot.black_in_check = false;
        let restored = BoardState::from_snapshot(&snapshot).unwrap();
        assert!(restored.is_in_check(Color::Black));
    }

    #[test]
    fn missing_king_is_rejected() {
        let mut snapshot = BoardState::new().snapshot();
        snapshot.squares[7][4] = None;
        assert_eq!(
            BoardState::from_snapshot(&snapshot),
            Err(InvariantViolation::MissingKing(Color::Black))
        );
    }
}

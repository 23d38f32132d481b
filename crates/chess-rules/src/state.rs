//! Game state: the grid plus everything needed to decide legality.

use crate::board::{Board, Occupant, KING_HOME_COL};
use crate::{check, scan, InvariantViolation};
use chess_core::{Color, FenError, FenPosition, Piece, Square};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Side of the board a castling move goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    pub const BOTH: [CastleSide; 2] = [CastleSide::Kingside, CastleSide::Queenside];

    /// Column the rook starts on.
    #[inline]
    pub const fn rook_col(self) -> u8 {
        match self {
            CastleSide::Kingside => 7,
            CastleSide::Queenside => 0,
        }
    }

    /// Column the king lands on.
    #[inline]
    pub const fn king_target_col(self) -> u8 {
        match self {
            CastleSide::Kingside => 6,
            CastleSide::Queenside => 2,
        }
    }

    /// Column the rook lands on, next to the king on the inner side.
    #[inline]
    pub const fn rook_target_col(self) -> u8 {
        match self {
            CastleSide::Kingside => 5,
            CastleSide::Queenside => 3,
        }
    }

    /// FEN castling letter for this side and color ("K", "Q", "k", "q").
    pub const fn fen_letter(self, color: Color) -> char {
        let c = match self {
            CastleSide::Kingside => 'k',
            CastleSide::Queenside => 'q',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Starting square of this side's rook for `color`.
    #[inline]
    pub fn rook_home(self, color: Color) -> Option<Square> {
        Square::new(color.back_row(), self.rook_col())
    }
}

/// Castling rights flags.
///
/// Rights are only ever removed; nothing in the engine grants them back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    #[inline]
    const fn flag(color: Color, side: CastleSide) -> u8 {
        let shift = match side {
            CastleSide::Kingside => 0,
            CastleSide::Queenside => 1,
        };
        1 << (color.index() * 2 + shift)
    }

    /// Returns true if `color` may still castle towards `side`.
    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::flag(color, side) != 0
    }

    /// Drops a single right.
    #[inline]
    pub fn revoke(&mut self, color: Color, side: CastleSide) {
        self.0 &= !Self::flag(color, side);
    }

    /// Drops both rights of a color.
    #[inline]
    pub fn revoke_color(&mut self, color: Color) {
        for side in CastleSide::BOTH {
            self.revoke(color, side);
        }
    }

    fn to_fen(self) -> String {
        let s: String = Color::BOTH
            .into_iter()
            .flat_map(|color| CastleSide::BOTH.map(|side| (color, side)))
            .filter(|&(color, side)| self.has(color, side))
            .map(|(color, side)| side.fen_letter(color))
            .collect();
        if s.is_empty() {
            "-".to_string()
        } else {
            s
        }
    }
}

/// A pawn that just advanced two squares and may be taken en passant.
///
/// Lives for exactly one ply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnPassant {
    /// Column of the pawn that advanced.
    pub file: u8,
    /// Color of the pawn that advanced (the one that can be captured).
    pub pawn_color: Color,
}

impl EnPassant {
    /// The square a capturing pawn lands on (the one the pawn skipped).
    pub fn target_square(self) -> Option<Square> {
        let row = self.pawn_color.pawn_row() as i8 + self.pawn_color.forward();
        Square::from_coords(row as i32, self.file as i32)
    }
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
}

impl Outcome {
    /// The winning color, or `None` for a draw.
    pub const fn winner(self) -> Option<Color> {
        match self {
            Outcome::Checkmate { winner } => Some(winner),
            Outcome::Stalemate => None,
        }
    }
}

/// Errors building a state from FEN.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PositionError {
    #[error(transparent)]
    Fen(#[from] FenError),
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

/// The complete game state.
///
/// Only [`apply_move`](crate::apply_move) mutates a state once it exists;
/// check flags and the terminal outcome are recomputed on every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    pub(crate) board: Board,
    pub(crate) turn: Color,
    pub(crate) move_count: u32,
    pub(crate) in_check: [bool; 2],
    pub(crate) en_passant: Option<EnPassant>,
    pub(crate) castling: CastlingRights,
    pub(crate) terminal: Option<Outcome>,
}

impl BoardState {
    /// Creates the standard starting position with White to move.
    pub fn new() -> Self {
        BoardState {
            board: Board::standard(),
            turn: Color::White,
            move_count: 0,
            in_check: [false; 2],
            en_passant: None,
            castling: CastlingRights::ALL,
            terminal: None,
        }
    }

    /// Builds a state from its parts, validating the king invariant and
    /// deriving check flags and the terminal outcome.
    pub fn from_parts(
        board: Board,
        turn: Color,
        castling: CastlingRights,
        en_passant: Option<EnPassant>,
        move_count: u32,
    ) -> Result<Self, InvariantViolation> {
        board.check_kings()?;
        let mut state = BoardState {
            board,
            turn,
            move_count,
            in_check: [false; 2],
            en_passant,
            castling,
            terminal: None,
        };
        state.settle()?;
        Ok(state)
    }

    /// Builds a state from a FEN string.
    ///
    /// FEN carries no move history, so `has_moved` is inferred: pawns off
    /// their starting row, and kings or rooks off their home square or
    /// without a matching castling right, count as moved.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        let parsed = FenPosition::parse(fen)?;
        let mut board = Board::empty();
        for &(sq, piece, color) in &parsed.pieces {
            let has_right = |side: CastleSide| parsed.has_castling(side.fen_letter(color));
            let on_back_row = sq.row() == color.back_row();
            let unmoved = match piece {
                Piece::Pawn => sq.row() == color.pawn_row(),
                Piece::King => {
                    on_back_row
                        && sq.col() == KING_HOME_COL
                        && (has_right(CastleSide::Kingside) || has_right(CastleSide::Queenside))
                }
                Piece::Rook => CastleSide::BOTH
                    .into_iter()
                    .any(|side| on_back_row && sq.col() == side.rook_col() && has_right(side)),
                _ => true,
            };
            let occupant = Occupant::new(piece, color);
            board.set(sq, Some(if unmoved { occupant } else { occupant.moved() }));
        }

        let mut castling = CastlingRights::ALL;
        for color in Color::BOTH {
            for side in CastleSide::BOTH {
                if !parsed.has_castling(side.fen_letter(color)) {
                    castling.revoke(color, side);
                }
            }
        }

        let en_passant = parsed.en_passant.map(|sq| EnPassant {
            file: sq.col(),
            pawn_color: if sq.row() == 2 {
                Color::White
            } else {
                Color::Black
            },
        });

        let move_count = parsed
            .fullmove_number
            .saturating_sub(1)
            .checked_mul(2)
            .and_then(|plies| plies.checked_add(u32::from(parsed.side_to_move == Color::Black)))
            .ok_or_else(|| FenError::InvalidCounter(parsed.fullmove_number.to_string()))?;

        Ok(Self::from_parts(
            board,
            parsed.side_to_move,
            castling,
            en_passant,
            move_count,
        )?)
    }

    /// Writes the position as FEN. The halfmove clock is not tracked and is
    /// always written as 0.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();
        for row in (0..8u8).rev() {
            let mut empty = 0;
            for col in 0..8u8 {
                match Square::new(row, col).and_then(|sq| self.board.get(sq)) {
                    Some(o) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(o.piece.to_fen_char(o.color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if row > 0 {
                fen.push('/');
            }
        }
        let turn = match self.turn {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let ep = self
            .en_passant
            .and_then(EnPassant::target_square)
            .map_or_else(|| "-".to_string(), |sq| sq.to_algebraic());
        format!(
            "{} {} {} {} 0 {}",
            fen,
            turn,
            self.castling.to_fen(),
            ep,
            self.move_count / 2 + 1
        )
    }

    /// Recomputes both check flags and, if the side to move has no legal
    /// move, the terminal outcome.
    pub(crate) fn settle(&mut self) -> Result<(), InvariantViolation> {
        for color in Color::BOTH {
            self.in_check[color.index()] = check::is_king_in_check(&self.board, color)?;
        }
        if self.terminal.is_none() && !scan::has_any_legal_move(self, self.turn)? {
            self.terminal = Some(if self.is_in_check(self.turn) {
                Outcome::Checkmate {
                    winner: self.turn.opposite(),
                }
            } else {
                Outcome::Stalemate
            });
        }
        Ok(())
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the piece on `sq`, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Occupant> {
        self.board.get(sq)
    }

    /// The side to move.
    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Number of moves applied so far.
    #[inline]
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    #[inline]
    pub fn is_in_check(&self, color: Color) -> bool {
        self.in_check[color.index()]
    }

    #[inline]
    pub fn en_passant(&self) -> Option<EnPassant> {
        self.en_passant
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    pub fn terminal(&self) -> Option<Outcome> {
        self.terminal
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.terminal.is_some()
    }

    /// The winner of a finished game; `None` while playing or after a draw.
    #[inline]
    pub fn winner(&self) -> Option<Color> {
        self.terminal.and_then(Outcome::winner)
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn new_is_standard_start() {
        let state = BoardState::new();
        assert_eq!(state.turn(), Color::White);
        assert_eq!(state.move_count(), 0);
        assert!(!state.is_in_check(Color::White));
        assert!(!state.is_in_check(Color::Black));
        assert_eq!(state.castling(), CastlingRights::ALL);
        assert_eq!(state.terminal(), None);
        assert_eq!(state.to_fen(), START);
    }

    #[test]
    fn from_fen_matches_new() {
        assert_eq!(BoardState::from_fen(START).unwrap(), BoardState::new());
    }

    #[test]
    fn fen_roundtrip_with_en_passant() {
        let fen = "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3";
        let state = BoardState::from_fen(fen).unwrap();
        assert_eq!(
            state.en_passant(),
            Some(EnPassant {
                file: 3,
                pawn_color: Color::Black
            })
        );
        assert_eq!(state.move_count(), 4);
        assert_eq!(state.to_fen(), fen);
    }

    #[test]
    fn from_fen_infers_has_moved() {
        let state = BoardState::from_fen("r3k2r/8/8/8/8/8/4P3/R3K2R w Kq - 0 1").unwrap();
        assert!(!state.piece_at(sq("e1")).unwrap().has_moved);
        assert!(!state.piece_at(sq("h1")).unwrap().has_moved);
        assert!(state.piece_at(sq("a1")).unwrap().has_moved);
        assert!(state.piece_at(sq("h8")).unwrap().has_moved);
        assert!(!state.piece_at(sq("a8")).unwrap().has_moved);
        assert!(!state.piece_at(sq("e2")).unwrap().has_moved);
        assert!(state.castling().has(Color::White, CastleSide::Kingside));
        assert!(!state.castling().has(Color::White, CastleSide::Queenside));
    }

    #[test]
    fn from_fen_rejects_missing_king() {
        assert_eq!(
            BoardState::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(PositionError::Invariant(InvariantViolation::MissingKing(
                Color::Black
            )))
        );
    }

    #[test]
    fn from_fen_rejects_unrepresentable_move_number() {
        assert_eq!(
            BoardState::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 4294967295"),
            Err(PositionError::Fen(FenError::InvalidCounter(
                "4294967295".to_string()
            )))
        );
        let mut last = BoardState::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 2147483648").unwrap();
        assert_eq!(last.move_count(), u32::MAX);
        let request = chess_core::MoveRequest::from_algebraic("e8", "d8").unwrap();
        crate::apply_move(&mut last, &request).unwrap();
        assert_eq!(last.move_count(), u32::MAX);
    }

    #[test]
    fn from_fen_detects_finished_positions() {
        let mate = BoardState::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 b - - 0 1").unwrap();
        assert_eq!(mate.terminal(), None);

        let mated = BoardState::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        assert!(mated.is_in_check(Color::Black));
        assert_eq!(mated.winner(), Some(Color::White));

        let stalemate = BoardState::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(stalemate.terminal(), Some(Outcome::Stalemate));
        assert_eq!(stalemate.winner(), None);
    }

    #[test]
    fn castling_rights_only_shrink() {
        let mut rights = CastlingRights::ALL;
        rights.revoke(Color::White, CastleSide::Kingside);
        assert!(!rights.has(Color::White, CastleSide::Kingside));
        assert!(rights.has(Color::White, CastleSide::Queenside));
        rights.revoke_color(Color::Black);
        assert!(!rights.has(Color::Black, CastleSide::Kingside));
        assert!(!rights.has(Color::Black, CastleSide::Queenside));
        assert_eq!(rights.to_fen(), "Q");
        assert_eq!(CastlingRights::NONE.to_fen(), "-");
    }

    #[test]
    fn en_passant_squares() {
        let white = EnPassant {
            file: 4,
            pawn_color: Color::White,
        };
        assert_eq!(white.target_square(), Some(sq("e3")));
        let black = EnPassant {
            file: 3,
            pawn_color: Color::Black,
        };
        assert_eq!(black.target_square(), Some(sq("d6")));
    }
}

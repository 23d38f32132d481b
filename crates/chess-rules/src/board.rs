//! The 8×8 grid of pieces.

use crate::state::CastleSide;
use crate::InvariantViolation;
use chess_core::{Color, Piece, Square};
use serde::{Deserialize, Serialize};

/// A piece standing on a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Occupant {
    pub piece: Piece,
    pub color: Color,
    pub has_moved: bool,
}

impl Occupant {
    /// Creates a piece that has not moved yet.
    #[inline]
    pub const fn new(piece: Piece, color: Color) -> Self {
        Occupant {
            piece,
            color,
            has_moved: false,
        }
    }

    /// Returns this piece marked as moved.
    #[inline]
    pub const fn moved(self) -> Self {
        Occupant {
            has_moved: true,
            ..self
        }
    }

    #[inline]
    pub fn is(self, piece: Piece, color: Color) -> bool {
        self.piece == piece && self.color == color
    }
}

/// Special side effects of a played move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialMove {
    /// A pawn captured en passant; the victim stood on `captured`.
    EnPassant { captured: Square },
    /// The king castled and the rook was relocated.
    Castle(CastleSide),
    /// A pawn reached the last row and became `piece`.
    Promotion(Piece),
}

/// What a move did to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Played {
    pub captured: Option<Occupant>,
    pub special: Option<SpecialMove>,
}

const BACK_ROW: [Piece; 8] = [
    Piece::Rook,
    Piece::Knight,
    Piece::Bishop,
    Piece::Queen,
    Piece::King,
    Piece::Bishop,
    Piece::Knight,
    Piece::Rook,
];

/// Column of both kings at the start of a game.
pub const KING_HOME_COL: u8 = 4;

/// Piece placement only, with no turn or rights metadata.
///
/// `Board` is `Copy`: hypothetical moves are played on a copy so the live
/// position is never seen half-updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Occupant>; 64],
}

impl Board {
    /// Creates an empty board.
    pub const fn empty() -> Self {
        Board {
            squares: [None; 64],
        }
    }

    /// Creates the standard starting placement.
    pub fn standard() -> Self {
        let mut board = Board::empty();
        for color in Color::BOTH {
            for (col, piece) in BACK_ROW.iter().enumerate() {
                board.put(color.back_row(), col as u8, Occupant::new(*piece, color));
                board.put(color.pawn_row(), col as u8, Occupant::new(Piece::Pawn, color));
            }
        }
        board
    }

    fn put(&mut self, row: u8, col: u8, occupant: Occupant) {
        self.squares[(row * 8 + col) as usize] = Some(occupant);
    }

    /// Returns the piece on `sq`, if any.
    #[inline]
    pub fn get(&self, sq: Square) -> Option<Occupant> {
        self.squares[sq.index() as usize]
    }

    #[inline]
    pub fn set(&mut self, sq: Square, occupant: Option<Occupant>) {
        self.squares[sq.index() as usize] = occupant;
    }

    /// Removes and returns the piece on `sq`.
    #[inline]
    pub fn take(&mut self, sq: Square) -> Option<Occupant> {
        self.squares[sq.index() as usize].take()
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.get(sq).is_none()
    }

    /// Iterates the squares holding pieces of `color`.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Occupant)> + '_ {
        Square::all().filter_map(move |sq| match self.get(sq) {
            Some(occupant) if occupant.color == color => Some((sq, occupant)),
            _ => None,
        })
    }

    /// Locates the king of `color`, which must be unique.
    pub fn king_square(&self, color: Color) -> Result<Square, InvariantViolation> {
        let mut kings = self
            .pieces_of(color)
            .filter(|(_, occupant)| occupant.piece == Piece::King)
            .map(|(sq, _)| sq);
        let king = kings.next().ok_or(InvariantViolation::MissingKing(color))?;
        if kings.next().is_some() {
            return Err(InvariantViolation::ExtraKing(color));
        }
        Ok(king)
    }

    /// Checks the one-king-per-color invariant.
    pub fn check_kings(&self) -> Result<(), InvariantViolation> {
        for color in Color::BOTH {
            self.king_square(color)?;
        }
        Ok(())
    }

    /// Moves the piece on `from` to `to` with every grid side effect:
    /// en passant removal, castling rook relocation and promotion.
    ///
    /// Performs no legality checks. Metadata (turn, rights, en passant
    /// target) is the caller's business.
    pub(crate) fn play(&mut self, from: Square, to: Square, promotion: Piece) -> Played {
        let Some(mut mover) = self.take(from) else {
            return Played::default();
        };
        let mut played = Played {
            captured: self.take(to),
            special: None,
        };

        if mover.piece == Piece::Pawn && from.col() != to.col() && played.captured.is_none() {
            if let Some(victim) = Square::new(from.row(), to.col()) {
                if self
                    .get(victim)
                    .is_some_and(|o| o.is(Piece::Pawn, mover.color.opposite()))
                {
                    played.captured = self.take(victim);
                    played.special = Some(SpecialMove::EnPassant { captured: victim });
                }
            }
        }

        if mover.piece == Piece::King
            && from.row() == to.row()
            && from.col().abs_diff(to.col()) == 2
        {
            let side = if to.col() > from.col() {
                CastleSide::Kingside
            } else {
                CastleSide::Queenside
            };
            let rook_from = Square::new(from.row(), side.rook_col());
            let rook_to = Square::new(from.row(), side.rook_target_col());
            if let (Some(rook_from), Some(rook_to)) = (rook_from, rook_to) {
                if let Some(rook) = self.take(rook_from) {
                    self.set(rook_to, Some(rook.moved()));
                }
            }
            played.special = Some(SpecialMove::Castle(side));
        }

        mover = mover.moved();
        if mover.piece == Piece::Pawn && to.row() == mover.color.promotion_row() {
            mover = Occupant::new(promotion, mover.color).moved();
            played.special = Some(SpecialMove::Promotion(promotion));
        }
        self.set(to, Some(mover));
        played
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

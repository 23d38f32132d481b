//! Move requests as submitted by players.

use crate::{Piece, Square};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw board coordinates as received from a client.
///
/// Unlike [`Square`], a `Coord` may lie off the board; the rules engine
/// rejects such requests during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub const fn new(row: i32, col: i32) -> Self {
        Coord { row, col }
    }

    /// Returns the square at these coordinates, or `None` when off the board.
    #[inline]
    pub const fn to_square(self) -> Option<Square> {
        Square::from_coords(self.row, self.col)
    }
}

impl From<Square> for Coord {
    fn from(sq: Square) -> Self {
        Coord::new(sq.row() as i32, sq.col() as i32)
    }
}

/// Piece a pawn may promote to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Promotion {
    #[default]
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl Promotion {
    /// Returns the piece this promotion produces.
    #[inline]
    pub const fn piece(self) -> Piece {
        match self {
            Promotion::Queen => Piece::Queen,
            Promotion::Rook => Piece::Rook,
            Promotion::Bishop => Piece::Bishop,
            Promotion::Knight => Piece::Knight,
        }
    }
}

/// A request to move the piece on `from` to `to`.
///
/// `promotion` only matters when a pawn reaches the last row; it defaults to
/// a queen there and is ignored everywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRequest {
    pub from: Coord,
    pub to: Coord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<Promotion>,
}

impl MoveRequest {
    /// Creates a request without a promotion choice.
    pub const fn new(from: Coord, to: Coord) -> Self {
        MoveRequest {
            from,
            to,
            promotion: None,
        }
    }

    /// Creates a request between two on-board squares.
    pub fn between(from: Square, to: Square) -> Self {
        Self::new(from.into(), to.into())
    }

    /// Parses a request from two algebraic squares, e.g. `("e2", "e4")`.
    pub fn from_algebraic(from: &str, to: &str) -> Option<Self> {
        Some(Self::between(
            Square::from_algebraic(from)?,
            Square::from_algebraic(to)?,
        ))
    }

    /// Sets the promotion choice.
    pub const fn with_promotion(mut self, promotion: Promotion) -> Self {
        self.promotion = Some(promotion);
        self
    }

    /// The piece a promoting pawn turns into.
    #[inline]
    pub fn promotion_piece(&self) -> Piece {
        self.promotion.unwrap_or_default().piece()
    }
}

impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.from.to_square(), self.to.to_square()) {
            (Some(from), Some(to)) => write!(f, "{}-{}", from, to),
            _ => write!(
                f,
                "({},{})-({},{})",
                self.from.row, self.from.col, self.to.row, self.to.col
            ),
        }
    }
}

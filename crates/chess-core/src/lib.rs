//! Core types for chess.
//!
//! This crate provides the vocabulary shared by the rules engine and the
//! session layer:
//! - [`Piece`] and [`Color`] for piece representation
//! - [`Square`] for on-board coordinates and [`Coord`] for raw, unchecked ones
//! - [`MoveRequest`] and [`Promotion`] for submitted moves
//! - FEN parsing for building positions

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenError, FenPosition};
pub use mov::{Coord, MoveRequest, Promotion};
pub use piece::Piece;
pub use square::Square;

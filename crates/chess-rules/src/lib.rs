//! Chess rules engine.
//!
//! Decides whether a requested move is legal, applies it with every side
//! effect (captures, en passant, castling, promotion, rights bookkeeping),
//! and detects check, checkmate and stalemate.
//!
//! Legality is layered. [`pseudo_legal`] and [`attacks`] know only piece
//! geometry; [`is_king_in_check`] builds on them; [`validate`] adds king
//! safety and castling on top. Nothing lower down calls back up.
//!
//! The engine is synchronous, performs no I/O and never mutates a state in
//! place except through [`apply_move`].

mod board;
mod check;
mod error;
mod execute;
pub mod geometry;
mod perft;
mod scan;
mod snapshot;
mod state;
mod validate;

pub use board::{Board, Occupant, SpecialMove, KING_HOME_COL};
pub use check::{is_king_in_check, is_square_attacked};
pub use error::{InvariantViolation, Rejection, RuleError};
pub use execute::{apply_move, MoveOutcome};
pub use geometry::{attacks, pseudo_legal};
pub use perft::{perft, perft_divide};
pub use scan::{has_any_legal_move, legal_moves};
pub use snapshot::BoardSnapshot;
pub use state::{BoardState, CastleSide, CastlingRights, EnPassant, Outcome, PositionError};
pub use validate::{is_legal, validate, validate_for};

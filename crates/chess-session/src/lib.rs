//! Two-player session around the chess rules engine.
//!
//! A [`GameSession`] seats two players, serializes their move submissions
//! against one [`BoardState`](chess_rules::BoardState) and broadcasts the
//! resulting [`ServerMessage`]s. Transport (sockets, framing, reconnects) is
//! left to the caller; messages travel as JSON via [`message::encode`] and
//! [`message::decode`].

pub mod config;
mod error;
pub mod message;
mod session;
pub mod telemetry;

pub use config::SessionConfig;
pub use error::{ConfigError, SessionError};
pub use message::{ClientMessage, ServerMessage};
pub use session::{GameSession, Seat, SessionHandle, Submission};

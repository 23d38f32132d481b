//! Error types for chess-session.

use chess_rules::{InvariantViolation, PositionError, Rejection};
use thiserror::Error;

/// Errors that can occur while running a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("both seats are taken")]
    SessionFull,
    #[error("it is not your turn")]
    NotYourTurn,
    #[error("move rejected: {0}")]
    Rejected(#[from] Rejection),
    /// The board broke an invariant. The session accepts no further moves.
    #[error("session state is corrupt: {0}")]
    Corrupt(#[from] InvariantViolation),
    #[error("malformed message: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("session command queue is closed")]
    QueueClosed,
}

impl SessionError {
    /// The reason to report back to the player who submitted a move, if this
    /// error is an ordinary refusal rather than a session failure.
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            SessionError::Rejected(reason) => Some(*reason),
            SessionError::NotYourTurn => Some(Rejection::WrongTurn),
            _ => None,
        }
    }
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid start position: {0}")]
    StartPosition(#[from] PositionError),
    #[error("{0} must be greater than zero")]
    ZeroCapacity(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Color;

    #[test]
    fn rejection_for_reply() {
        assert_eq!(
            SessionError::from(Rejection::IllegalGeometry).rejection(),
            Some(Rejection::IllegalGeometry)
        );
        assert_eq!(
            SessionError::NotYourTurn.rejection(),
            Some(Rejection::WrongTurn)
        );
        assert_eq!(SessionError::SessionFull.rejection(), None);
        assert_eq!(
            SessionError::from(InvariantViolation::MissingKing(Color::White)).rejection(),
            None
        );
    }

    #[test]
    fn display() {
        assert_eq!(
            SessionError::Corrupt(InvariantViolation::ExtraKing(Color::Black)).to_string(),
            "session state is corrupt: Black has more than one king on the board"
        );
        assert_eq!(
            ConfigError::ZeroCapacity("event_capacity").to_string(),
            "event_capacity must be greater than zero"
        );
    }
}

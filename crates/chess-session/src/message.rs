//! JSON messages exchanged between a session and its players.
//!
//! Every message is an object tagged by a `"type"` field, e.g.
//! `{"type":"move","from":{"row":1,"col":4},"to":{"row":3,"col":4}}`.

use crate::SessionError;
use chess_core::{Color, MoveRequest};
use chess_rules::{BoardSnapshot, Outcome, Rejection};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Messages a player sends to the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Move(MoveRequest),
    Chat { text: String },
}

/// Messages the session sends to players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// First message a seat receives: the color it plays.
    PlayerAssigned { color: Color },
    BoardUpdate { board: BoardSnapshot },
    /// `color` has just been put in check.
    Check { color: Color },
    GameOver {
        outcome: Outcome,
        winner: Option<Color>,
    },
    Chat { from: Color, text: String },
    /// Sent only to the player whose move was refused.
    Rejected { reason: Rejection },
}

impl ServerMessage {
    pub fn game_over(outcome: Outcome) -> Self {
        ServerMessage::GameOver {
            outcome,
            winner: outcome.winner(),
        }
    }
}

/// Encodes a message as a single line of JSON.
pub fn encode<T: Serialize>(message: &T) -> Result<String, SessionError> {
    Ok(serde_json::to_string(message)?)
}

/// Decodes a message from JSON text.
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T, SessionError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{Coord, Promotion};
    use chess_rules::BoardState;

    #[test]
    fn decode_move() {
        let message: ClientMessage =
            decode(r#"{"type":"move","from":{"row":1,"col":4},"to":{"row":3,"col":4}}"#).unwrap();
        assert_eq!(
            message,
            ClientMessage::Move(MoveRequest::new(Coord::new(1, 4), Coord::new(3, 4)))
        );
    }

    #[test]
    fn decode_move_with_promotion() {
        let message: ClientMessage = decode(
            r#"{"type":"move","from":{"row":6,"col":0},"to":{"row":7,"col":0},"promotion":"knight"}"#,
        )
        .unwrap();
        let ClientMessage::Move(request) = message else {
            panic!("expected a move");
        };
        assert_eq!(request.promotion, Some(Promotion::Knight));
    }

    #[test]
    fn decode_chat_and_garbage() {
        let message: ClientMessage = decode(r#"{"type":"chat","text":"good luck"}"#).unwrap();
        assert_eq!(
            message,
            ClientMessage::Chat {
                text: "good luck".to_string()
            }
        );
        assert!(matches!(
            decode::<ClientMessage>(r#"{"type":"resign"}"#),
            Err(SessionError::Codec(_))
        ));
        assert!(decode::<ClientMessage>("not json").is_err());
    }

    #[test]
    fn encode_server_messages() {
        let json = encode(&ServerMessage::PlayerAssigned {
            color: Color::Black,
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"player_assigned","color":"black"}"#);

        let json = encode(&ServerMessage::game_over(Outcome::Checkmate {
            winner: Color::White,
        }))
        .unwrap();
        assert_eq!(
            json,
            r#"{"type":"game_over","outcome":{"kind":"checkmate","winner":"white"},"winner":"white"}"#
        );

        let json = encode(&ServerMessage::Rejected {
            reason: Rejection::KingLeftInCheck,
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"rejected","reason":"king_left_in_check"}"#);
    }

    #[test]
    fn board_update_survives_the_wire() {
        let message = ServerMessage::BoardUpdate {
            board: BoardState::new().snapshot(),
        };
        let decoded: ServerMessage = decode(&encode(&message).unwrap()).unwrap();
        assert_eq!(decoded, message);
    }
}

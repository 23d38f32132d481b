//! Game session management.
//!
//! A [`GameSession`] owns the one [`BoardState`] of a game. Every submission
//! runs "check seat, validate, apply, publish" under a single lock, so moves
//! are applied in one total order and no observer sees a half-applied move.

use crate::config::SessionConfig;
use crate::error::{ConfigError, SessionError};
use crate::message::{ClientMessage, ServerMessage};
use chess_core::{Color, MoveRequest};
use chess_rules::{apply_move, BoardSnapshot, BoardState, InvariantViolation, MoveOutcome, RuleError};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot, Mutex};

struct Inner {
    state: BoardState,
    seats: usize,
    corrupt: Option<InvariantViolation>,
}

/// A two-player game.
pub struct GameSession {
    inner: Mutex<Inner>,
    events: broadcast::Sender<ServerMessage>,
}

/// A player's place in a session.
pub struct Seat {
    pub color: Color,
    /// Messages to deliver first: the seat assignment and the current board.
    pub welcome: Vec<ServerMessage>,
    /// Everything broadcast after the seat was taken.
    pub events: broadcast::Receiver<ServerMessage>,
}

impl GameSession {
    /// Creates a session at the standard starting position.
    pub fn new(event_capacity: usize) -> Result<Self, ConfigError> {
        Self::with_state(BoardState::new(), event_capacity)
    }

    /// Creates a session starting from `state`.
    pub fn with_state(state: BoardState, event_capacity: usize) -> Result<Self, ConfigError> {
        if event_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("event_capacity"));
        }
        let (events, _) = broadcast::channel(event_capacity);
        Ok(GameSession {
            inner: Mutex::new(Inner {
                state,
                seats: 0,
                corrupt: None,
            }),
            events,
        })
    }

    pub fn from_config(config: &SessionConfig) -> Result<Self, ConfigError> {
        Self::with_state(config.initial_state()?, config.event_capacity)
    }

    /// Takes the next free seat: White first, then Black.
    pub async fn join(&self) -> Result<Seat, SessionError> {
        let mut inner = self.inner.lock().await;
        let color = match inner.seats {
            0 => Color::White,
            1 => Color::Black,
            _ => {
                tracing::warn!("Join refused, session is full");
                return Err(SessionError::SessionFull);
            }
        };
        inner.seats += 1;

        // Subscribed under the lock so no update falls between the welcome
        // board and the first event.
        let events = self.events.subscribe();
        let welcome = vec![
            ServerMessage::PlayerAssigned { color },
            ServerMessage::BoardUpdate {
                board: inner.state.snapshot(),
            },
        ];
        tracing::info!("Player assigned to {}", color);
        Ok(Seat {
            color,
            welcome,
            events,
        })
    }

    /// Applies a move for `player` and publishes the resulting events.
    pub async fn submit(
        &self,
        player: Color,
        request: MoveRequest,
    ) -> Result<MoveOutcome, SessionError> {
        let mut inner = self.inner.lock().await;
        if let Some(violation) = inner.corrupt {
            return Err(SessionError::Corrupt(violation));
        }
        if !inner.state.is_game_over() && inner.state.turn() != player {
            tracing::warn!(player = %player, request = %request, "Move submitted out of turn");
            return Err(SessionError::NotYourTurn);
        }

        let was_in_check = Color::BOTH.map(|color| inner.state.is_in_check(color));
        let outcome = match apply_move(&mut inner.state, &request) {
            Ok(outcome) => outcome,
            Err(RuleError::Rejected(reason)) => {
                tracing::warn!(player = %player, request = %request, reason = %reason, "Move rejected");
                return Err(SessionError::Rejected(reason));
            }
            Err(RuleError::Corrupt(violation)) => {
                tracing::error!("Board invariant violated after {}: {}", request, violation);
                inner.corrupt = Some(violation);
                return Err(SessionError::Corrupt(violation));
            }
        };

        self.publish(ServerMessage::BoardUpdate {
            board: inner.state.snapshot(),
        });
        for color in Color::BOTH {
            if inner.state.is_in_check(color) && !was_in_check[color.index()] {
                self.publish(ServerMessage::Check { color });
            }
        }
        if let Some(terminal) = outcome.terminal {
            tracing::info!(
                outcome = ?terminal,
                moves = inner.state.move_count(),
                "Game over"
            );
            self.publish(ServerMessage::game_over(terminal));
        }
        Ok(outcome)
    }

    /// Handles a decoded message from `player`.
    ///
    /// Returns the reply meant for `player` alone, if any. Only a corrupt
    /// session is an error; refused moves become a `rejected` reply.
    pub async fn handle_message(
        &self,
        player: Color,
        message: ClientMessage,
    ) -> Result<Option<ServerMessage>, SessionError> {
        match message {
            ClientMessage::Move(request) => match self.submit(player, request).await {
                Ok(_) => Ok(None),
                Err(err) => match err.rejection() {
                    Some(reason) => Ok(Some(ServerMessage::Rejected { reason })),
                    None => Err(err),
                },
            },
            ClientMessage::Chat { text } => {
                self.publish(ServerMessage::Chat { from: player, text });
                Ok(None)
            }
        }
    }

    /// Returns a snapshot of the current position.
    pub async fn snapshot(&self) -> BoardSnapshot {
        self.inner.lock().await.state.snapshot()
    }

    fn publish(&self, message: ServerMessage) {
        // No receivers is fine: nobody has joined yet or everyone left.
        self.events.send(message).ok();
    }

    /// Drains `commands` one submission at a time until every sender is gone.
    pub async fn serve(self: Arc<Self>, mut commands: mpsc::Receiver<Submission>) {
        while let Some(Submission {
            player,
            request,
            reply,
        }) = commands.recv().await
        {
            let result = self.submit(player, request).await;
            // The submitter may have stopped waiting.
            reply.send(result).ok();
        }
        tracing::debug!("Command queue closed");
    }

    /// Starts [`serve`](Self::serve) on a new task and returns a handle
    /// feeding it.
    pub fn spawn(self: Arc<Self>, command_capacity: usize) -> Result<SessionHandle, ConfigError> {
        if command_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("command_capacity"));
        }
        let (commands, queue) = mpsc::channel(command_capacity);
        tokio::spawn(self.serve(queue));
        Ok(SessionHandle { commands })
    }
}

/// A queued move submission.
pub struct Submission {
    pub player: Color,
    pub request: MoveRequest,
    pub reply: oneshot::Sender<Result<MoveOutcome, SessionError>>,
}

/// Sends submissions to a session's command queue.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Submission>,
}

impl SessionHandle {
    pub async fn submit(
        &self,
        player: Color,
        request: MoveRequest,
    ) -> Result<MoveOutcome, SessionError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Submission {
                player,
                request,
                reply,
            })
            .await
            .map_err(|_| SessionError::QueueClosed)?;
        response.await.map_err(|_| SessionError::QueueClosed)?
    }
}

//! Configuration loading for chess-session.

use crate::error::ConfigError;
use chess_rules::BoardState;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Position to start from, as FEN. The standard start when absent.
    #[serde(default)]
    pub start_fen: Option<String>,
    /// Events buffered per seat before a slow reader starts losing them.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
    /// Pending submissions in the command queue.
    #[serde(default = "default_command_capacity")]
    pub command_capacity: usize,
    /// `tracing_subscriber::EnvFilter` directives, overridden by `RUST_LOG`.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_event_capacity() -> usize {
    64
}

fn default_command_capacity() -> usize {
    100
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            start_fen: None,
            event_capacity: default_event_capacity(),
            command_capacity: default_command_capacity(),
            log_filter: default_log_filter(),
        }
    }
}

impl SessionConfig {
    /// Parses and checks a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = toml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    /// Reads the config file at `path`.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Looks for `chess.toml` in the current directory or its parents,
    /// falling back to defaults.
    pub async fn discover() -> Result<Self, ConfigError> {
        Self::discover_from(Path::new(".")).await
    }

    /// Like [`discover`](Self::discover), starting at `dir` and going up at
    /// most two levels.
    pub async fn discover_from(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        let paths = [
            dir.join("chess.toml"),
            dir.join("../chess.toml"),
            dir.join("../../chess.toml"),
        ];

        for path in paths {
            if tokio::fs::try_exists(&path).await? {
                return Self::load(path).await;
            }
        }

        tracing::info!("No chess.toml found, using defaults");
        Ok(Self::default())
    }

    /// Builds the position a new session starts from.
    pub fn initial_state(&self) -> Result<BoardState, ConfigError> {
        match &self.start_fen {
            Some(fen) => Ok(BoardState::from_fen(fen)?),
            None => Ok(BoardState::new()),
        }
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.event_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("event_capacity"));
        }
        if self.command_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("command_capacity"));
        }
        self.initial_state().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Color;

    #[test]
    fn empty_document_uses_defaults() {
        let config = SessionConfig::from_toml_str("").unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.event_capacity, 64);
        assert_eq!(config.command_capacity, 100);
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.initial_state().unwrap(), BoardState::new());
    }

    #[test]
    fn parses_all_fields() {
        let config = SessionConfig::from_toml_str(
            r#"
            start_fen = "4k3/8/8/8/8/8/8/4K2R b K - 0 12"
            event_capacity = 8
            command_capacity = 4
            log_filter = "chess_session=debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.event_capacity, 8);
        assert_eq!(config.command_capacity, 4);
        assert_eq!(config.log_filter, "chess_session=debug");
        let state = config.initial_state().unwrap();
        assert_eq!(state.turn(), Color::Black);
        assert_eq!(state.move_count(), 23);
    }

    #[test]
    fn invalid_start_fen_is_reported() {
        let err = SessionConfig::from_toml_str(r#"start_fen = "not a position""#).unwrap_err();
        assert!(matches!(err, ConfigError::StartPosition(_)));

        let err = SessionConfig::from_toml_str(r#"start_fen = "8/8/8/8/8/8/8/4K3 w - - 0 1""#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::StartPosition(_)));

        let err = SessionConfig::from_toml_str(
            r#"start_fen = "4k3/8/8/8/8/8/8/4K3 w - - 0 4294967295""#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::StartPosition(_)));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = SessionConfig::from_toml_str("event_capacity = 0").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroCapacity("event_capacity")));
    }

    #[test]
    fn malformed_toml() {
        let err = SessionConfig::from_toml_str("event_capacity = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[tokio::test]
    async fn load_from_file() {
        let path = std::env::temp_dir().join(format!("chess-session-{}.toml", std::process::id()));
        tokio::fs::write(&path, "command_capacity = 3\n").await.unwrap();
        let config = SessionConfig::load(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();
        assert_eq!(config.command_capacity, 3);
        assert_eq!(config.event_capacity, 64);
    }

    #[tokio::test]
    async fn discover_searches_parent_directories() {
        let root = std::env::temp_dir().join(format!("chess-discover-{}", std::process::id()));
        let nested = root.join("a").join("b");
        tokio::fs::remove_dir_all(&root).await.ok();
        tokio::fs::create_dir_all(&nested).await.unwrap();

        let config = SessionConfig::discover_from(&nested).await.unwrap();
        assert_eq!(config, SessionConfig::default());

        tokio::fs::write(root.join("chess.toml"), "event_capacity = 5\n")
            .await
            .unwrap();
        let config = SessionConfig::discover_from(&nested).await.unwrap();
        assert_eq!(config.event_capacity, 5);

        tokio::fs::write(nested.join("chess.toml"), "event_capacity = 0\n")
            .await
            .unwrap();
        let err = SessionConfig::discover_from(&nested).await.unwrap_err();
        assert!(matches!(err, ConfigError::ZeroCapacity("event_capacity")));

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn load_missing_file() {
        let err = SessionConfig::load("/nonexistent/chess.toml").await.unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}

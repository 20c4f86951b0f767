use pokerbot_engine::errors::GameError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Ready check failed for {player}: {reason}")]
    HandshakeFailed { player: String, reason: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Game error: {0}")]
    Game(#[from] GameError),
}

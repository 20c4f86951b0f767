use thiserror::Error;

use crate::actions::PlayerAction;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum GameError {
    #[error("Invalid card token: {0:?}")]
    InvalidCard(String),
    #[error("Deck exhausted")]
    DeckExhausted,
    #[error("Unknown action tag: {0}")]
    UnknownAction(i32),
    #[error("Invalid amount {amount} for {action}")]
    InvalidAmount { action: &'static str, amount: i32 },
    #[error("Illegal action {0}")]
    IllegalAction(PlayerAction),
    #[error("Raise to {amount} outside bounds [{min}, {max}]")]
    RaiseOutOfBounds { amount: u32, min: u32, max: u32 },
    #[error("Round already complete")]
    RoundAlreadyComplete,
    #[error("Invalid table rules: {0}")]
    InvalidRules(String),
}

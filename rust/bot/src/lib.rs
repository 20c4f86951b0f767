//! # pokerbot-bot: bot endpoint runtime
//!
//! Hosts a [`pokerbot_ai::Strategy`] behind the bot session protocol.
//! [`BotRunner`] implements [`pokerbot_protocol::BotService`]; [`serve`]
//! puts it on the network.

use pokerbot_ai::{create_strategy, StrategyError};
use pokerbot_engine::errors::GameError;
use pokerbot_protocol::{BotServer, ServerConfig, ServerError, ServerHandle};
use thiserror::Error;

pub mod config;
pub mod runner;

pub use config::BotConfig;
pub use runner::{BotRunner, Phase};

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Rules(#[from] GameError),
    #[error(transparent)]
    Strategy(#[from] StrategyError),
    #[error(transparent)]
    Server(#[from] ServerError),
}

/// Validates `config` and starts serving on its address.
pub async fn serve(config: &BotConfig) -> Result<ServerHandle, BotError> {
    config.validate()?;
    let strategy = create_strategy(&config.strategy)?;
    let runner = BotRunner::new(strategy, config.rules);
    let server = BotServer::new(ServerConfig::new(config.host.clone(), config.port), runner);
    Ok(server.start().await?)
}

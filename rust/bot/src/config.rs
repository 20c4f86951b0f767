use pokerbot_ai::STRATEGIES;
use pokerbot_engine::rules::TableRules;
use pokerbot_protocol::DEFAULT_BOT_PORT;

use crate::BotError;

/// Everything a bot endpoint needs at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    pub host: String,
    pub port: u16,
    pub strategy: String,
    pub rules: TableRules,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_BOT_PORT,
            strategy: "baseline".to_string(),
            rules: TableRules::default(),
        }
    }
}

impl BotConfig {
    pub fn validate(&self) -> Result<(), BotError> {
        if self.host.trim().is_empty() {
            return Err(BotError::Config("host must not be empty".into()));
        }
        if !STRATEGIES.contains(&self.strategy.as_str()) {
            return Err(BotError::Config(format!(
                "unknown strategy `{}` (expected one of: {})",
                self.strategy,
                STRATEGIES.join(", ")
            )));
        }
        self.rules.validate()?;
        Ok(())
    }
}

//! Match configuration: defaults, then an optional TOML file, then the
//! environment. Command-line flags are applied by the binary on top.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use pokerbot_engine::actions::AmountPolicy;
use pokerbot_engine::rules::TableRules;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub name: String,
    /// `host:port` of the bot endpoint.
    pub address: String,
}

impl PlayerConfig {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub match_id: Option<String>,
    pub players: [PlayerConfig; 2],
    pub rounds: u32,
    pub rules: TableRules,
    pub seed: Option<u64>,
    /// Seconds of decision time each player gets for the whole match.
    pub starting_game_clock: f64,
    pub connect_timeout: f64,
    pub connect_retries: u32,
    pub ready_check_timeout: f64,
    pub action_timeout: f64,
    pub end_round_timeout: f64,
    /// Bytes of bot log kept per player.
    pub player_log_size_limit: usize,
    pub log_dir: PathBuf,
    pub amount_policy: AmountPolicy,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            match_id: None,
            players: [
                PlayerConfig::new("all-in-bot", "localhost:50051"),
                PlayerConfig::new("prob-bot", "localhost:50052"),
            ],
            rounds: 1000,
            rules: TableRules::default(),
            seed: None,
            starting_game_clock: 300.0,
            connect_timeout: 4.0,
            connect_retries: 5,
            ready_check_timeout: 10.0,
            action_timeout: 2.0,
            end_round_timeout: 2.0,
            player_log_size_limit: 1_000_000,
            log_dir: PathBuf::from("logs"),
            amount_policy: AmountPolicy::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FilePlayer {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    match_id: Option<String>,
    #[serde(default)]
    player_1: Option<FilePlayer>,
    #[serde(default)]
    player_2: Option<FilePlayer>,
    #[serde(default)]
    rounds: Option<u32>,
    #[serde(default)]
    rules: Option<TableRules>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    starting_game_clock: Option<f64>,
    #[serde(default)]
    connect_timeout: Option<f64>,
    #[serde(default)]
    connect_retries: Option<u32>,
    #[serde(default)]
    ready_check_timeout: Option<f64>,
    #[serde(default)]
    action_timeout: Option<f64>,
    #[serde(default)]
    end_round_timeout: Option<f64>,
    #[serde(default)]
    player_log_size_limit: Option<usize>,
    #[serde(default)]
    log_dir: Option<PathBuf>,
    #[serde(default)]
    amount_policy: Option<AmountPolicy>,
}

impl MatchConfig {
    /// Loads from the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Layers defaults, the TOML file (`path`, else `POKERBOT_CONFIG`) and the
    /// variables served by `lookup`, then validates.
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = MatchConfig::default();
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let file = path
            .map(Path::to_path_buf)
            .or_else(|| var("POKERBOT_CONFIG").map(PathBuf::from));
        if let Some(file) = file {
            let raw = fs::read_to_string(file)?;
            cfg.apply_file(toml::from_str(&raw)?);
        }

        if let Some(v) = var("PLAYER_1_NAME") {
            cfg.players[0].name = v;
        }
        if let Some(v) = var("PLAYER_2_NAME") {
            cfg.players[1].name = v;
        }
        if let Some(v) = var("PLAYER_1_DNS") {
            cfg.players[0].address = v;
        }
        if let Some(v) = var("PLAYER_2_DNS") {
            cfg.players[1].address = v;
        }
        if let Some(v) = var("MATCH_ID") {
            cfg.match_id = Some(v);
        }
        if let Some(v) = var("POKERBOT_SEED") {
            cfg.seed = Some(
                v.parse()
                    .map_err(|_| ConfigError::Invalid(format!("POKERBOT_SEED `{v}`")))?,
            );
        }
        if let Some(v) = var("POKERBOT_ROUNDS") {
            cfg.rounds = v
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("POKERBOT_ROUNDS `{v}`")))?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    fn apply_file(&mut self, f: FileConfig) {
        for (slot, player) in self.players.iter_mut().zip([f.player_1, f.player_2]) {
            if let Some(p) = player {
                if let Some(name) = p.name {
                    slot.name = name;
                }
                if let Some(address) = p.address {
                    slot.address = address;
                }
            }
        }
        if f.match_id.is_some() {
            self.match_id = f.match_id;
        }
        if let Some(v) = f.rounds {
            self.rounds = v;
        }
        if let Some(v) = f.rules {
            self.rules = v;
        }
        if f.seed.is_some() {
            self.seed = f.seed;
        }
        if let Some(v) = f.starting_game_clock {
            self.starting_game_clock = v;
        }
        if let Some(v) = f.connect_timeout {
            self.connect_timeout = v;
        }
        if let Some(v) = f.connect_retries {
            self.connect_retries = v;
        }
        if let Some(v) = f.ready_check_timeout {
            self.ready_check_timeout = v;
        }
        if let Some(v) = f.action_timeout {
            self.action_timeout = v;
        }
        if let Some(v) = f.end_round_timeout {
            self.end_round_timeout = v;
        }
        if let Some(v) = f.player_log_size_limit {
            self.player_log_size_limit = v;
        }
        if let Some(v) = f.log_dir {
            self.log_dir = v;
        }
        if let Some(v) = f.amount_policy {
            self.amount_policy = v;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, p) in self.players.iter().enumerate() {
            if p.name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("player {} has no name", i + 1)));
            }
            if p.address.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "player {} has no address",
                    i + 1
                )));
            }
        }
        if self.players[0].name == self.players[1].name {
            return Err(ConfigError::Invalid(format!(
                "players share the name `{}`",
                self.players[0].name
            )));
        }
        if self.rounds == 0 {
            return Err(ConfigError::Invalid("rounds must be >= 1".into()));
        }
        if self.connect_retries == 0 {
            return Err(ConfigError::Invalid("connect_retries must be >= 1".into()));
        }
        self.rules
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        for (name, secs) in [
            ("starting_game_clock", self.starting_game_clock),
            ("connect_timeout", self.connect_timeout),
            ("ready_check_timeout", self.ready_check_timeout),
            ("action_timeout", self.action_timeout),
            ("end_round_timeout", self.end_round_timeout),
        ] {
            if secs <= 0.0 || Duration::try_from_secs_f64(secs).is_err() {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a positive, representable number of seconds"
                )));
            }
        }
        if self.player_log_size_limit == 0 {
            return Err(ConfigError::Invalid(
                "player_log_size_limit must be > 0".into(),
            ));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        seconds(self.connect_timeout)
    }

    pub fn ready_check_timeout(&self) -> Duration {
        seconds(self.ready_check_timeout)
    }

    pub fn action_timeout(&self) -> Duration {
        seconds(self.action_timeout)
    }

    pub fn end_round_timeout(&self) -> Duration {
        seconds(self.end_round_timeout)
    }

    pub fn player_names(&self) -> Vec<String> {
        self.players.iter().map(|p| p.name.clone()).collect()
    }
}

/// Saturates instead of panicking on values `validate` would refuse.
fn seconds(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or(Duration::MAX)
}

//! # pokerbot-match: match engine
//!
//! Drives a heads-up match between two bot endpoints over the bot session
//! protocol: ready-checks both bots, deals every round from a seeded deck,
//! asks the acting seat for each move, settles the round and tells both
//! players how it ended.
//!
//! A bot that times out, disconnects or answers with an illegal move never
//! stops the match; its turn is replaced by a legal one and the substitution
//! is recorded in the round log.

pub mod config;
pub mod errors;
pub mod runner;
pub mod seat;

pub use config::{ConfigError, MatchConfig, PlayerConfig};
pub use errors::MatchError;
pub use runner::{seat_order, MatchRunner, MatchSummary, PlayerSummary};
pub use seat::{PlayerLog, Seat, LOG_LIMIT_MARKER};

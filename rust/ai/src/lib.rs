//! # pokerbot-ai: decision strategies for bot endpoints
//!
//! A [`Strategy`] sees one [`Observation`] per decision and one
//! [`RoundSummary`] per finished round. The bot runtime owns legality: a
//! strategy may return anything, and the runtime corrects illegal choices.
//!
//! ```rust
//! use pokerbot_ai::create_strategy;
//!
//! let strategy = create_strategy("baseline").expect("known strategy");
//! assert_eq!(strategy.name(), "baseline");
//! assert!(create_strategy("nope").is_err());
//! ```

use pokerbot_engine::actions::{LegalActions, PlayerAction};
use pokerbot_engine::cards::{Card, DeckVariant};
use pokerbot_engine::rules::{RoundState, Street};
use thiserror::Error;

pub mod baseline;
pub mod simple;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StrategyError {
    #[error("Unknown strategy: {0}")]
    Unknown(String),
    #[error("Strategy initialization failed: {0}")]
    Init(String),
    #[error("Strategy could not decide: {0}")]
    Decision(String),
}

/// What the acting bot knows at a decision point.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub round: u32,
    pub street: Street,
    pub legal: LegalActions,
    pub my_cards: Vec<Card>,
    pub board: Vec<Card>,
    pub my_pip: u32,
    pub opp_pip: u32,
    pub my_stack: u32,
    pub opp_stack: u32,
    pub continue_cost: u32,
    pub pot: u32,
    /// Inclusive "raise to" bounds; meaningful only when `legal.raise`.
    pub min_raise: u32,
    pub max_raise: u32,
    pub bankroll: i64,
    pub game_clock: f32,
    pub deck: DeckVariant,
}

impl Observation {
    /// Builds the view of the seat that is to act in `state`.
    pub fn from_state(
        state: &RoundState,
        my_cards: Vec<Card>,
        board: Vec<Card>,
        bankroll: i64,
        game_clock: f32,
        round: u32,
    ) -> Self {
        let me = state.active();
        let pips = state.pips();
        let stacks = state.stacks();
        let (min_raise, max_raise) = state.raise_bounds();
        Self {
            round,
            street: state.street(),
            legal: state.legal_actions(),
            my_cards,
            board,
            my_pip: pips[me],
            opp_pip: pips[1 - me],
            my_stack: stacks[me],
            opp_stack: stacks[1 - me],
            continue_cost: state.continue_cost(),
            pot: state.pot(),
            min_raise,
            max_raise,
            bankroll,
            game_clock,
            deck: state.rules().deck,
        }
    }

    /// Check when free, otherwise fold.
    pub fn passive(&self) -> PlayerAction {
        if self.legal.check {
            PlayerAction::Check
        } else {
            PlayerAction::Fold
        }
    }
}

/// What a bot learns when a round ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSummary {
    pub round: u32,
    pub my_cards: Vec<Card>,
    /// Empty unless the round went to showdown.
    pub opponent_cards: Vec<Card>,
    pub board: Vec<Card>,
    pub history: Vec<PlayerAction>,
    pub delta: i32,
    pub bankroll: i64,
    pub is_match_over: bool,
}

pub trait Strategy: Send {
    fn name(&self) -> &str;

    /// Called once per match from the ready check.
    fn prepare(&mut self, _players: &[String]) -> Result<(), StrategyError> {
        Ok(())
    }

    fn decide(&mut self, observation: &Observation) -> Result<PlayerAction, StrategyError>;

    /// Returns log lines to hand back to the match engine.
    fn round_over(&mut self, _summary: &RoundSummary) -> Vec<String> {
        Vec::new()
    }
}

/// Names accepted by [`create_strategy`].
pub const STRATEGIES: [&str; 4] = ["baseline", "all-in", "check-call", "random"];

pub fn create_strategy(name: &str) -> Result<Box<dyn Strategy>, StrategyError> {
    match name {
        "baseline" => Ok(Box::new(baseline::BaselineStrategy::new())),
        "all-in" => Ok(Box::new(simple::AllIn)),
        "check-call" => Ok(Box::new(simple::CheckCall)),
        "random" => Ok(Box::new(simple::RandomStrategy::with_seed(rand::random()))),
        other => Err(StrategyError::Unknown(other.to_string())),
    }
}

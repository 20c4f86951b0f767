//! # pokerbot-engine: heads-up table rules
//!
//! Everything both ends of a bot session need to agree on: card tokens,
//! the seeded deck, hand ranking and the no-limit betting state machine.
//!
//! - [`cards`] - card tokens (`As`, `Td`, ...) and the short/standard decks
//! - [`deck`] - ChaCha20-seeded shuffling and round deals
//! - [`hand`] - best-five-card ranking and showdown comparison
//! - [`actions`] - actions, legal action sets and wire conversion
//! - [`rules`] - blinds, streets, raise bounds and action substitution
//! - [`logger`] - JSONL round records
//! - [`errors`] - [`GameError`]
//!
//! ```rust
//! use pokerbot_engine::actions::PlayerAction;
//! use pokerbot_engine::rules::{RoundState, TableRules};
//!
//! let state = RoundState::new(TableRules::default());
//! assert_eq!(state.raise_bounds(), (4, 400));
//! assert!(state.validate(PlayerAction::Raise(200)).is_ok());
//! ```

pub mod actions;
pub mod cards;
pub mod deck;
pub mod errors;
pub mod hand;
pub mod logger;
pub mod rules;

pub use actions::{AmountPolicy, LegalActions, PlayerAction};
pub use cards::DeckVariant;
pub use errors::GameError;
pub use rules::{Progress, RoundState, Street, TableRules};

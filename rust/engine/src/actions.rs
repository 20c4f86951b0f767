use std::fmt;

use pokerbot_protocol::{Action, ActionType};
use serde::{Deserialize, Serialize};

use crate::errors::GameError;

/// A move as the rules see it. `Raise` carries the total the raiser will
/// have committed on the current street ("raise to").
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PlayerAction {
    Fold,
    Call,
    Check,
    Raise(u32),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Fold,
    Call,
    Check,
    Raise,
}

/// What to do with a non-zero `amount` on FOLD, CALL or CHECK.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountPolicy {
    /// Drop the amount and accept the action.
    #[default]
    Ignore,
    /// Treat the action as malformed.
    Reject,
}

impl PlayerAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            PlayerAction::Fold => ActionKind::Fold,
            PlayerAction::Call => ActionKind::Call,
            PlayerAction::Check => ActionKind::Check,
            PlayerAction::Raise(_) => ActionKind::Raise,
        }
    }

    /// Decodes a wire action.
    ///
    /// # Errors
    ///
    /// - [`GameError::UnknownAction`] for an action tag this version does not know
    /// - [`GameError::InvalidAmount`] for a negative raise, or a non-zero amount
    ///   on a non-raise under [`AmountPolicy::Reject`]
    pub fn from_wire(action: &Action, policy: AmountPolicy) -> Result<Self, GameError> {
        let kind = action
            .kind()
            .ok_or(GameError::UnknownAction(action.action))?;
        let amount = action.amount;
        if kind != ActionType::Raise && amount != 0 && policy == AmountPolicy::Reject {
            return Err(GameError::InvalidAmount {
                action: kind.as_str_name(),
                amount,
            });
        }
        Ok(match kind {
            ActionType::Fold => PlayerAction::Fold,
            ActionType::Call => PlayerAction::Call,
            ActionType::Check => PlayerAction::Check,
            ActionType::Raise => {
                let to = u32::try_from(amount).map_err(|_| GameError::InvalidAmount {
                    action: "RAISE",
                    amount,
                })?;
                PlayerAction::Raise(to)
            }
        })
    }

    pub fn to_wire(&self) -> Action {
        match *self {
            PlayerAction::Fold => Action::fold(),
            PlayerAction::Call => Action::call(),
            PlayerAction::Check => Action::check(),
            PlayerAction::Raise(to) => Action::raise(i32::try_from(to).unwrap_or(i32::MAX)),
        }
    }
}

/// Decodes a wire history, failing on the first malformed entry.
pub fn decode_history(actions: &[Action], policy: AmountPolicy) -> Result<Vec<PlayerAction>, GameError> {
    actions
        .iter()
        .map(|a| PlayerAction::from_wire(a, policy))
        .collect()
}

pub fn encode_history(actions: &[PlayerAction]) -> Vec<Action> {
    actions.iter().map(PlayerAction::to_wire).collect()
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerAction::Fold => f.write_str("FOLD"),
            PlayerAction::Call => f.write_str("CALL"),
            PlayerAction::Check => f.write_str("CHECK"),
            PlayerAction::Raise(to) => write!(f, "RAISE {to}"),
        }
    }
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Fold => "FOLD",
            ActionKind::Call => "CALL",
            ActionKind::Check => "CHECK",
            ActionKind::Raise => "RAISE",
        }
    }
}

/// The set of moves open to the acting seat.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Serialize, Deserialize)]
pub struct LegalActions {
    pub fold: bool,
    pub call: bool,
    pub check: bool,
    pub raise: bool,
}

impl LegalActions {
    pub fn contains(&self, kind: ActionKind) -> bool {
        match kind {
            ActionKind::Fold => self.fold,
            ActionKind::Call => self.call,
            ActionKind::Check => self.check,
            ActionKind::Raise => self.raise,
        }
    }

    pub fn kinds(&self) -> Vec<ActionKind> {
        [
            ActionKind::Fold,
            ActionKind::Call,
            ActionKind::Check,
            ActionKind::Raise,
        ]
        .into_iter()
        .filter(|k| self.contains(*k))
        .collect()
    }
}

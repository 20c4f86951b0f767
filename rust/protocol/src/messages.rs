//! Wire types for the bot session protocol.
//!
//! These mirror `protos/pokerbot.proto` field for field. Tags are part of the
//! wire contract: never renumber, only add.

use std::fmt;

/// The four moves a seat can make.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ActionType {
    Fold = 0,
    Call = 1,
    Check = 2,
    Raise = 3,
}

impl ActionType {
    pub fn as_str_name(&self) -> &'static str {
        match self {
            ActionType::Fold => "FOLD",
            ActionType::Call => "CALL",
            ActionType::Check => "CHECK",
            ActionType::Raise => "RAISE",
        }
    }
}

/// A single move. `amount` is only meaningful for [`ActionType::Raise`], where
/// it is the total committed on the current street.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Action {
    #[prost(enumeration = "ActionType", tag = "1")]
    pub action: i32,
    #[prost(int32, tag = "2")]
    pub amount: i32,
}

impl Action {
    pub fn new(kind: ActionType, amount: i32) -> Self {
        Self {
            action: kind as i32,
            amount,
        }
    }

    pub fn fold() -> Self {
        Self::new(ActionType::Fold, 0)
    }

    pub fn call() -> Self {
        Self::new(ActionType::Call, 0)
    }

    pub fn check() -> Self {
        Self::new(ActionType::Check, 0)
    }

    pub fn raise(amount: i32) -> Self {
        Self::new(ActionType::Raise, amount)
    }

    /// The decoded action tag, or `None` when the peer sent a value this
    /// version does not know.
    pub fn kind(&self) -> Option<ActionType> {
        ActionType::try_from(self.action).ok()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            Some(ActionType::Raise) => write!(f, "RAISE {}", self.amount),
            Some(kind) => f.write_str(kind.as_str_name()),
            None => write!(f, "UNKNOWN({})", self.action),
        }
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ActionRequest {
    /// Seconds left on the seat's game clock.
    #[prost(float, tag = "1")]
    pub game_clock: f32,
    #[prost(string, repeated, tag = "2")]
    pub player_hand: Vec<String>,
    #[prost(string, repeated, tag = "3")]
    pub board_cards: Vec<String>,
    /// Every action applied so far this round, oldest first.
    #[prost(message, repeated, tag = "4")]
    pub new_actions: Vec<Action>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ActionResponse {
    #[prost(message, optional, tag = "1")]
    pub action: Option<Action>,
}

impl ActionResponse {
    pub fn new(action: Action) -> Self {
        Self {
            action: Some(action),
        }
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReadyCheckRequest {
    #[prost(string, repeated, tag = "1")]
    pub player_names: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReadyCheckResponse {
    #[prost(bool, tag = "1")]
    pub ready: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EndRoundMessage {
    #[prost(string, repeated, tag = "1")]
    pub player_hand: Vec<String>,
    /// Empty unless the round reached showdown.
    #[prost(string, repeated, tag = "2")]
    pub opponent_hand: Vec<String>,
    #[prost(string, repeated, tag = "3")]
    pub board_cards: Vec<String>,
    #[prost(message, repeated, tag = "4")]
    pub new_actions: Vec<Action>,
    /// Chips won (positive) or lost (negative) by the recipient.
    #[prost(int32, tag = "5")]
    pub delta: i32,
    #[prost(bool, tag = "6")]
    pub is_match_over: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EndRoundResponse {
    #[prost(string, repeated, tag = "1")]
    pub logs: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CallError {
    #[prost(string, tag = "1")]
    pub message: String,
}

/// Request envelope carried by the framed transport.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BotRequest {
    #[prost(uint64, tag = "1")]
    pub call_id: u64,
    #[prost(oneof = "bot_request::Call", tags = "2, 3, 4")]
    pub call: Option<bot_request::Call>,
}

pub mod bot_request {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Call {
        #[prost(message, tag = "2")]
        ReadyCheck(super::ReadyCheckRequest),
        #[prost(message, tag = "3")]
        RequestAction(super::ActionRequest),
        #[prost(message, tag = "4")]
        EndRound(super::EndRoundMessage),
    }

    impl Call {
        pub fn method(&self) -> &'static str {
            match self {
                Call::ReadyCheck(_) => "ReadyCheck",
                Call::RequestAction(_) => "RequestAction",
                Call::EndRound(_) => "EndRound",
            }
        }
    }
}

/// Response envelope carried by the framed transport.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BotResponse {
    #[prost(uint64, tag = "1")]
    pub call_id: u64,
    #[prost(oneof = "bot_response::Reply", tags = "2, 3, 4, 5")]
    pub reply: Option<bot_response::Reply>,
}

pub mod bot_response {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Reply {
        #[prost(message, tag = "2")]
        ReadyCheck(super::ReadyCheckResponse),
        #[prost(message, tag = "3")]
        Action(super::ActionResponse),
        #[prost(message, tag = "4")]
        EndRound(super::EndRoundResponse),
        #[prost(message, tag = "5")]
        Error(super::CallError),
    }
}

//! # pokerbot-protocol: Bot Session Protocol
//!
//! Wire contract between a match engine and the bot endpoints seated in a
//! heads-up poker match. Three synchronous calls make up the protocol:
//!
//! - `ReadyCheck` once before the first deal
//! - `RequestAction` at every decision point of the acting seat
//! - `EndRound` once per seat when a round is settled
//!
//! The transport contract is the framed envelope, not an RPC framework: each
//! call is a `BotRequest` sent over TCP as a 4-byte big-endian length plus
//! the protobuf body, answered by a `BotResponse` with the same `call_id`
//! (see `protos/pokerbot.proto` and [`wire`]). Bots written in other
//! languages only need a protobuf library and a socket.
//!
//! ## Modules
//!
//! - [`messages`] - protobuf message types (see `protos/pokerbot.proto`)
//! - [`wire`] - length-prefixed framing over any async stream
//! - [`service`] - the [`BotService`] trait implemented by bots
//! - [`server`] - TCP server hosting a [`BotService`]
//! - [`client`] - engine-side stub with per-call timeouts
//! - [`logging`] - tracing setup shared by the binaries
//!
//! ## Example
//!
//! ```no_run
//! use std::time::Duration;
//! use pokerbot_protocol::client::{BotClient, ConnectOptions};
//!
//! # async fn demo() -> Result<(), pokerbot_protocol::ProtocolError> {
//! let mut client = BotClient::new("localhost:50051", ConnectOptions::default());
//! client.connect().await?;
//! let ready = client
//!     .ready_check(vec!["bot1".into(), "bot2".into()], Duration::from_secs(5))
//!     .await?;
//! assert!(ready);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod errors;
pub mod logging;
pub mod messages;
pub mod server;
pub mod service;
pub mod wire;

pub use client::{BotClient, ConnectOptions};
pub use errors::{ProtocolError, ServiceError};
pub use messages::{
    Action, ActionRequest, ActionResponse, ActionType, EndRoundMessage, EndRoundResponse,
    ReadyCheckRequest, ReadyCheckResponse,
};
pub use server::{BotServer, ServerConfig, ServerError, ServerHandle, DEFAULT_BOT_PORT};
pub use service::{dispatch, BotService};

use std::time::Duration;
use thiserror::Error;

/// Failures on the engine side of a call.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode frame: {0}")]
    Decode(#[from] prost::DecodeError),
    #[error("frame of {len} bytes exceeds limit of {limit} bytes")]
    FrameTooLarge { len: usize, limit: usize },
    #[error("call timed out after {0:?}")]
    Timeout(Duration),
    #[error("connection closed by peer")]
    ConnectionClosed,
    #[error("not connected to {0}")]
    NotConnected(String),
    #[error("failed to connect to {addr} after {attempts} attempts")]
    ConnectFailed { addr: String, attempts: u32 },
    #[error("unexpected reply to {method} (call {call_id})")]
    UnexpectedReply { method: &'static str, call_id: u64 },
    #[error("bot refused call: {0}")]
    Remote(String),
}

impl ProtocolError {
    /// Transport-level failures are handled like a decision timeout.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ProtocolError::Io(_)
                | ProtocolError::Timeout(_)
                | ProtocolError::ConnectionClosed
                | ProtocolError::NotConnected(_)
                | ProtocolError::ConnectFailed { .. }
        )
    }
}

/// Reasons a Bot Service refuses a call. Sent back as a `CallError`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("match is over; no further calls accepted")]
    MatchEnded,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("internal error: {0}")]
    Internal(String),
}

use std::time::Duration;

use tokio::net::TcpStream;
use tracing::{debug, warn};

use crate::errors::ProtocolError;
use crate::messages::{
    bot_request, bot_response, ActionRequest, ActionResponse, BotRequest, BotResponse,
    EndRoundMessage, EndRoundResponse, ReadyCheckRequest,
};
use crate::wire::{read_frame, write_frame};

/// How a client establishes its connection. Only connection setup is
/// retried; calls never are.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectOptions {
    pub timeout: Duration,
    pub retries: u32,
    pub retry_delay: Duration,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(4),
            retries: 5,
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// Engine-side stub for one bot endpoint.
///
/// A call that fails for any reason drops the connection, so a late reply
/// can never be read as the answer to a later call. The next call reconnects.
#[derive(Debug)]
pub struct BotClient {
    addr: String,
    options: ConnectOptions,
    stream: Option<TcpStream>,
    next_call_id: u64,
}

impl BotClient {
    pub fn new(addr: impl Into<String>, options: ConnectOptions) -> Self {
        Self {
            addr: addr.into(),
            options,
            stream: None,
            next_call_id: 0,
        }
    }

    pub fn address(&self) -> &str {
        &self.addr
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Connects, retrying up to `retries` times.
    pub async fn connect(&mut self) -> Result<(), ProtocolError> {
        let attempts = self.options.retries.max(1);
        for attempt in 1..=attempts {
            match connect_once(&self.addr, self.options.timeout).await {
                Ok(stream) => {
                    debug!(addr = %self.addr, attempt, "connected to bot");
                    self.stream = Some(stream);
                    return Ok(());
                }
                Err(err) => {
                    warn!(addr = %self.addr, attempt, error = %err, "connection attempt failed");
                    if attempt < attempts {
                        tokio::time::sleep(self.options.retry_delay).await;
                    }
                }
            }
        }
        Err(ProtocolError::ConnectFailed {
            addr: self.addr.clone(),
            attempts,
        })
    }

    pub async fn ready_check(
        &mut self,
        player_names: Vec<String>,
        timeout: Duration,
    ) -> Result<bool, ProtocolError> {
        let call = bot_request::Call::ReadyCheck(ReadyCheckRequest { player_names });
        match self.call(call, timeout).await? {
            bot_response::Reply::ReadyCheck(reply) => Ok(reply.ready),
            _ => Err(self.mismatch("ReadyCheck")),
        }
    }

    pub async fn request_action(
        &mut self,
        request: ActionRequest,
        timeout: Duration,
    ) -> Result<ActionResponse, ProtocolError> {
        match self
            .call(bot_request::Call::RequestAction(request), timeout)
            .await?
        {
            bot_response::Reply::Action(reply) => Ok(reply),
            _ => Err(self.mismatch("RequestAction")),
        }
    }

    pub async fn end_round(
        &mut self,
        message: EndRoundMessage,
        timeout: Duration,
    ) -> Result<EndRoundResponse, ProtocolError> {
        match self.call(bot_request::Call::EndRound(message), timeout).await? {
            bot_response::Reply::EndRound(reply) => Ok(reply),
            _ => Err(self.mismatch("EndRound")),
        }
    }

    pub fn close(&mut self) {
        self.stream = None;
    }

    async fn call(
        &mut self,
        call: bot_request::Call,
        timeout: Duration,
    ) -> Result<bot_response::Reply, ProtocolError> {
        self.next_call_id += 1;
        let call_id = self.next_call_id;
        let method = call.method();
        let request = BotRequest {
            call_id,
            call: Some(call),
        };

        let result = match tokio::time::timeout(timeout, self.exchange(&request)).await {
            Ok(result) => result,
            Err(_) => Err(ProtocolError::Timeout(timeout)),
        };
        let response = match result {
            Ok(response) => response,
            Err(err) => {
                self.stream = None;
                return Err(err);
            }
        };

        if response.call_id != call_id {
            self.stream = None;
            return Err(ProtocolError::UnexpectedReply { method, call_id });
        }
        match response.reply {
            Some(bot_response::Reply::Error(err)) => Err(ProtocolError::Remote(err.message)),
            Some(reply) => Ok(reply),
            None => Err(ProtocolError::UnexpectedReply { method, call_id }),
        }
    }

    async fn exchange(&mut self, request: &BotRequest) -> Result<BotResponse, ProtocolError> {
        if self.stream.is_none() {
            self.stream = Some(connect_once(&self.addr, self.options.timeout).await?);
        }
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| ProtocolError::NotConnected(self.addr.clone()))?;
        write_frame(stream, request).await?;
        read_frame(stream)
            .await?
            .ok_or(ProtocolError::ConnectionClosed)
    }

    fn mismatch(&self, method: &'static str) -> ProtocolError {
        ProtocolError::UnexpectedReply {
            method,
            call_id: self.next_call_id,
        }
    }
}

async fn connect_once(addr: &str, timeout: Duration) -> Result<TcpStream, ProtocolError> {
    let stream = tokio::time::timeout(timeout, TcpStream::connect(addr))
        .await
        .map_err(|_| ProtocolError::Timeout(timeout))??;
    stream.set_nodelay(true)?;
    Ok(stream)
}

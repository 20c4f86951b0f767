use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

use crate::errors::{ProtocolError, ServiceError};
use crate::messages::{bot_response, BotRequest, BotResponse, CallError};
use crate::service::{dispatch, BotService};
use crate::wire::{read_frame, write_frame};

/// Default port a bot endpoint listens on.
pub const DEFAULT_BOT_PORT: u16 = 50051;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    host: String,
    port: u16,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn for_tests() -> Self {
        Self::new("127.0.0.1", 0)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    fn bind_addr(&self) -> Result<SocketAddr, ServerError> {
        if let Ok(ip) = self.host.parse::<std::net::IpAddr>() {
            return Ok(SocketAddr::new(ip, self.port));
        }
        let candidate = format!("{}:{}", self.host, self.port);
        let mut addrs = candidate.to_socket_addrs().map_err(|err| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`: {err}"))
        })?;
        addrs.next().ok_or_else(|| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`"))
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("0.0.0.0", DEFAULT_BOT_PORT)
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Server task failed: {0}")]
    TaskError(String),
}

/// Serves a [`BotService`] over framed TCP.
///
/// Any number of connections may be open, but the service sits behind a
/// single lock so calls are answered strictly one at a time.
pub struct BotServer<S: BotService> {
    config: ServerConfig,
    service: Arc<Mutex<S>>,
}

impl<S: BotService> BotServer<S> {
    pub fn new(config: ServerConfig, service: S) -> Self {
        Self {
            config,
            service: Arc::new(Mutex::new(service)),
        }
    }

    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let addr = self.config.bind_addr()?;
        let listener = TcpListener::bind(addr).await?;
        let local = listener.local_addr()?;
        info!(address = %local, "bot endpoint listening");

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let service = self.service;
        let task = tokio::spawn(accept_loop(listener, service, shutdown_rx));

        Ok(ServerHandle {
            addr: local,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        })
    }
}

async fn accept_loop<S: BotService>(
    listener: TcpListener,
    service: Arc<Mutex<S>>,
    mut shutdown: oneshot::Receiver<()>,
) -> Result<(), ServerError> {
    let mut connections = JoinSet::new();
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(pair) => pair,
                    Err(err) => {
                        warn!(error = %err, "failed to accept connection");
                        continue;
                    }
                };
                debug!(peer = %peer, "engine connected");
                let service = Arc::clone(&service);
                connections.spawn(async move {
                    if let Err(err) = serve_connection(stream, service).await {
                        warn!(peer = %peer, error = %err, "connection ended with error");
                    }
                });
            }
            Some(_) = connections.join_next(), if !connections.is_empty() => {}
        }
    }
    connections.shutdown().await;
    info!("bot endpoint stopped");
    Ok(())
}

async fn serve_connection<S: BotService>(
    mut stream: TcpStream,
    service: Arc<Mutex<S>>,
) -> Result<(), ProtocolError> {
    stream.set_nodelay(true)?;
    while let Some(request) = read_frame::<_, BotRequest>(&mut stream).await? {
        let call_id = request.call_id;
        let method = request.call.as_ref().map(|c| c.method()).unwrap_or("none");
        debug!(call_id, method, "handling call");
        let service = Arc::clone(&service);
        let response = tokio::task::spawn_blocking(move || {
            // a panicking call poisons the lock; the next call carries on
            let mut guard = match service.lock() {
                Ok(guard) => guard,
                Err(poisoned) => {
                    warn!(call_id, "recovering service after a panicked call");
                    poisoned.into_inner()
                }
            };
            dispatch(&mut *guard, request)
        })
        .await
        .unwrap_or_else(|err| refusal(call_id, ServiceError::Internal(err.to_string())));
        write_frame(&mut stream, &response).await?;
    }
    debug!("engine disconnected");
    Ok(())
}

fn refusal(call_id: u64, err: ServiceError) -> BotResponse {
    BotResponse {
        call_id,
        reply: Some(bot_response::Reply::Error(CallError {
            message: err.to_string(),
        })),
    }
}

#[derive(Debug)]
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<(), ServerError>>>,
}

impl ServerHandle {
    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            match task.await {
                Ok(result) => result?,
                Err(err) => {
                    return Err(ServerError::TaskError(format!(
                        "server task join error: {err}"
                    )))
                }
            }
        }
        Ok(())
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

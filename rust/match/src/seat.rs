use std::path::{Path, PathBuf};
use std::time::Duration;

use pokerbot_protocol::{BotClient, ConnectOptions};

use crate::errors::MatchError;

pub const LOG_LIMIT_MARKER: &str = "Log size limit reached. No further entries will be added.";

/// Log lines returned by one player's bot, capped at a byte budget. Once an
/// entry would overflow the budget, a single marker line is appended and
/// everything after it is dropped.
#[derive(Debug, Clone, Default)]
pub struct PlayerLog {
    lines: Vec<String>,
    bytes: usize,
    limit: usize,
    full: bool,
}

impl PlayerLog {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn extend<I: IntoIterator<Item = String>>(&mut self, entries: I) {
        for entry in entries {
            if self.full {
                return;
            }
            if self.bytes + entry.len() <= self.limit {
                self.bytes += entry.len();
                self.lines.push(entry);
            } else {
                self.lines.push(LOG_LIMIT_MARKER.to_string());
                self.bytes = self.limit;
                self.full = true;
            }
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Writes `<dir>/<player>/debug_log.txt`.
    pub async fn write_to(&self, dir: &Path, player: &str) -> std::io::Result<PathBuf> {
        let folder = dir.join(player);
        tokio::fs::create_dir_all(&folder).await?;
        let path = folder.join("debug_log.txt");
        let mut body = self.lines.join("\n");
        if !body.is_empty() {
            body.push('\n');
        }
        tokio::fs::write(&path, body).await?;
        Ok(path)
    }
}

/// One player's connection and match-long accounting.
#[derive(Debug)]
pub struct Seat {
    pub name: String,
    pub client: BotClient,
    /// Remaining decision time in seconds.
    pub clock: f64,
    pub bankroll: i64,
    pub violations: u32,
    pub log: PlayerLog,
}

impl Seat {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        options: ConnectOptions,
        clock: f64,
        log_limit: usize,
    ) -> Self {
        Self {
            name: name.into(),
            client: BotClient::new(address, options),
            clock,
            bankroll: 0,
            violations: 0,
            log: PlayerLog::new(log_limit),
        }
    }

    pub fn out_of_time(&self) -> bool {
        self.clock <= 0.0
    }

    /// The per-call limit: the action timeout, or less if the clock is lower.
    pub fn call_timeout(&self, action_timeout: Duration) -> Duration {
        Duration::try_from_secs_f64(self.clock.max(0.0))
            .unwrap_or(action_timeout)
            .min(action_timeout)
    }

    /// Connects and asks the bot whether it is ready.
    pub async fn handshake(
        &mut self,
        player_names: Vec<String>,
        timeout: Duration,
    ) -> Result<(), MatchError> {
        let fail = |reason: String| MatchError::HandshakeFailed {
            player: self.name.clone(),
            reason,
        };
        if let Err(err) = self.client.connect().await {
            return Err(fail(err.to_string()));
        }
        match self.client.ready_check(player_names, timeout).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(fail("bot reported not ready".to_string())),
            Err(err) => Err(fail(err.to_string())),
        }
    }
}

//! Match engine binary
//!
//! Usage: pokerbot-match --config match.toml --rounds 1000

use std::path::PathBuf;

use clap::Parser;
use pokerbot_match::{MatchConfig, MatchRunner};
use pokerbot_protocol::logging::init_logging;

/// Run a heads-up match between two bot endpoints.
#[derive(Parser, Debug)]
#[command(name = "pokerbot-match", author, version, about, long_about = None)]
struct Args {
    /// TOML config file (falls back to POKERBOT_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of rounds to play
    #[arg(long)]
    rounds: Option<u32>,

    /// Deck seed for a reproducible match
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for the round log and player logs
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging("info");
    let args = Args::parse();

    let mut config = MatchConfig::load(args.config.as_deref())?;
    if let Some(rounds) = args.rounds {
        config.rounds = rounds;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(dir) = args.log_dir {
        config.log_dir = dir;
    }

    let runner = MatchRunner::new(config)?;
    let summary = runner.run().await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

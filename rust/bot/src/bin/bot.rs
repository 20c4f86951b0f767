//! Bot endpoint binary
//!
//! Usage: pokerbot-bot --port 50051 --strategy baseline

use clap::Parser;
use pokerbot_bot::{serve, BotConfig};
use pokerbot_engine::rules::TableRules;
use pokerbot_protocol::logging::init_logging;
use pokerbot_protocol::DEFAULT_BOT_PORT;

/// Serve a poker strategy as a bot endpoint.
#[derive(Parser, Debug)]
#[command(name = "pokerbot-bot", author, version, about, long_about = None)]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = DEFAULT_BOT_PORT)]
    port: u16,

    /// Strategy name: baseline, all-in, check-call or random
    #[arg(long, default_value = "baseline")]
    strategy: String,

    #[arg(long, default_value_t = 400)]
    starting_stack: u32,

    #[arg(long, default_value_t = 1)]
    small_blind: u32,

    #[arg(long, default_value_t = 2)]
    big_blind: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging("info");
    let args = Args::parse();

    let config = BotConfig {
        host: args.host,
        port: args.port,
        strategy: args.strategy,
        rules: TableRules {
            starting_stack: args.starting_stack,
            small_blind: args.small_blind,
            big_blind: args.big_blind,
            ..TableRules::default()
        },
    };

    let handle = serve(&config).await?;
    tracing::info!(
        address = %handle.address(),
        strategy = %config.strategy,
        "bot running; press Ctrl+C to stop"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    handle.shutdown().await?;
    tracing::info!("bot stopped cleanly");
    Ok(())
}

//! Crossline - unified CLI
//!
//! Hosts tic-tac-toe sessions behind the chat bot handler.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use crossline_bot::console::{ConsoleMessenger, run_console};
use crossline_bot::{BotConfig, GameHub, bot::BotHandler};
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Console { config } => run_console_bot(config).await,
        Command::ShowConfig { config } => show_config(config),
    }
}

fn init_tracing(config: &BotConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Run the bot against stdin/stdout
#[instrument]
async fn run_console_bot(config: Option<PathBuf>) -> Result<()> {
    let config = BotConfig::load(config.as_deref())?;
    init_tracing(&config);

    info!("Starting crossline console bot");
    if config.bot_token().is_some() {
        info!("Bot token configured; console transport ignores it");
    }

    let handler = BotHandler::new(
        GameHub::new(),
        ConsoleMessenger::stdout(),
        config.symbols().clone(),
    );
    run_console(&handler, BufReader::new(tokio::io::stdin())).await?;

    info!("Console bot stopped");
    Ok(())
}

/// Print the effective configuration
fn show_config(config: Option<PathBuf>) -> Result<()> {
    let config = BotConfig::load(config.as_deref())?;
    print!("{}", config.redacted().to_toml()?);
    Ok(())
}

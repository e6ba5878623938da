//! Command-line interface for crossline.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Crossline - tic-tac-toe between two chat users
#[derive(Parser, Debug)]
#[command(name = "crossline")]
#[command(about = "Two-player tic-tac-toe chat bot", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play through the bot from the terminal, one event per line
    Console {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the effective configuration with secrets redacted
    ShowConfig {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

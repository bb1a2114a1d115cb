//! Command-line interface definitions.

pub mod quote;
pub mod run;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Seesaw - rotate a Melon fund between two tokens through Uniswap.
#[derive(Parser, Debug)]
#[command(name = "seesaw")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// Override log level (debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run cycles until interrupted (default)
    Run(RunArgs),

    /// Run a single cycle and exit
    Once(RunArgs),

    /// Print a quote for selling one of the pair's tokens, without trading
    Quote(QuoteArgs),
}

/// Arguments shared by `run` and `once`.
#[derive(Parser, Debug, Clone, Default)]
pub struct RunArgs {
    /// Decide and build orders but never submit them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `quote` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct QuoteArgs {
    /// Symbol of the token to sell
    #[arg(long)]
    pub base: String,

    /// Amount of the base token, in whole tokens
    #[arg(long)]
    pub amount: String,
}

//! CLI interface for oracle-price-bot
//!
//! Provides subcommands for:
//! - `run`: Start the bot and print messages until Ctrl-C
//! - `fetch`: Fetch every price once
//! - `price`: Fetch a single symbol
//! - `status`: Show network and oracle addresses
//! - `config`: Show configuration

mod fetch;
mod run;

pub use fetch::{FetchArgs, PriceArgs};
pub use run::RunArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "oracle-price-bot")]
#[command(about = "Chat price bot backed by on-chain price oracles")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the price bot
    Run(RunArgs),
    /// Fetch every price once
    Fetch(FetchArgs),
    /// Fetch a single symbol
    Price(PriceArgs),
    /// Show network and oracle addresses
    Status,
    /// Show configuration
    Config,
}

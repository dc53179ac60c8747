//! CLI Command Definitions
//!
//! Argument parsing for the meme-inference binary.

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Meme Inference - token price endpoint
#[derive(Parser, Debug)]
#[command(
    name = "meme-inference",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Token price inference endpoint",
    long_about = "Serves GET /inference/{token}. Ticker symbols are quoted from CoinMarketCap; \
                  MEME is resolved through the chain status, meme oracle and DEX price APIs \
                  and returned with a small random jitter."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server
    Serve(ServeCmd),

    /// Run one inference and print the response body
    Quote(QuoteCmd),

    /// Load and validate configuration
    CheckConfig(CheckConfigCmd),
}

/// Run the HTTP server
#[derive(Parser, Debug)]
pub struct ServeCmd {
    /// Optional TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override listen address
    #[arg(short, long, value_name = "ADDR")]
    pub listen: Option<SocketAddr>,

    /// Seed the jitter RNG for reproducible output
    #[arg(long, value_name = "SEED")]
    pub jitter_seed: Option<u64>,
}

/// One-shot inference
#[derive(Parser, Debug)]
pub struct QuoteCmd {
    /// Ticker symbol, or MEME
    #[arg(value_name = "TOKEN")]
    pub token: String,

    /// Optional TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Validate configuration
#[derive(Parser, Debug)]
pub struct CheckConfigCmd {
    /// Optional TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

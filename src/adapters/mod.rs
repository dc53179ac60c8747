//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - CoinMarketCap: ticker quotes
//! - Chain: node status (latest block height)
//! - Oracle: meme token resolution at a block height
//! - Dex: token price by platform and address
//! - Random: jitter sources
//! - HTTP: inbound axum server
//! - CLI: command-line interface

pub mod coinmarketcap;
pub mod chain;
pub mod oracle;
pub mod dex;
pub mod random;
pub mod http;
pub mod cli;
mod upstream;

pub use coinmarketcap::CoinMarketCapClient;
pub use chain::ChainStatusClient;
pub use oracle::MemeOracleClient;
pub use dex::DexPriceClient;
pub use random::{SeededJitter, ThreadRngJitter};
pub use cli::CliApp;

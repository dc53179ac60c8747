//! Meme Inference - token price endpoint library
//!
//! Serves `GET /inference/{token}`: CoinMarketCap quotes for ticker symbols,
//! and an oracle-resolved, jittered price for `MEME`.
//!
//! # Modules
//!
//! - `domain`: Dispatch rule, price formatting, jitter math
//! - `ports`: Trait abstractions for every upstream and the random source
//! - `adapters`: Upstream REST clients, RNG sources, axum server, CLI
//! - `config`: Configuration loading and validation
//! - `application`: Inference service (ticker flow and meme flow)

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod config;
pub mod application;

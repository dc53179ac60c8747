//! Ports Layer - Trait definitions for external dependencies
//!
//! This module defines the interfaces (ports) that adapters must implement.
//! Following hexagonal architecture, these traits abstract:
//! - Ticker quotes (market-data provider)
//! - Chain status (latest block height)
//! - Meme oracle lookups
//! - DEX token prices
//! - The random source behind price jitter

pub mod price_feed;
pub mod jitter;
pub mod mocks;

use thiserror::Error;

pub use price_feed::{ChainStatusPort, MemeOraclePort, QuotePort, TokenPricePort};
pub use jitter::JitterSource;

/// Error returned by any outbound price-feed call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeedError {
    /// Request could not be built or sent
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Upstream did not answer within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Upstream answered with a non-success status
    #[error("{service} returned status {status}: {body}")]
    StatusError {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// Response body could not be read
    #[error("Failed to read response body: {0}")]
    BodyError(String),

    /// Body is not the JSON shape we expect
    #[error("Data parsing error: {0}")]
    ParseError(String),

    /// JSON decoded but a required field is absent or null
    #[error("Missing field: {0}")]
    MissingField(String),
}

impl FeedError {
    /// True when the failure happened at or beyond the upstream boundary
    /// (transport, truncated body or status), false when the answer arrived
    /// but was unusable.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            FeedError::HttpError(_)
                | FeedError::Timeout
                | FeedError::StatusError { .. }
                | FeedError::BodyError(_)
        )
    }

    /// Upstream HTTP status, when there was one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FeedError::StatusError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FeedError::Timeout
        } else if err.is_body() {
            FeedError::BodyError(err.to_string())
        } else if err.is_decode() {
            FeedError::ParseError(err.to_string())
        } else {
            FeedError::HttpError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::ParseError(err.to_string())
    }
}

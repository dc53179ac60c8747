use async_trait::async_trait;

use super::FeedError;
use crate::domain::OracleToken;

/// Latest USD quote for a ticker symbol
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuotePort: Send + Sync {
    /// `symbol` is forwarded verbatim; `api_key` goes in the provider's key header
    async fn latest_usd_price(&self, symbol: &str, api_key: &str) -> Result<f64, FeedError>;
}

/// Chain node status
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainStatusPort: Send + Sync {
    /// Latest synced block height, as the node reports it (a decimal string)
    async fn latest_block_height(&self, rpc_url: &str) -> Result<String, FeedError>;
}

/// Oracle that names the meme token for a block height
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemeOraclePort: Send + Sync {
    async fn meme_token(&self, block_height: &str, api_key: &str)
        -> Result<OracleToken, FeedError>;
}

/// DEX price lookup by deployment platform and contract address
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenPricePort: Send + Sync {
    /// Price string exactly as the DEX reports it
    async fn token_price(&self, platform: &str, address: &str) -> Result<String, FeedError>;
}

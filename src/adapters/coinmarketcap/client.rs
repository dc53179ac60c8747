//! CoinMarketCap API Client
//!
//! Fetches the latest USD quote for a ticker symbol from the
//! `v1/cryptocurrency/quotes/latest` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::types::{QuotesLatestResponse, CONVERT_CURRENCY};
use crate::adapters::upstream::{build_client, fetch_json, join_url};
use crate::ports::{FeedError, QuotePort};

/// Public CoinMarketCap Pro API
pub const CMC_API_URL: &str = "https://pro-api.coinmarketcap.com";

/// Header carrying the API key
pub const CMC_API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";

const QUOTES_LATEST_PATH: &str = "v1/cryptocurrency/quotes/latest";
const SERVICE: &str = "coinmarketcap";

/// Configuration for the CoinMarketCapClient
#[derive(Debug, Clone)]
pub struct CoinMarketCapConfig {
    /// Base URL for the API
    pub api_base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

/// Client for the CoinMarketCap quotes API
#[derive(Debug, Clone)]
pub struct CoinMarketCapClient {
    config: CoinMarketCapConfig,
    http: Client,
}

impl CoinMarketCapClient {
    pub fn with_config(config: CoinMarketCapConfig) -> Result<Self, FeedError> {
        let http = build_client(config.timeout)?;
        Ok(Self { config, http })
    }

    /// Latest USD price for `symbol`
    pub async fn get_usd_price(&self, symbol: &str, api_key: &str) -> Result<f64, FeedError> {
        let url = join_url(&self.config.api_base_url, QUOTES_LATEST_PATH);

        let request = self
            .http
            .get(&url)
            .query(&[("symbol", symbol), ("convert", CONVERT_CURRENCY)])
            .header("Accept", "application/json")
            .header(CMC_API_KEY_HEADER, api_key);

        let response: QuotesLatestResponse = fetch_json(request, SERVICE).await?;
        let price = response.usd_price(symbol)?;

        tracing::debug!("{} quote: {} USD", symbol, price);
        Ok(price)
    }
}

#[async_trait]
impl QuotePort for CoinMarketCapClient {
    async fn latest_usd_price(&self, symbol: &str, api_key: &str) -> Result<f64, FeedError> {
        self.get_usd_price(symbol, api_key).await
    }
}

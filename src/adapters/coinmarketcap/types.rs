//! CoinMarketCap response types
//!
//! Only the path `data[symbol].quote.USD.price` is decoded. Every level is
//! optional so an absent field becomes a `MissingField` error, not a decode error.

use std::collections::HashMap;

use serde::Deserialize;

use crate::ports::FeedError;

/// Currency every quote is converted to
pub const CONVERT_CURRENCY: &str = "USD";

/// Body of `GET /v1/cryptocurrency/quotes/latest`
#[derive(Debug, Deserialize)]
pub struct QuotesLatestResponse {
    #[serde(default)]
    pub data: Option<HashMap<String, AssetQuote>>,
}

#[derive(Debug, Deserialize)]
pub struct AssetQuote {
    #[serde(default)]
    pub quote: Option<HashMap<String, ConvertedQuote>>,
}

#[derive(Debug, Deserialize)]
pub struct ConvertedQuote {
    #[serde(default)]
    pub price: Option<f64>,
}

impl QuotesLatestResponse {
    /// Pull `data[symbol].quote.USD.price`
    pub fn usd_price(&self, symbol: &str) -> Result<f64, FeedError> {
        let data = self
            .data
            .as_ref()
            .ok_or_else(|| FeedError::MissingField("data".to_string()))?;

        let asset = data
            .get(symbol)
            .ok_or_else(|| FeedError::MissingField(format!("data.{}", symbol)))?;

        let quote = asset
            .quote
            .as_ref()
            .ok_or_else(|| FeedError::MissingField(format!("data.{}.quote", symbol)))?;

        quote
            .get(CONVERT_CURRENCY)
            .and_then(|q| q.price)
            .ok_or_else(|| {
                FeedError::MissingField(format!("data.{}.quote.{}.price", symbol, CONVERT_CURRENCY))
            })
    }
}

//! DEX Price Adapter
//!
//! Token price by `(platform, address)` from the GeckoTerminal simple price API:
//! `GET {base}/simple/networks/{platform}/token_price/{address}`.
//! The price comes back as a string and is passed through untouched.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::adapters::upstream::{build_client, fetch_json};
use crate::ports::{FeedError, TokenPricePort};

/// Public GeckoTerminal API
pub const DEX_API_URL: &str = "https://api.geckoterminal.com/api/v2";

const SERVICE: &str = "dex-price";

#[derive(Debug, Deserialize)]
struct TokenPriceResponse {
    #[serde(default)]
    data: Option<TokenPriceData>,
}

#[derive(Debug, Deserialize)]
struct TokenPriceData {
    #[serde(default)]
    attributes: Option<TokenPriceAttributes>,
}

#[derive(Debug, Deserialize)]
struct TokenPriceAttributes {
    #[serde(default)]
    token_prices: Option<HashMap<String, Option<String>>>,
}

impl TokenPriceResponse {
    fn price_for(self, address: &str) -> Result<String, FeedError> {
        let missing =
            || FeedError::MissingField(format!("data.attributes.token_prices.{}", address));

        let prices = self
            .data
            .and_then(|d| d.attributes)
            .and_then(|a| a.token_prices)
            .ok_or_else(missing)?;

        // EVM networks key prices by the lowercased address
        let price = match prices.get(address) {
            Some(p) => p.clone(),
            None => prices
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(address))
                .and_then(|(_, p)| p.clone()),
        };

        price.filter(|p| !p.is_empty()).ok_or_else(missing)
    }
}

/// Client for DEX token prices
#[derive(Debug, Clone)]
pub struct DexPriceClient {
    base_url: String,
    http: Client,
}

impl DexPriceClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        Ok(Self {
            base_url: base_url.into(),
            http: build_client(timeout)?,
        })
    }

    /// Price URL with `platform` and `address` encoded as single path segments
    fn price_url(&self, platform: &str, address: &str) -> Result<Url, FeedError> {
        let invalid = || FeedError::HttpError(format!("Invalid DEX base URL: {}", self.base_url));

        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(["simple", "networks", platform, "token_price", address]);
        Ok(url)
    }

    /// Price string for the token at `address` on `platform`
    pub async fn get_token_price(
        &self,
        platform: &str,
        address: &str,
    ) -> Result<String, FeedError> {
        let url = self.price_url(platform, address)?;

        let request = self.http.get(url).header("Accept", "application/json");
        let response: TokenPriceResponse = fetch_json(request, SERVICE).await?;
        response.price_for(address)
    }
}

#[async_trait]
impl TokenPricePort for DexPriceClient {
    async fn token_price(&self, platform: &str, address: &str) -> Result<String, FeedError> {
        self.get_token_price(platform, address).await
    }
}

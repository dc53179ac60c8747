//! Meme Oracle Adapter
//!
//! Resolves which meme token is current at a block height, returning its
//! deployment platform and contract address.
//!
//! Request: `GET {oracle_base}/{block_height}` with an `x-api-key` header.
//! Response: `{ "data": { "platform", "address", "token_symbol" } }`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::adapters::upstream::{build_client, fetch_json, join_url};
use crate::domain::OracleToken;
use crate::ports::{FeedError, MemeOraclePort};

/// Public meme-token oracle
pub const MEME_ORACLE_URL: &str = "https://api.upshot.xyz/v2/allora/tokens-oracle/token";

const API_KEY_HEADER: &str = "x-api-key";
const SERVICE: &str = "meme-oracle";

#[derive(Debug, Deserialize)]
struct OracleResponse {
    #[serde(default)]
    data: Option<OracleData>,
}

#[derive(Debug, Deserialize)]
struct OracleData {
    #[serde(default)]
    platform: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    token_symbol: Option<String>,
}

impl OracleResponse {
    fn into_token(self) -> Result<OracleToken, FeedError> {
        let data = self
            .data
            .ok_or_else(|| FeedError::MissingField("data".to_string()))?;

        let platform = required(data.platform, "data.platform")?;
        let address = required(data.address, "data.address")?;
        // Symbol is only used for logging
        let token_symbol = data.token_symbol.unwrap_or_default();

        Ok(OracleToken { platform, address, token_symbol })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, FeedError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(FeedError::MissingField(field.to_string())),
    }
}

/// Client for the meme-token oracle
#[derive(Debug, Clone)]
pub struct MemeOracleClient {
    base_url: String,
    http: Client,
}

impl MemeOracleClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        Ok(Self {
            base_url: base_url.into(),
            http: build_client(timeout)?,
        })
    }

    /// Token reported by the oracle at `block_height`
    pub async fn get_meme_token(
        &self,
        block_height: &str,
        api_key: &str,
    ) -> Result<OracleToken, FeedError> {
        let url = join_url(&self.base_url, block_height);

        let request = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .header(API_KEY_HEADER, api_key);

        let response: OracleResponse = fetch_json(request, SERVICE).await?;
        response.into_token()
    }
}

#[async_trait]
impl MemeOraclePort for MemeOracleClient {
    async fn meme_token(
        &self,
        block_height: &str,
        api_key: &str,
    ) -> Result<OracleToken, FeedError> {
        self.get_meme_token(block_height, api_key).await
    }
}

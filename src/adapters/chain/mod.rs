//! Chain Status Adapter
//!
//! Reads the latest synced block height from a CometBFT-style node
//! (`GET {rpc}/status`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::adapters::upstream::{build_client, fetch_json, join_url};
use crate::ports::{ChainStatusPort, FeedError};

const SERVICE: &str = "chain-status";

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    result: Option<StatusResult>,
}

#[derive(Debug, Deserialize)]
struct StatusResult {
    #[serde(default)]
    sync_info: Option<SyncInfo>,
}

#[derive(Debug, Deserialize)]
struct SyncInfo {
    #[serde(default)]
    latest_block_height: Option<String>,
}

impl StatusResponse {
    fn latest_block_height(self) -> Result<String, FeedError> {
        let height = self
            .result
            .and_then(|r| r.sync_info)
            .and_then(|s| s.latest_block_height)
            .ok_or_else(|| {
                FeedError::MissingField("result.sync_info.latest_block_height".to_string())
            })?;

        if height.is_empty() || !height.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FeedError::ParseError(format!("invalid block height {:?}", height)));
        }
        Ok(height)
    }
}

/// Client for a chain node's `/status` endpoint
#[derive(Debug, Clone)]
pub struct ChainStatusClient {
    http: Client,
}

impl ChainStatusClient {
    pub fn new(timeout: Duration) -> Result<Self, FeedError> {
        Ok(Self { http: build_client(timeout)? })
    }

    /// Latest block height reported by the node at `rpc_url`
    pub async fn get_latest_block_height(&self, rpc_url: &str) -> Result<String, FeedError> {
        let url = join_url(rpc_url, "status");
        let response: StatusResponse = fetch_json(self.http.get(&url), SERVICE).await?;
        response.latest_block_height()
    }
}

#[async_trait]
impl ChainStatusPort for ChainStatusClient {
    async fn latest_block_height(&self, rpc_url: &str) -> Result<String, FeedError> {
        self.get_latest_block_height(rpc_url).await
    }
}

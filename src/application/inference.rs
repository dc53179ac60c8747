//! Inference Service
//!
//! Answers one `/inference/{token}` request. Ticker symbols go straight to
//! the quote provider. `MEME` runs three dependent lookups in order
//! (block height, oracle token, DEX price) and then jitters the price.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::adapters::chain::ChainStatusClient;
use crate::adapters::coinmarketcap::{CoinMarketCapClient, CoinMarketCapConfig};
use crate::adapters::dex::DexPriceClient;
use crate::adapters::oracle::MemeOracleClient;
use crate::adapters::random::{SeededJitter, ThreadRngJitter};
use crate::config::Config;
use crate::domain::{apply_jitter, clamp_pct, format_fixed_price, MemeQuote, TokenRoute};
use crate::ports::{
    ChainStatusPort, FeedError, JitterSource, MemeOraclePort, QuotePort, TokenPricePort,
};

/// Step of the meme flow that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemeStage {
    BlockHeight,
    Oracle,
    TokenPrice,
}

impl fmt::Display for MemeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemeStage::BlockHeight => write!(f, "latest block height"),
            MemeStage::Oracle => write!(f, "oracle lookup"),
            MemeStage::TokenPrice => write!(f, "token price"),
        }
    }
}

#[derive(Debug, Error)]
pub enum InferenceError {
    /// Meme flow needs the API key for the oracle call
    #[error("need api key")]
    MissingApiKey,

    #[error("Error fetching meme price: RPC endpoint is not configured")]
    MissingRpcEndpoint,

    /// Any failure on the ticker path
    #[error("Error fetching price: {0}")]
    Price(FeedError),

    #[error("Error fetching meme price: {stage}: {source}")]
    Meme {
        stage: MemeStage,
        #[source]
        source: FeedError,
    },

    #[error("Error fetching meme price: invalid price {0:?}")]
    InvalidMemePrice(String),
}

/// Successful answer to one request
#[derive(Debug, Clone, PartialEq)]
pub enum Inference {
    Symbol { symbol: String, price: f64 },
    Meme(MemeQuote),
}

impl Inference {
    /// Response body: two decimals for tickers, free-format for the meme price
    pub fn body(&self) -> String {
        match self {
            Inference::Symbol { price, .. } => format_fixed_price(*price),
            Inference::Meme(quote) => quote.body(),
        }
    }
}

/// Values the service reads from configuration
#[derive(Debug, Clone)]
pub struct InferenceSettings {
    pub api_key: String,
    pub rpc_url: String,
    pub jitter_max_pct: f64,
}

impl From<&Config> for InferenceSettings {
    fn from(config: &Config) -> Self {
        Self {
            api_key: config.api_key.clone(),
            rpc_url: config.rpc_url.clone(),
            jitter_max_pct: config.jitter.max_pct,
        }
    }
}

/// Outbound collaborators of the service
#[derive(Clone)]
pub struct InferencePorts {
    pub quotes: Arc<dyn QuotePort>,
    pub chain: Arc<dyn ChainStatusPort>,
    pub oracle: Arc<dyn MemeOraclePort>,
    pub dex: Arc<dyn TokenPricePort>,
    pub jitter: Arc<dyn JitterSource>,
}

impl InferencePorts {
    /// Real HTTP clients for every upstream named in `config`
    pub fn from_config(config: &Config) -> Result<Self, FeedError> {
        let timeout = config.request_timeout();

        let quotes = CoinMarketCapClient::with_config(CoinMarketCapConfig {
            api_base_url: config.upstream.cmc_api_url.clone(),
            timeout,
        })?;
        let chain = ChainStatusClient::new(timeout)?;
        let oracle = MemeOracleClient::new(config.upstream.oracle_url.clone(), timeout)?;
        let dex = DexPriceClient::new(config.upstream.dex_api_url.clone(), timeout)?;

        let jitter: Arc<dyn JitterSource> = match config.jitter.seed {
            Some(seed) => Arc::new(SeededJitter::new(seed)),
            None => Arc::new(ThreadRngJitter),
        };

        Ok(Self {
            quotes: Arc::new(quotes),
            chain: Arc::new(chain),
            oracle: Arc::new(oracle),
            dex: Arc::new(dex),
            jitter,
        })
    }
}

/// Immutable per-process service shared by all request handlers
pub struct InferenceService {
    settings: InferenceSettings,
    ports: InferencePorts,
}

impl InferenceService {
    pub fn new(settings: InferenceSettings, ports: InferencePorts) -> Self {
        Self { settings, ports }
    }

    pub fn from_config(config: &Config) -> Result<Self, FeedError> {
        Ok(Self::new(InferenceSettings::from(config), InferencePorts::from_config(config)?))
    }

    /// Dispatch on the raw path token and run the matching flow
    pub async fn infer(&self, token: &str) -> Result<Inference, InferenceError> {
        let route = TokenRoute::from_path(token);
        tracing::debug!("Inference request routed to {}", route);

        match route {
            TokenRoute::Meme => self.meme_price().await.map(Inference::Meme),
            TokenRoute::Symbol(symbol) => {
                let price = self.symbol_price(&symbol).await?;
                Ok(Inference::Symbol { symbol, price })
            }
        }
    }

    /// Latest USD price for a ticker symbol
    pub async fn symbol_price(&self, symbol: &str) -> Result<f64, InferenceError> {
        self.ports
            .quotes
            .latest_usd_price(symbol, &self.settings.api_key)
            .await
            .map_err(|e| {
                tracing::warn!("Quote for {} failed: {}", symbol, e);
                InferenceError::Price(e)
            })
    }

    /// Resolve the current meme token and return its jittered price
    pub async fn meme_price(&self) -> Result<MemeQuote, InferenceError> {
        if self.settings.api_key.is_empty() {
            return Err(InferenceError::MissingApiKey);
        }
        if self.settings.rpc_url.is_empty() {
            return Err(InferenceError::MissingRpcEndpoint);
        }

        let block_height = self
            .ports
            .chain
            .latest_block_height(&self.settings.rpc_url)
            .await
            .map_err(|e| meme_failure(MemeStage::BlockHeight, e))?;

        let token = self
            .ports
            .oracle
            .meme_token(&block_height, &self.settings.api_key)
            .await
            .map_err(|e| meme_failure(MemeStage::Oracle, e))?;

        let raw_price = self
            .ports
            .dex
            .token_price(&token.platform, &token.address)
            .await
            .map_err(|e| meme_failure(MemeStage::TokenPrice, e))?;

        let base: f64 = raw_price
            .trim()
            .parse()
            .ok()
            .filter(|p: &f64| p.is_finite())
            .ok_or_else(|| InferenceError::InvalidMemePrice(raw_price.clone()))?;

        let bound = self.settings.jitter_max_pct;
        let pct = clamp_pct(self.ports.jitter.draw_pct(bound), bound);
        let price = apply_jitter(base, pct);

        let quote = MemeQuote { block_height, token, raw_price, price };

        tracing::info!(
            block_height = %quote.block_height,
            meme = %quote.token.token_symbol,
            platform = %quote.token.platform,
            address = %quote.token.address,
            raw_price = %quote.raw_price,
            jitter_pct = pct,
            "Meme price resolved"
        );

        Ok(quote)
    }
}

fn meme_failure(stage: MemeStage, source: FeedError) -> InferenceError {
    tracing::warn!("Meme flow failed at {}: {}", stage, source);
    InferenceError::Meme { stage, source }
}

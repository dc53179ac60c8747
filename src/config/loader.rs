//! Configuration Loader
//!
//! Builds the process configuration once at startup: an optional TOML file,
//! then environment overrides (`CMC_APIKEY`, `RPC`, ...), then validation.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::adapters::coinmarketcap::CMC_API_URL;
use crate::adapters::dex::DEX_API_URL;
use crate::adapters::oracle::MEME_ORACLE_URL;
use crate::domain::DEFAULT_JITTER_PCT;

/// Market-data API key
pub const ENV_API_KEY: &str = "CMC_APIKEY";
/// Chain status service base URL
pub const ENV_RPC: &str = "RPC";
pub const ENV_LISTEN: &str = "INFERENCE_LISTEN";
pub const ENV_TIMEOUT_SECS: &str = "INFERENCE_TIMEOUT_SECS";
pub const ENV_JITTER_PCT: &str = "INFERENCE_JITTER_PCT";
pub const ENV_CMC_API_URL: &str = "CMC_API_URL";
pub const ENV_ORACLE_URL: &str = "MEME_ORACLE_URL";
pub const ENV_DEX_API_URL: &str = "DEX_API_URL";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Market-data provider key, also sent to the meme oracle
    #[serde(default)]
    pub api_key: String,
    /// Base URL of the chain status service
    #[serde(default)]
    pub rpc_url: String,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub upstream: UpstreamSection,
    #[serde(default)]
    pub jitter: JitterSection,
}

/// HTTP server section
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,
    /// Timeout applied to every outbound call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Upstream API base URLs
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamSection {
    #[serde(default = "default_cmc_api_url")]
    pub cmc_api_url: String,
    #[serde(default = "default_oracle_url")]
    pub oracle_url: String,
    #[serde(default = "default_dex_api_url")]
    pub dex_api_url: String,
}

/// Meme price jitter section
#[derive(Debug, Clone, Deserialize)]
pub struct JitterSection {
    /// Maximum adjustment either side of the price, in percent
    #[serde(default = "default_jitter_pct")]
    pub max_pct: f64,
    /// Fixed RNG seed; unseeded when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_listen() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_cmc_api_url() -> String {
    CMC_API_URL.to_string()
}

fn default_oracle_url() -> String {
    MEME_ORACLE_URL.to_string()
}

fn default_dex_api_url() -> String {
    DEX_API_URL.to_string()
}

fn default_jitter_pct() -> f64 {
    DEFAULT_JITTER_PCT
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for UpstreamSection {
    fn default() -> Self {
        Self {
            cmc_api_url: default_cmc_api_url(),
            oracle_url: default_oracle_url(),
            dex_api_url: default_dex_api_url(),
        }
    }
}

impl Default for JitterSection {
    fn default() -> Self {
        Self {
            max_pct: default_jitter_pct(),
            seed: None,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid value for {name}: {value:?}")]
    EnvError { name: &'static str, value: String },
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from an optional TOML file plus the process environment
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    load_config_with(path, |name| std::env::var(name).ok())
}

/// Same as [`load_config`] with an explicit variable lookup
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => Config::default(),
    };
    config.apply_overrides(lookup)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Apply environment overrides. Unset variables leave the value alone.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_API_KEY) {
            self.api_key = v.trim().to_string();
        }
        if let Some(v) = lookup(ENV_RPC) {
            self.rpc_url = v.trim().to_string();
        }
        if let Some(v) = lookup(ENV_LISTEN) {
            self.server.listen = v;
        }
        if let Some(v) = lookup(ENV_TIMEOUT_SECS) {
            self.server.request_timeout_secs = v
                .trim()
                .parse()
                .map_err(|_| ConfigError::EnvError { name: ENV_TIMEOUT_SECS, value: v.clone() })?;
        }
        if let Some(v) = lookup(ENV_JITTER_PCT) {
            self.jitter.max_pct = v
                .trim()
                .parse()
                .map_err(|_| ConfigError::EnvError { name: ENV_JITTER_PCT, value: v.clone() })?;
        }
        if let Some(v) = lookup(ENV_CMC_API_URL) {
            self.upstream.cmc_api_url = v;
        }
        if let Some(v) = lookup(ENV_ORACLE_URL) {
            self.upstream.oracle_url = v;
        }
        if let Some(v) = lookup(ENV_DEX_API_URL) {
            self.upstream.dex_api_url = v;
        }
        Ok(())
    }

    /// Validate all configuration parameters.
    ///
    /// A missing API key or RPC endpoint is not an error here: the meme flow
    /// rejects those per request. See [`Config::warnings`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.listen_addr()?;

        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be > 0".to_string(),
            ));
        }

        if !self.jitter.max_pct.is_finite()
            || self.jitter.max_pct < 0.0
            || self.jitter.max_pct >= 100.0
        {
            return Err(ConfigError::ValidationError(format!(
                "jitter max_pct must be in [0, 100), got {}",
                self.jitter.max_pct
            )));
        }

        for (name, url) in [
            ("cmc_api_url", &self.upstream.cmc_api_url),
            ("oracle_url", &self.upstream.oracle_url),
            ("dex_api_url", &self.upstream.dex_api_url),
        ] {
            if url.is_empty() {
                return Err(ConfigError::ValidationError(format!("{} cannot be empty", name)));
            }
        }

        Ok(())
    }

    /// Non-fatal problems worth logging at startup
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.api_key.is_empty() {
            warnings.push(format!("{} is not set; MEME requests will be rejected", ENV_API_KEY));
        }
        if self.rpc_url.is_empty() {
            warnings.push(format!("{} is not set; MEME requests will fail", ENV_RPC));
        }
        warnings
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.listen.parse().map_err(|_| {
            ConfigError::ValidationError(format!("invalid listen address {:?}", self.server.listen))
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    /// API key with all but the last four characters hidden
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        match chars.len() {
            0 => "<unset>".to_string(),
            n if n <= 4 => "*".repeat(n),
            n => {
                let tail: String = chars[n - 4..].iter().collect();
                format!("{}{}", "*".repeat(n - 4), tail)
            }
        }
    }
}

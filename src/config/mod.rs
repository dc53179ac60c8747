//! Configuration Module
//!
//! Loads and validates configuration from an optional TOML file and the environment.

pub mod loader;

pub use loader::{
    Config, ConfigError, JitterSection, ServerSection, UpstreamSection, load_config,
    load_config_with, ENV_API_KEY, ENV_RPC,
};

//! Meme Inference - token price endpoint
//!
//! Serves `GET /inference/{token}` backed by CoinMarketCap and the meme oracle chain.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use meme_inference::adapters::cli::{
    expand_config_path, CheckConfigCmd, CliApp, Command, QuoteCmd, ServeCmd,
};
use meme_inference::adapters::http;
use meme_inference::application::InferenceService;
use meme_inference::config::{load_config, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Secrets (CMC_APIKEY, RPC) may live in .env
    dotenvy::dotenv().ok();

    let app = CliApp::parse();
    init_logging(app.verbose, app.debug)?;

    match app.command {
        Command::Serve(cmd) => serve_command(cmd).await,
        Command::Quote(cmd) => quote_command(cmd).await,
        Command::CheckConfig(cmd) => check_config_command(cmd),
    }
}

fn init_logging(verbose: bool, debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt().with_env_filter(filter).init();
    Ok(())
}

fn load(path: Option<&std::path::Path>) -> Result<Config> {
    let path = expand_config_path(path);
    let config = load_config(path.as_deref()).context("Failed to load configuration")?;
    for warning in config.warnings() {
        tracing::warn!("{}", warning);
    }
    Ok(config)
}

async fn serve_command(cmd: ServeCmd) -> Result<()> {
    let mut config = load(cmd.config.as_deref())?;
    if let Some(listen) = cmd.listen {
        config.server.listen = listen.to_string();
    }
    if cmd.jitter_seed.is_some() {
        config.jitter.seed = cmd.jitter_seed;
    }

    tracing::info!("Starting meme-inference...");
    tracing::info!("  API key: {}", config.masked_api_key());
    tracing::info!("  RPC: {}", rpc_display(&config));

    let addr = config.listen_addr()?;
    let service = InferenceService::from_config(&config)
        .context("Failed to create upstream clients")?;

    http::serve(addr, Arc::new(service), shutdown_signal())
        .await
        .with_context(|| format!("Server on {} failed", addr))?;

    tracing::info!("meme-inference stopped");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    tracing::info!("Shutdown signal received");
}

async fn quote_command(cmd: QuoteCmd) -> Result<()> {
    let config = load(cmd.config.as_deref())?;
    let service = InferenceService::from_config(&config)
        .context("Failed to create upstream clients")?;

    match service.infer(&cmd.token).await {
        Ok(inference) => {
            println!("{}", inference.body());
            Ok(())
        }
        Err(e) => anyhow::bail!("{} ({})", e, e.status_code()),
    }
}

fn check_config_command(cmd: CheckConfigCmd) -> Result<()> {
    let config = load(cmd.config.as_deref())?;

    println!("Configuration OK");
    println!("  listen:          {}", config.server.listen);
    println!("  api key:         {}", config.masked_api_key());
    println!("  rpc:             {}", rpc_display(&config));
    println!("  timeout:         {}s", config.server.request_timeout_secs);
    println!("  coinmarketcap:   {}", config.upstream.cmc_api_url);
    println!("  meme oracle:     {}", config.upstream.oracle_url);
    println!("  dex prices:      {}", config.upstream.dex_api_url);
    println!("  jitter:          ±{}%", config.jitter.max_pct);
    match config.jitter.seed {
        Some(seed) => println!("  jitter seed:     {}", seed),
        None => println!("  jitter seed:     <random>"),
    }
    Ok(())
}

fn rpc_display(config: &Config) -> &str {
    if config.rpc_url.is_empty() {
        "<unset>"
    } else {
        &config.rpc_url
    }
}

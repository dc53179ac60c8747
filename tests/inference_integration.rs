//! Inference API Integration Tests
//!
//! Runs the real axum server on an ephemeral port with every upstream
//! (CoinMarketCap, chain status, meme oracle, DEX prices) served by mockito,
//! or by a raw local listener when a test needs an upstream that stalls.
//! No real network calls.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use mockito::{Matcher, Server, ServerGuard};
use regex::Regex;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use meme_inference::adapters::http;
use meme_inference::application::InferenceService;
use meme_inference::config::{load_config_with, Config};

// ============================================================================
// Test Fixtures
// ============================================================================

struct TestApp {
    base_url: String,
    client: reqwest::Client,
    _shutdown: oneshot::Sender<()>,
}

impl TestApp {
    async fn get(&self, path: &str) -> (u16, String, String) {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("request to test server failed");
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.text().await.unwrap();
        (status, content_type, body)
    }
}

/// Config pointing every upstream at the mock server
fn config_for(upstream: &ServerGuard, api_key: &str, rpc: Option<&str>) -> Config {
    let mut env = HashMap::new();
    env.insert("CMC_APIKEY", api_key.to_string());
    env.insert("RPC", rpc.map(str::to_string).unwrap_or_else(|| upstream.url()));
    env.insert("CMC_API_URL", upstream.url());
    env.insert("MEME_ORACLE_URL", format!("{}/oracle/token", upstream.url()));
    env.insert("DEX_API_URL", format!("{}/dex/api/v2", upstream.url()));
    env.insert("INFERENCE_TIMEOUT_SECS", "5".to_string());
    env.insert("INFERENCE_LISTEN", "127.0.0.1:0".to_string());

    load_config_with(None, |name| env.get(name).cloned()).expect("test config is valid")
}

async fn spawn_app(config: Config) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let service = Arc::new(InferenceService::from_config(&config).unwrap());
    let (tx, rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        http::serve_listener(listener, service, async move {
            rx.await.ok();
        })
        .await
        .unwrap();
    });

    TestApp {
        base_url: format!("http://{}", addr),
        client: reqwest::Client::new(),
        _shutdown: tx,
    }
}

async fn mock_cmc_price(server: &mut ServerGuard, symbol: &str, price: f64) -> mockito::Mock {
    server
        .mock("GET", "/v1/cryptocurrency/quotes/latest")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("symbol".into(), symbol.into()),
            Matcher::UrlEncoded("convert".into(), "USD".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "data": { symbol: { "quote": { "USD": { "price": price } } } } }).to_string(),
        )
        .create_async()
        .await
}

/// The three meme upstreams: height 123, token ABC on solana, price 10.00
async fn mock_meme_chain(server: &mut ServerGuard) -> Vec<mockito::Mock> {
    let status = server
        .mock("GET", "/status")
        .with_status(200)
        .with_body(
            json!({ "result": { "sync_info": { "latest_block_height": "123" } } }).to_string(),
        )
        .create_async()
        .await;
    let oracle = server
        .mock("GET", "/oracle/token/123")
        .match_header("x-api-key", "test-key")
        .with_status(200)
        .with_body(
            json!({ "data": { "platform": "solana", "address": "ABC", "token_symbol": "BONK" } })
                .to_string(),
        )
        .create_async()
        .await;
    let price = server
        .mock("GET", "/dex/api/v2/simple/networks/solana/token_price/ABC")
        .with_status(200)
        .with_body(
            json!({ "data": { "attributes": { "token_prices": { "ABC": "10.00" } } } })
                .to_string(),
        )
        .create_async()
        .await;
    vec![status, oracle, price]
}

/// Raw upstream that answers every connection with `head` and then goes quiet
async fn spawn_stalled_upstream(head: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(head.as_bytes()).await;
                tokio::time::sleep(Duration::from_secs(30)).await;
            });
        }
    });
    format!("http://{}", addr)
}

// ============================================================================
// Ticker Flow
// ============================================================================

#[tokio::test]
async fn test_symbol_price_two_decimals() {
    let mut upstream = Server::new_async().await;
    let mock = mock_cmc_price(&mut upstream, "BTC", 43000.128).await;
    let app = spawn_app(config_for(&upstream, "test-key", None)).await;

    let (status, content_type, body) = app.get("/inference/BTC").await;

    assert_eq!(status, 200);
    assert!(content_type.starts_with("text/plain"));
    assert_eq!(body, "43000.13");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_symbol_body_shape() {
    let mut upstream = Server::new_async().await;
    let _mock = mock_cmc_price(&mut upstream, "ETH", 2512.0).await;
    let app = spawn_app(config_for(&upstream, "test-key", None)).await;

    let (_, _, body) = app.get("/inference/ETH").await;
    let two_decimals = Regex::new(r"^\d+\.\d{2}$").unwrap();
    assert!(two_decimals.is_match(&body), "unexpected body {:?}", body);
    assert_eq!(body, "2512.00");
}

#[tokio::test]
async fn test_upstream_status_becomes_500() {
    for upstream_status in [400, 401, 403, 429, 500, 503] {
        let mut upstream = Server::new_async().await;
        let _mock = upstream
            .mock("GET", "/v1/cryptocurrency/quotes/latest")
            .match_query(Matcher::Any)
            .with_status(upstream_status)
            .with_body("{}")
            .create_async()
            .await;
        let app = spawn_app(config_for(&upstream, "test-key", None)).await;

        let (status, _, body) = app.get("/inference/BTC").await;

        assert_eq!(status, 500);
        assert!(body.starts_with("Error fetching price: "), "body: {}", body);
        assert!(body.contains(&upstream_status.to_string()), "body: {}", body);
    }
}

#[tokio::test]
async fn test_unknown_symbol_becomes_500() {
    let mut upstream = Server::new_async().await;
    let _mock = upstream
        .mock("GET", "/v1/cryptocurrency/quotes/latest")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({ "data": {} }).to_string())
        .create_async()
        .await;
    let app = spawn_app(config_for(&upstream, "test-key", None)).await;

    let (status, _, body) = app.get("/inference/NOPE").await;
    assert_eq!(status, 500);
    assert!(body.contains("data.NOPE"));
}

#[tokio::test]
async fn test_other_meme_casings_take_ticker_flow() {
    for token in ["meme", "Meme", "MEMEs"] {
        let mut upstream = Server::new_async().await;
        let quote = mock_cmc_price(&mut upstream, token, 0.25).await;
        let status_mock = upstream.mock("GET", "/status").expect(0).create_async().await;
        let app = spawn_app(config_for(&upstream, "test-key", None)).await;

        let (status, _, body) = app.get(&format!("/inference/{}", token)).await;

        assert_eq!(status, 200);
        assert_eq!(body, "0.25");
        quote.assert_async().await;
        status_mock.assert_async().await;
    }
}

// ============================================================================
// Meme Flow
// ============================================================================

#[tokio::test]
async fn test_meme_price_within_jitter_bound() {
    let mut upstream = Server::new_async().await;
    let mocks = mock_meme_chain(&mut upstream).await;
    let app = spawn_app(config_for(&upstream, "test-key", None)).await;

    let (status, content_type, body) = app.get("/inference/MEME").await;

    assert_eq!(status, 200);
    assert!(content_type.starts_with("text/plain"));
    let price: f64 = body.parse().expect("body is a decimal");
    assert!((9.70..=10.30).contains(&price), "price {} outside ±3%", price);
    for mock in mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_seeded_jitter_is_reproducible() {
    let mut bodies = Vec::new();
    for _ in 0..2 {
        let mut upstream = Server::new_async().await;
        let _mocks = mock_meme_chain(&mut upstream).await;
        let mut config = config_for(&upstream, "test-key", None);
        config.jitter.seed = Some(1234);
        let app = spawn_app(config).await;

        let (status, _, body) = app.get("/inference/MEME").await;
        assert_eq!(status, 200);
        bodies.push(body);
    }
    assert_eq!(bodies[0], bodies[1]);
}

#[tokio::test]
async fn test_meme_without_api_key_is_400_and_calls_nothing() {
    let mut upstream = Server::new_async().await;
    let status_mock = upstream.mock("GET", "/status").expect(0).create_async().await;
    let oracle_mock = upstream
        .mock("GET", Matcher::Regex(r"^/oracle/".to_string()))
        .expect(0)
        .create_async()
        .await;
    let app = spawn_app(config_for(&upstream, "", None)).await;

    let (status, _, body) = app.get("/inference/MEME").await;

    assert_eq!(status, 400);
    assert_eq!(body, "need api key");
    status_mock.assert_async().await;
    oracle_mock.assert_async().await;
}

#[tokio::test]
async fn test_meme_without_rpc_is_request_error() {
    let upstream = Server::new_async().await;
    let app = spawn_app(config_for(&upstream, "test-key", Some(""))).await;

    let (status, _, body) = app.get("/inference/MEME").await;
    assert_eq!(status, 500);
    assert!(body.contains("RPC"));

    // The process keeps serving
    let (status, _, _) = app.get("/inference/MEME").await;
    assert_eq!(status, 500);
}

#[tokio::test]
async fn test_meme_oracle_failure_is_502() {
    let mut upstream = Server::new_async().await;
    let _status = upstream
        .mock("GET", "/status")
        .with_status(200)
        .with_body(
            json!({ "result": { "sync_info": { "latest_block_height": "77" } } }).to_string(),
        )
        .create_async()
        .await;
    let _oracle = upstream
        .mock("GET", "/oracle/token/77")
        .with_status(500)
        .with_body("oracle down")
        .create_async()
        .await;
    let dex = upstream
        .mock("GET", Matcher::Regex(r"^/dex/".to_string()))
        .expect(0)
        .create_async()
        .await;
    let app = spawn_app(config_for(&upstream, "test-key", None)).await;

    let (status, _, body) = app.get("/inference/MEME").await;

    assert_eq!(status, 502);
    assert!(body.starts_with("Error fetching meme price: oracle lookup"), "body: {}", body);
    dex.assert_async().await;
}

#[tokio::test]
async fn test_meme_unreachable_rpc_is_502() {
    let upstream = Server::new_async().await;
    let app = spawn_app(config_for(&upstream, "test-key", Some("http://127.0.0.1:1"))).await;

    let (status, _, body) = app.get("/inference/MEME").await;
    assert_eq!(status, 502);
    assert!(body.contains("latest block height"));
}

#[tokio::test]
async fn test_meme_malformed_price_is_500() {
    let mut upstream = Server::new_async().await;
    let _status = upstream
        .mock("GET", "/status")
        .with_status(200)
        .with_body(json!({ "result": { "sync_info": { "latest_block_height": "5" } } }).to_string())
        .create_async()
        .await;
    let _oracle = upstream
        .mock("GET", "/oracle/token/5")
        .with_status(200)
        .with_body(json!({ "data": { "platform": "solana", "address": "ABC" } }).to_string())
        .create_async()
        .await;
    let _price = upstream
        .mock("GET", "/dex/api/v2/simple/networks/solana/token_price/ABC")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;
    let app = spawn_app(config_for(&upstream, "test-key", None)).await;

    let (status, _, body) = app.get("/inference/MEME").await;
    assert_eq!(status, 500);
    assert!(body.contains("token price"));
}

#[tokio::test]
async fn test_meme_silent_rpc_times_out_as_502() {
    let upstream = Server::new_async().await;
    let rpc = spawn_stalled_upstream("").await;
    let mut config = config_for(&upstream, "test-key", Some(&rpc));
    config.server.request_timeout_secs = 1;
    let app = spawn_app(config).await;

    let (status, _, body) = app.get("/inference/MEME").await;

    assert_eq!(status, 502);
    assert!(body.starts_with("Error fetching meme price: latest block height"), "body: {}", body);
    assert!(body.contains("timed out"), "body: {}", body);
}

#[tokio::test]
async fn test_meme_rpc_stalling_mid_body_is_502() {
    let upstream = Server::new_async().await;
    let rpc = spawn_stalled_upstream(concat!(
        "HTTP/1.1 200 OK\r\n",
        "content-type: application/json\r\n",
        "content-length: 128\r\n\r\n",
        "{\"result\":",
    ))
    .await;
    let mut config = config_for(&upstream, "test-key", Some(&rpc));
    config.server.request_timeout_secs = 1;
    let app = spawn_app(config).await;

    let (status, _, body) = app.get("/inference/MEME").await;

    assert_eq!(status, 502);
    assert!(body.starts_with("Error fetching meme price: latest block height"), "body: {}", body);
}

// ============================================================================
// Routing
// ============================================================================

#[tokio::test]
async fn test_undefined_routes() {
    let upstream = Server::new_async().await;
    let app = spawn_app(config_for(&upstream, "test-key", None)).await;

    let (status, _, _) = app.get("/price/BTC").await;
    assert_eq!(status, 404);

    let (status, _, _) = app.get("/inference").await;
    assert_eq!(status, 404);

    let response = app
        .client
        .post(format!("{}/inference/BTC", app.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 405);
}

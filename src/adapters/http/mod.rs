//! HTTP Adapter
//!
//! Inbound surface of the service: a single `GET /inference/:token` route on
//! axum. Every request gets exactly one `text/plain` response.

mod response;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use crate::application::{Inference, InferenceError, InferenceService};

/// Build the router around a shared service
pub fn router(service: Arc<InferenceService>) -> Router {
    Router::new()
        .route("/inference/:token", get(inference))
        .with_state(service)
}

async fn inference(
    State(service): State<Arc<InferenceService>>,
    Path(token): Path<String>,
) -> Result<Inference, InferenceError> {
    tracing::debug!("GET /inference/{}", token);
    service.infer(&token).await
}

/// Bind `addr` and serve until `shutdown` resolves
pub async fn serve<F>(
    addr: SocketAddr,
    service: Arc<InferenceService>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    serve_listener(listener, service, shutdown).await
}

/// Serve on an already bound listener
pub async fn serve_listener<F>(
    listener: TcpListener,
    service: Arc<InferenceService>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    tracing::info!("Inference API listening on http://{}", listener.local_addr()?);
    tracing::info!("  GET /inference/:token");

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown)
        .await
}

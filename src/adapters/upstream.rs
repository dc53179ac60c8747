//! Shared request plumbing for the upstream REST clients

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::ports::FeedError;

/// Longest upstream error body echoed back in a `StatusError`
const MAX_ERROR_BODY: usize = 256;

/// Build an HTTP client with a bounded per-call timeout
pub(crate) fn build_client(timeout: Duration) -> Result<Client, FeedError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| FeedError::HttpError(format!("Failed to create HTTP client: {}", e)))
}

/// Send a request, require HTTP 200, and decode the JSON body into `T`
pub(crate) async fn fetch_json<T>(
    request: RequestBuilder,
    service: &'static str,
) -> Result<T, FeedError>
where
    T: DeserializeOwned,
{
    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await.map_err(body_error)?;

    if status != reqwest::StatusCode::OK {
        tracing::debug!("{} answered {}: {}", service, status, text);
        return Err(FeedError::StatusError {
            service,
            status: status.as_u16(),
            body: truncate(&text, MAX_ERROR_BODY),
        });
    }

    Ok(serde_json::from_str(&text)?)
}

/// The client timeout also covers the body, so a stalled transfer surfaces here
fn body_error(err: reqwest::Error) -> FeedError {
    if err.is_timeout() {
        FeedError::Timeout
    } else {
        FeedError::BodyError(err.to_string())
    }
}

/// Join a base URL and a path segment without doubling the slash
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn truncate(text: &str, max: usize) -> String {
    let text = text.trim();
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

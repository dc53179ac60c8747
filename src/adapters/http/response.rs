use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::{Inference, InferenceError};

impl InferenceError {
    /// HTTP status for this failure
    pub fn status_code(&self) -> StatusCode {
        match self {
            InferenceError::MissingApiKey => StatusCode::BAD_REQUEST,
            InferenceError::MissingRpcEndpoint => StatusCode::INTERNAL_SERVER_ERROR,
            // Ticker failures are all reported as 500, whatever the cause
            InferenceError::Price(_) => StatusCode::INTERNAL_SERVER_ERROR,
            InferenceError::Meme { source, .. } if source.is_upstream() => StatusCode::BAD_GATEWAY,
            InferenceError::Meme { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            InferenceError::InvalidMemePrice(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for InferenceError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

impl IntoResponse for Inference {
    fn into_response(self) -> Response {
        (StatusCode::OK, self.body()).into_response()
    }
}

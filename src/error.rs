//! Error types for provider calls and the HTTP surface

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failure of a single provider call. The aggregator treats every variant
/// the same way: log it and move on to the next provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport failure or timeout
    #[error("Request failed: {0}")]
    Request(String),

    /// Provider answered with a non-success status
    #[error("Request failed with status: {0}")]
    Status(u16),

    /// Payload could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Payload decoded but carried none of the expected fields
    #[error("No data in response")]
    NoData,
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key as a query parameter
        let err = err.without_url();
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

/// Errors surfaced to HTTP clients
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            Self::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                msg,
            ),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        (status, Json(ErrorResponse { error: message, code })).into_response()
    }
}

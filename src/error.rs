// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Upper bound on upstream diagnostic text carried in error messages.
/// Moodle error payloads can embed whole HTML pages.
const REMOTE_DIAGNOSTIC_LIMIT: usize = 300;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error: required configuration missing or invalid
    Config(String),

    // 401 Unauthorized: leaderboard access gate rejection
    Unauthorized(String),

    // 500 Internal Server Error: any failure talking to Moodle
    // (transport, non-2xx, undecodable body, ws exception envelope)
    Remote(String),
}

impl AppError {
    /// Builds a `Remote` error with the upstream diagnostic truncated.
    pub fn remote(context: &str, detail: &str) -> Self {
        AppError::Remote(format!(
            "{}: {}",
            context,
            truncate(detail, REMOTE_DIAGNOSTIC_LIMIT)
        ))
    }
}

/// Cuts `s` at a char boundary at or below `limit` bytes.
pub fn truncate(s: &str, limit: usize) -> &str {
    if s.len() <= limit {
        return s;
    }
    let mut end = limit;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "configuration error: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "{}", msg),
            AppError::Remote(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
/// The body is always valid JSON with a human-readable `error` string.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Config(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Missing or invalid configuration: {}", msg),
                )
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Remote(msg) => {
                tracing::error!("Upstream failure: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Converts `reqwest::Error` into `AppError::Remote`.
/// Allows using `?` operator on outbound Moodle calls.
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Remote(format!("moodle transport error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::remote("moodle response decode error", &err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        let s = "héllo wörld";
        let cut = truncate(s, 2);
        assert!(cut.len() <= 2);
        assert!(s.starts_with(cut));
    }

    #[test]
    fn remote_errors_are_bounded() {
        let huge = "x".repeat(10_000);
        let err = AppError::remote("moodle HTTP 500", &huge);
        let AppError::Remote(msg) = err else {
            panic!("expected Remote variant");
        };
        assert!(msg.len() < 400);
    }
}

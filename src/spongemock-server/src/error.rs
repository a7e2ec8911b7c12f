//! Error types for the server.
//!
//! Errors render as plain text: Slack shows the body of a failed slash
//! command to the user, and the OAuth redirect is hit by a browser.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use spongemock_slack::SlackError;
use thiserror::Error;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An upstream Slack call failed; the message is Slack's own.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The server is missing configuration for this route.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Upstream(_) => "upstream_error",
            Self::Config(_) => "configuration_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Text sent as the response body.
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(msg)
            | Self::Upstream(msg)
            | Self::Config(msg)
            | Self::Internal(msg) => msg,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status_code(), self.message().to_string()).into_response()
    }
}

/// Result type for the server.
pub type AppResult<T> = Result<T, AppError>;

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Internal(error.to_string())
    }
}

impl From<SlackError> for AppError {
    fn from(error: SlackError) -> Self {
        match error {
            SlackError::InvalidPayload(msg) => Self::BadRequest(msg),
            SlackError::Config(msg) => Self::Config(msg),
            other => Self::Upstream(other.detail().to_string()),
        }
    }
}

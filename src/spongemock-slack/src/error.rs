//! Error types for Slack integration.
//!
//! Covers payload parsing, outbound HTTP failures, Slack API errors
//! and delivery failures on `response_url`.

use thiserror::Error;

/// Errors that can occur during Slack operations.
#[derive(Error, Debug)]
pub enum SlackError {
    /// Configuration error (missing or invalid config).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Authentication error (invalid code, revoked token, etc.).
    #[error("Authentication error: {0}")]
    Auth(String),

    /// API request failed.
    #[error("Slack API error: {0}")]
    Api(String),

    /// Network/HTTP error.
    #[error("Network error: {0}")]
    Network(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Operation timed out.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Invalid payload received from Slack.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// The incoming webhook did not answer `ok`.
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

impl SlackError {
    /// The bare error text, without the category prefix.
    ///
    /// For Slack API failures this is the `error` code Slack returned.
    pub fn detail(&self) -> &str {
        match self {
            Self::Config(msg)
            | Self::Auth(msg)
            | Self::Api(msg)
            | Self::Network(msg)
            | Self::Json(msg)
            | Self::Timeout(msg)
            | Self::InvalidPayload(msg)
            | Self::Delivery(msg) => msg,
        }
    }
}

impl From<reqwest::Error> for SlackError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SlackError::Timeout(err.to_string())
        } else if err.is_connect() {
            SlackError::Network(format!("Connection failed: {}", err))
        } else {
            SlackError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SlackError {
    fn from(err: serde_json::Error) -> Self {
        SlackError::Json(err.to_string())
    }
}

/// Result type for Slack operations.
pub type SlackResult<T> = std::result::Result<T, SlackError>;

/// An `ok: false` answer from the Slack Web API.
#[derive(Debug, Clone)]
pub struct SlackApiError {
    /// Error code from Slack (e.g., "invalid_code").
    pub code: String,
}

impl SlackApiError {
    /// Create a new API error. An empty code becomes `unknown_error`.
    pub fn new(code: impl Into<String>) -> Self {
        let code = code.into();
        let code = if code.is_empty() {
            "unknown_error".to_string()
        } else {
            code
        };
        Self { code }
    }

    fn is_auth_code(code: &str) -> bool {
        matches!(
            code,
            "invalid_auth"
                | "not_authed"
                | "invalid_code"
                | "code_already_used"
                | "bad_client_secret"
                | "invalid_client_id"
                | "account_inactive"
                | "token_revoked"
        )
    }
}

impl From<SlackApiError> for SlackError {
    fn from(err: SlackApiError) -> Self {
        if SlackApiError::is_auth_code(&err.code) {
            SlackError::Auth(err.code)
        } else {
            SlackError::Api(err.code)
        }
    }
}

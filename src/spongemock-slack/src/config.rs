//! Configuration for Slack integration.
//!
//! Supports loading configuration from environment variables or building it
//! in code. OAuth credentials are optional; without them only the slash
//! command endpoint is usable.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::error::{SlackError, SlackResult};

/// Default base URL of the Slack Web API.
pub const DEFAULT_API_BASE_URL: &str = "https://slack.com/api";

/// Default timeout for outbound calls.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for Slack integration.
#[derive(Clone)]
pub struct SlackConfig {
    /// OAuth client ID (optional, for OAuth flow).
    client_id: Option<String>,
    /// OAuth client secret (optional, for OAuth flow).
    client_secret: Option<SecretString>,
    /// Base URL of the Slack Web API, without trailing slash.
    api_base_url: String,
    /// Timeout applied to every outbound request.
    http_timeout: Duration,
}

impl std::fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackConfig")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("api_base_url", &self.api_base_url)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SlackConfig {
    /// Create a configuration without OAuth credentials.
    pub fn new() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    /// Set OAuth client credentials.
    pub fn with_oauth(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.client_id = Some(client_id.into());
        self.client_secret = Some(SecretString::new(client_secret.into().into()));
        self
    }

    /// Point the client at a different Slack API root.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the outbound request timeout.
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Optional variables:
    /// - `SLACK_CLIENT_ID` (or `CLIENT_ID`)
    /// - `SLACK_CLIENT_SECRET` (or `CLIENT_SECRET`)
    /// - `SLACK_API_BASE_URL`
    /// - `SLACK_HTTP_TIMEOUT_SECS`
    pub fn from_env() -> SlackResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> SlackResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |primary: &str, fallback: &str| {
            lookup(primary)
                .or_else(|| lookup(fallback))
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::new();

        match (
            get("SLACK_CLIENT_ID", "CLIENT_ID"),
            get("SLACK_CLIENT_SECRET", "CLIENT_SECRET"),
        ) {
            (Some(client_id), Some(client_secret)) => {
                config = config.with_oauth(client_id, client_secret);
            }
            (None, None) => {
                debug!("OAuth credentials not set, install flow disabled");
            }
            _ => {
                warn!("Only one of the OAuth client id/secret is set, install flow disabled");
            }
        }

        if let Some(url) = lookup("SLACK_API_BASE_URL") {
            config = config.with_api_base_url(url);
        }

        if let Some(secs) = lookup("SLACK_HTTP_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                SlackError::Config(format!("SLACK_HTTP_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            config = config.with_http_timeout(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    /// Get the OAuth client ID.
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    /// Get the OAuth client secret.
    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_ref().map(|s| s.expose_secret())
    }

    /// Check if OAuth is configured.
    pub fn has_oauth(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }

    /// Base URL of the Slack Web API.
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Full URL of a Web API method, e.g. `auth.test`.
    pub fn api_url(&self, method: &str) -> String {
        format!("{}/{}", self.api_base_url, method)
    }

    /// Outbound request timeout.
    pub fn http_timeout(&self) -> Duration {
        self.http_timeout
    }

    /// Build the HTTP client used for all outbound calls.
    pub fn http_client(&self) -> SlackResult<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.http_timeout)
            .build()
            .map_err(|e| SlackError::Config(format!("Failed to create HTTP client: {}", e)))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> SlackResult<()> {
        let parsed = url::Url::parse(&self.api_base_url).map_err(|e| {
            SlackError::Config(format!("Invalid API base URL {}: {}", self.api_base_url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SlackError::Config(format!(
                "API base URL must be http(s): {}",
                self.api_base_url
            )));
        }

        if self.http_timeout.is_zero() {
            return Err(SlackError::Config("HTTP timeout must be positive".to_string()));
        }

        if let Some(id) = &self.client_id
            && id.is_empty()
        {
            return Err(SlackError::Config("OAuth client_id is empty".to_string()));
        }

        Ok(())
    }
}

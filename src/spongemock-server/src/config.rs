//! Server configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use spongemock_slack::SlackConfig;
use spongemock_slack::config::{DEFAULT_API_BASE_URL, DEFAULT_HTTP_TIMEOUT};

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address (e.g., "0.0.0.0:3000").
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// Graceful shutdown timeout in seconds.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout: u64,

    /// Slack settings.
    #[serde(default)]
    pub slack: SlackSettings,
}

fn default_listen_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_max_body_size() -> usize {
    64 * 1024 // slash command bodies are small
}

fn default_shutdown_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            max_body_size: default_max_body_size(),
            shutdown_timeout: default_shutdown_timeout(),
            slack: SlackSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.slack_config()?;
        Ok(config)
    }

    /// Load from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("SPONGEMOCK_LISTEN_ADDR") {
            config.listen_addr = addr;
        } else if let Some(port) = lookup("PORT") {
            let port: u16 = port
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT is not a valid port: {}", port))?;
            config.listen_addr = format!("0.0.0.0:{}", port);
        }

        if let Some(size) = lookup("SPONGEMOCK_MAX_BODY_SIZE") {
            config.max_body_size = size.parse()?;
        }

        let slack = SlackConfig::from_lookup(&lookup)?;
        config.slack = SlackSettings::from(&slack);

        Ok(config)
    }

    /// Build the Slack configuration.
    pub fn slack_config(&self) -> anyhow::Result<SlackConfig> {
        let slack = &self.slack;
        let mut config = SlackConfig::new()
            .with_api_base_url(&slack.api_base_url)
            .with_http_timeout(Duration::from_secs(slack.http_timeout_secs));

        if let (Some(id), Some(secret)) = (&slack.client_id, &slack.client_secret) {
            config = config.with_oauth(id, secret);
        }

        config.validate()?;
        Ok(config)
    }

    /// Graceful shutdown timeout as a duration.
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }
}

/// Slack settings as they appear in the config file.
#[derive(Clone, Serialize, Deserialize)]
pub struct SlackSettings {
    /// OAuth client ID.
    #[serde(default)]
    pub client_id: Option<String>,

    /// OAuth client secret.
    #[serde(default, skip_serializing)]
    pub client_secret: Option<String>,

    /// Slack Web API root.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Outbound request timeout in seconds.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT.as_secs()
}

impl Default for SlackSettings {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            api_base_url: default_api_base_url(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for SlackSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackSettings")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("api_base_url", &self.api_base_url)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .finish()
    }
}

impl From<&SlackConfig> for SlackSettings {
    fn from(config: &SlackConfig) -> Self {
        Self {
            client_id: config.client_id().map(str::to_string),
            client_secret: config.client_secret().map(str::to_string),
            api_base_url: config.api_base_url().to_string(),
            http_timeout_secs: config.http_timeout().as_secs(),
        }
    }
}

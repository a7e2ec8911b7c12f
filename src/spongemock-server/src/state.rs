//! Application state shared across request handlers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use spongemock_slack::{IncomingWebhookNotifier, OAuthClient, WebhookNotifier};
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::error::AppResult;

/// Application state shared across request handlers.
///
/// Read-only after construction; requests share nothing mutable.
pub struct AppState {
    /// Server configuration.
    pub config: ServerConfig,
    /// Delivers mocked replies to `response_url`.
    pub notifier: Arc<dyn IncomingWebhookNotifier>,
    /// Install flow client, `None` when OAuth credentials are missing.
    pub oauth: Option<OAuthClient>,
    /// Start time.
    start_time: Instant,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("oauth", &self.oauth)
            .field("start_time", &self.start_time)
            .finish()
    }
}

impl AppState {
    /// Create application state from configuration.
    pub fn new(config: ServerConfig) -> AppResult<Self> {
        let slack = config.slack_config()?;
        let client = slack.http_client()?;

        let oauth = if slack.has_oauth() {
            Some(OAuthClient::new(&slack, client.clone())?)
        } else {
            warn!("OAuth client credentials not set; install flow will answer 500");
            None
        };

        info!(
            "Outbound Slack calls time out after {:?}",
            slack.http_timeout()
        );

        Ok(Self {
            config,
            notifier: Arc::new(WebhookNotifier::new(client)),
            oauth,
            start_time: Instant::now(),
        })
    }

    /// Time since the state was created.
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }
}

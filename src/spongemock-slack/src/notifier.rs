//! Delivery of replies to a command's `response_url`.

use async_trait::async_trait;
use tracing::{debug, error};

use crate::commands::ReplyPayload;
use crate::config::SlackConfig;
use crate::error::{SlackError, SlackResult};

/// Body Slack answers with when a webhook post is accepted.
const OK_BODY: &str = "ok";

/// Posts replies to Slack incoming webhooks.
#[async_trait]
pub trait IncomingWebhookNotifier: Send + Sync {
    /// Deliver `payload` to `response_url`. One attempt, no retry.
    async fn notify(&self, response_url: &str, payload: &ReplyPayload) -> SlackResult<()>;
}

/// [`IncomingWebhookNotifier`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
}

impl WebhookNotifier {
    /// Wrap an existing client. Its timeout bounds every delivery.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build a notifier with the configured timeout.
    pub fn from_config(config: &SlackConfig) -> SlackResult<Self> {
        Ok(Self::new(config.http_client()?))
    }
}

#[async_trait]
impl IncomingWebhookNotifier for WebhookNotifier {
    async fn notify(&self, response_url: &str, payload: &ReplyPayload) -> SlackResult<()> {
        debug!("Sending reply to: {}", response_url);

        let resp = self.client.post(response_url).json(payload).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if body != OK_BODY {
            error!("Non-ok response from incoming webhook: {} - {}", status, body);
            return Err(SlackError::Delivery(format!(
                "Non-ok response returned from Slack: {} - {}",
                status, body
            )));
        }

        debug!("Reply delivered");
        Ok(())
    }
}

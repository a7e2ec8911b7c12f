//! Slack slash command handling.
//!
//! Slack posts the command as `application/x-www-form-urlencoded`. The
//! mocked text is not returned in the HTTP answer; it is delivered to the
//! command's `response_url` so it shows up in the channel.

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::form_urlencoded;

use crate::error::{SlackError, SlackResult};
use crate::notifier::IncomingWebhookNotifier;

/// Slack slash command payload.
///
/// Only `text` and `response_url` drive behaviour; the other fields are
/// accepted and carried for logging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashCommandPayload {
    /// Command token (deprecated by Slack, never checked here).
    #[serde(default)]
    pub token: String,
    /// The command (e.g., "/mock").
    #[serde(default)]
    pub command: String,
    /// Text after the command.
    #[serde(default)]
    pub text: String,
    /// URL for delayed responses.
    pub response_url: String,
    /// User ID who invoked the command.
    #[serde(default)]
    pub user_id: String,
    /// Username.
    #[serde(default)]
    pub user_name: String,
    /// Team ID.
    #[serde(default)]
    pub team_id: String,
    /// Channel ID where command was invoked.
    #[serde(default)]
    pub channel_id: String,
}

impl SlashCommandPayload {
    /// Parse a form-encoded request body.
    ///
    /// Rejects bodies that are not UTF-8, that carry a broken `%` escape, or
    /// that lack an absolute `http(s)` `response_url`. A missing `text` is
    /// the empty string. Repeated keys keep their first value.
    pub fn from_form(body: &[u8]) -> SlackResult<Self> {
        let body = std::str::from_utf8(body)
            .map_err(|_| SlackError::InvalidPayload("body is not valid UTF-8".to_string()))?;
        check_percent_escapes(body)?;

        let mut payload = Self::default();
        let mut seen = Vec::new();

        for (key, value) in form_urlencoded::parse(body.as_bytes()) {
            if seen.contains(&key) {
                continue;
            }
            let slot = match key.as_ref() {
                "token" => &mut payload.token,
                "command" => &mut payload.command,
                "text" => &mut payload.text,
                "response_url" => &mut payload.response_url,
                "user_id" => &mut payload.user_id,
                "user_name" => &mut payload.user_name,
                "team_id" => &mut payload.team_id,
                "channel_id" => &mut payload.channel_id,
                _ => continue,
            };
            *slot = value.into_owned();
            seen.push(key);
        }

        payload.validate()?;
        Ok(payload)
    }

    /// Check that the payload can be answered.
    pub fn validate(&self) -> SlackResult<()> {
        if self.response_url.is_empty() {
            return Err(SlackError::InvalidPayload(
                "missing response_url".to_string(),
            ));
        }

        let url = url::Url::parse(&self.response_url).map_err(|e| {
            SlackError::InvalidPayload(format!("invalid response_url: {}", e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SlackError::InvalidPayload(format!(
                "response_url must be http(s): {}",
                self.response_url
            )));
        }

        Ok(())
    }
}

// `form_urlencoded` silently keeps broken escapes; Slack never sends them,
// so treat them as a malformed body.
fn check_percent_escapes(body: &str) -> SlackResult<()> {
    let bytes = body.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return Err(SlackError::InvalidPayload(format!(
                    "invalid percent escape at byte {}",
                    i
                )));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}

/// Response type for slash command replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum ResponseType {
    /// Only visible to the user who invoked the command.
    Ephemeral,
    /// Visible to everyone in the channel.
    #[default]
    InChannel,
}

/// Reply posted to the `response_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyPayload {
    /// Response type.
    pub response_type: ResponseType,
    /// Text content.
    pub text: String,
}

impl ReplyPayload {
    /// Reply visible to the whole channel.
    pub fn in_channel(text: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::InChannel,
            text: text.into(),
        }
    }
}

/// Build the mocked reply for a command.
pub fn mock_reply(payload: &SlashCommandPayload) -> ReplyPayload {
    ReplyPayload::in_channel(spongemock_text::mock_text(&payload.text))
}

/// Mock the command text and deliver it through `notifier`.
///
/// Returns the reply that was delivered.
pub async fn dispatch(
    notifier: &dyn IncomingWebhookNotifier,
    payload: &SlashCommandPayload,
) -> SlackResult<ReplyPayload> {
    debug!(
        command = %payload.command,
        user_id = %payload.user_id,
        channel_id = %payload.channel_id,
        "Dispatching slash command"
    );

    let reply = mock_reply(payload);
    notifier.notify(&payload.response_url, &reply).await?;
    Ok(reply)
}

//! Slack plumbing for SpongeMock.
//!
//! This crate provides:
//! - Slash command payload parsing and reply building
//! - Delivery of replies to the command's `response_url`
//! - The OAuth install flow (`oauth.access` then `auth.test`)
//!
//! # Example
//!
//! ```rust,ignore
//! use spongemock_slack::{SlackConfig, SlashCommandPayload, WebhookNotifier, dispatch};
//!
//! let config = SlackConfig::from_env()?;
//! let notifier = WebhookNotifier::from_config(&config)?;
//! let payload = SlashCommandPayload::from_form(body)?;
//! dispatch(&notifier, &payload).await?;
//! ```
//!
//! # Configuration
//!
//! Optional environment variables:
//! - `SLACK_CLIENT_ID` / `SLACK_CLIENT_SECRET` - For OAuth flow
//!   (`CLIENT_ID` / `CLIENT_SECRET` are accepted as well)
//! - `SLACK_API_BASE_URL` - Override `https://slack.com/api`
//! - `SLACK_HTTP_TIMEOUT_SECS` - Outbound request timeout (default 10)

pub mod commands;
pub mod config;
pub mod error;
pub mod notifier;
pub mod oauth;

// Re-export main types
pub use commands::{ReplyPayload, ResponseType, SlashCommandPayload, dispatch, mock_reply};
pub use config::SlackConfig;
pub use error::{SlackError, SlackResult};
pub use notifier::{IncomingWebhookNotifier, WebhookNotifier};
pub use oauth::{OAuthClient, OAuthParams, basic_auth_header};

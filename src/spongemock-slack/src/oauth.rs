//! OAuth flow for Slack workspace installation.
//!
//! Slack sends the installing user back with a `code`. The code is traded
//! for an access token at `oauth.access` (client credentials in a Basic
//! auth header), and the token is traded for the workspace URL at
//! `auth.test`. The user is then redirected to that URL.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::AUTHORIZATION;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::form_urlencoded;

use crate::config::SlackConfig;
use crate::error::{SlackApiError, SlackError, SlackResult};

/// Web API method that exchanges a code for a token.
pub const OAUTH_ACCESS_METHOD: &str = "oauth.access";

/// Web API method that reports the token's workspace.
pub const AUTH_TEST_METHOD: &str = "auth.test";

/// Parameters Slack sends back to the redirect endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OAuthParams {
    /// Authorization code from Slack.
    pub code: Option<String>,
    /// Error from Slack (if the user declined the install).
    pub error: Option<String>,
    /// State parameter, passed through untouched.
    pub state: Option<String>,
}

impl OAuthParams {
    /// Read the parameters from a form-encoded body. Unknown keys and
    /// undecodable bytes are ignored.
    pub fn from_form(body: &[u8]) -> Self {
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(body) {
            let slot = match key.as_ref() {
                "code" => &mut params.code,
                "error" => &mut params.error,
                "state" => &mut params.state,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }

    /// Non-empty authorization code, if any.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref().filter(|c| !c.is_empty())
    }

    /// Fill in fields missing here from `other`.
    pub fn or(self, other: OAuthParams) -> OAuthParams {
        OAuthParams {
            code: self.code.filter(|c| !c.is_empty()).or(other.code),
            error: self.error.or(other.error),
            state: self.state.or(other.state),
        }
    }
}

/// Response body of `oauth.access`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OAuthAccessResponse {
    /// Whether the request was successful. Absent means unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ok: Option<bool>,
    /// Access token for the installation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Scopes granted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Team name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    /// Team ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    /// Error code (if ok is false).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response body of `auth.test`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthTestResponse {
    /// Whether the token is valid.
    #[serde(default)]
    pub ok: bool,
    /// Workspace URL, e.g. `https://acme.slack.com/`.
    #[serde(default)]
    pub url: String,
    /// Error code (if ok is false).
    #[serde(default)]
    pub error: String,
    /// Team name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    /// Team ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    /// User name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// User ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Build the `Authorization` value for client credentials.
pub fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    let encoded = STANDARD.encode(format!("{}:{}", client_id, client_secret));
    format!("Basic {}", encoded)
}

/// Client for the two install-time Web API calls.
#[derive(Clone)]
pub struct OAuthClient {
    client: reqwest::Client,
    oauth_access_url: String,
    auth_test_url: String,
    authorization: SecretString,
}

impl std::fmt::Debug for OAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthClient")
            .field("oauth_access_url", &self.oauth_access_url)
            .field("auth_test_url", &self.auth_test_url)
            .field("authorization", &"[REDACTED]")
            .finish()
    }
}

impl OAuthClient {
    /// Create a client from config, sharing `client` for the calls.
    pub fn new(config: &SlackConfig, client: reqwest::Client) -> SlackResult<Self> {
        let client_id = config
            .client_id()
            .ok_or_else(|| SlackError::Config("OAuth client_id not configured".to_string()))?;

        let client_secret = config
            .client_secret()
            .ok_or_else(|| SlackError::Config("OAuth client_secret not configured".to_string()))?;

        Ok(Self {
            client,
            oauth_access_url: config.api_url(OAUTH_ACCESS_METHOD),
            auth_test_url: config.api_url(AUTH_TEST_METHOD),
            authorization: SecretString::new(
                basic_auth_header(client_id, client_secret).into(),
            ),
        })
    }

    /// Create a client with its own HTTP client.
    pub fn from_config(config: &SlackConfig) -> SlackResult<Self> {
        Self::new(config, config.http_client()?)
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> SlackResult<String> {
        debug!("Exchanging OAuth code at {}", self.oauth_access_url);

        let response = self
            .client
            .post(&self.oauth_access_url)
            .header(AUTHORIZATION, self.authorization.expose_secret())
            .form(&[("code", code)])
            .send()
            .await?;

        let body = response.text().await?;
        let access: OAuthAccessResponse = serde_json::from_str(&body)?;

        if access.ok == Some(false) {
            return Err(SlackApiError::new(access.error.unwrap_or_default()).into());
        }

        match access.access_token {
            Some(token) if !token.is_empty() => {
                info!(
                    "OAuth code exchanged for team: {} ({})",
                    access.team_name.as_deref().unwrap_or("unknown"),
                    access.team_id.as_deref().unwrap_or("unknown")
                );
                Ok(token)
            }
            _ => Err(SlackError::Auth(
                access
                    .error
                    .unwrap_or_else(|| "missing access_token".to_string()),
            )),
        }
    }

    /// Look up the workspace URL for an access token.
    pub async fn workspace_url(&self, access_token: &str) -> SlackResult<String> {
        debug!("Resolving workspace via {}", self.auth_test_url);

        let response = self
            .client
            .post(&self.auth_test_url)
            .bearer_auth(access_token)
            .send()
            .await?;

        let body = response.text().await?;
        let auth: AuthTestResponse = serde_json::from_str(&body)?;

        if !auth.ok {
            return Err(SlackApiError::new(auth.error).into());
        }
        if auth.url.is_empty() {
            return Err(SlackError::Api("auth.test returned no url".to_string()));
        }

        Ok(auth.url)
    }

    /// Run the whole install exchange and return the redirect target.
    pub async fn install_redirect(&self, code: &str) -> SlackResult<String> {
        let token = self.exchange_code(code).await?;
        self.workspace_url(&token).await
    }
}

//! Request handlers.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use spongemock_slack::{OAuthParams, SlashCommandPayload, dispatch};
use tracing::{error, info, warn};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since startup.
    pub uptime_seconds: u64,
}

/// Health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime().as_secs(),
    })
}

/// Slash command endpoint.
///
/// Answers `200` with an empty body once delivery to `response_url` has
/// been attempted. Delivery failures are only logged.
pub async fn slash_command(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<StatusCode> {
    let payload = SlashCommandPayload::from_form(&body).map_err(|e| {
        warn!("Rejecting slash command: {}", e);
        AppError::from(e)
    })?;

    match dispatch(state.notifier.as_ref(), &payload).await {
        Ok(_) => info!(
            command = %payload.command,
            channel_id = %payload.channel_id,
            "Mocked reply delivered"
        ),
        Err(e) => error!(
            command = %payload.command,
            channel_id = %payload.channel_id,
            "Failed to deliver mocked reply: {}",
            e
        ),
    }

    Ok(StatusCode::OK)
}

/// OAuth redirect endpoint.
///
/// `code` comes from the query string, or from a form body when the query
/// has none. Success redirects (`302`) to the workspace URL.
pub async fn oauth_redirect(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OAuthParams>,
    body: Bytes,
) -> AppResult<Response> {
    let params = query.or(OAuthParams::from_form(&body));

    if let Some(error) = params.error.as_deref().filter(|e| !e.is_empty()) {
        error!("OAuth error from Slack: {}", error);
        return Err(AppError::Upstream(error.to_string()));
    }

    let Some(code) = params.code() else {
        warn!("OAuth callback missing code parameter");
        return Err(AppError::BadRequest("missing code parameter".to_string()));
    };

    let oauth = state.oauth.as_ref().ok_or_else(|| {
        error!("OAuth callback hit but client credentials are not configured");
        AppError::Config("OAuth client credentials not configured".to_string())
    })?;

    let url = oauth.install_redirect(code).await.map_err(|e| {
        error!("OAuth exchange failed: {}", e);
        AppError::from(e)
    })?;

    info!("Install complete, redirecting to {}", url);
    Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response())
}

//! SpongeMock server - HTTP endpoints for the Slack slash command.
//!
//! This crate provides:
//! - `POST /slack/command` (and `POST /`): mock the command text and post it
//!   back to the channel through `response_url`
//! - `GET|POST /slack/oauth` (and `/auth`): finish a workspace install and
//!   redirect to the workspace
//! - `GET /health`: liveness and version

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use config::ServerConfig;
pub use error::{AppError, AppResult};
pub use state::AppState;

/// Run the server with the given configuration.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    run_with_shutdown(config, std::future::pending()).await
}

/// Run the server with graceful shutdown support.
pub async fn run_with_shutdown<F>(config: ServerConfig, shutdown: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = config.listen_addr.parse()?;
    let state = Arc::new(AppState::new(config)?);
    let app = create_router_with_state(state);

    info!("Starting SpongeMock server on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shutting down");
    Ok(())
}

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    create_router_with_state(Arc::new(state))
}

/// Create the application router with an Arc-wrapped state.
pub fn create_router_with_state(state: Arc<AppState>) -> Router {
    let max_body_size = state.config.max_body_size;

    Router::new()
        .route("/", post(handlers::slash_command))
        .route("/slack/command", post(handlers::slash_command))
        .route(
            "/auth",
            get(handlers::oauth_redirect).post(handlers::oauth_redirect),
        )
        .route(
            "/slack/oauth",
            get(handlers::oauth_redirect).post(handlers::oauth_redirect),
        )
        .route("/health", get(handlers::health_check))
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

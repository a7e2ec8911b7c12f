//! SpongeMock server binary.

use std::process::ExitCode;

use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use spongemock_server::{ServerConfig, run_with_shutdown};

/// SpongeMock Slack server
#[derive(Parser)]
#[command(name = "spongemock-server")]
#[command(about = "Slack slash command that replies in alternating case")]
#[command(version)]
struct Args {
    /// Configuration file path (JSON)
    #[arg(short, long)]
    config: Option<String>,

    /// Listen address, overrides config and environment
    #[arg(short, long)]
    listen: Option<String>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long)]
    json_logs: bool,
}

fn setup_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown (timeout: {}s)...", timeout_secs);
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown (timeout: {}s)...", timeout_secs);
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    setup_logging(&args.log_level, args.json_logs);

    let loaded = match &args.config {
        Some(path) => ServerConfig::load(path),
        None => ServerConfig::from_env(),
    };
    let mut config = match loaded {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(listen) = args.listen {
        config.listen_addr = listen;
    }

    info!("Press Ctrl+C to stop");

    let shutdown_timeout = config.shutdown_timeout();
    let (done_tx, done_rx) = tokio::sync::oneshot::channel::<()>();
    let shutdown = async move {
        shutdown_signal(shutdown_timeout.as_secs()).await;
        let _ = done_tx.send(());
    };

    let server = tokio::spawn(run_with_shutdown(config, shutdown));
    tokio::pin!(server);

    // Once a signal arrives, give in-flight requests the grace period.
    let result = tokio::select! {
        res = &mut server => res,
        _ = async {
            let _ = done_rx.await;
            tokio::time::sleep(shutdown_timeout).await;
        } => {
            error!("Graceful shutdown timed out, exiting");
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(Ok(())) => {
            info!("Server stopped");
            ExitCode::SUCCESS
        }
        Ok(Err(e)) => {
            error!("Server error: {}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("Server task failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

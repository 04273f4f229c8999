//! Token Memo - JWT-bearer token broker
//!
//! Serves access tokens for the configured connected app, exchanging a new
//! assertion only when no fresh token is cached.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use token_memo::api::create_router;
use token_memo::auth::HttpTransport;
use token_memo::{AppState, Config};

/// Main entry point for the token broker.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Read the private key and build the memoized token fetcher
/// 4. Create Axum router with all endpoints
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "token_memo=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting token broker");

    let config = Config::from_env();
    info!(
        "Configuration loaded: aud={}, sub={}, exp_minutes={}, port={}",
        config.aud, config.sub, config.exp_minutes, config.server_port
    );

    let key = tokio::fs::read_to_string(&config.private_key_path)
        .await
        .with_context(|| format!("reading private key from {}", config.private_key_path))?;

    let client = reqwest::Client::builder()
        .timeout(config.http_timeout())
        .build()
        .context("building HTTP client")?;
    let transport = Arc::new(HttpTransport::with_client(client));

    let state = AppState::with_transport(transport, config.credentials(key))
        .with_allowed_subjects(config.allowed_subjects.iter().cloned());
    info!(
        "Token fetcher initialized: {} extra subject(s) allowed",
        config.allowed_subjects.len()
    );

    let app = create_router(state, &config.cors_origins);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}

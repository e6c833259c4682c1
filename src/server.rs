//! HTTP server initialization and runtime setup.
//!
//! Handles store connections, Axum server lifecycle and shutdown.

use crate::api::middleware::cors;
use crate::config::Config;
use crate::infrastructure::connect_stores;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Record and counter stores (with retry), applying migrations
/// - Services and shared state
/// - Axum HTTP server with graceful shutdown on Ctrl-C / SIGTERM
///
/// Stores are disconnected once the server has stopped.
///
/// # Errors
///
/// Returns an error if:
/// - A store cannot be reached
/// - The CORS whitelist contains an invalid pattern
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let cors = cors::layer(&config.cors_whitelist).context("Invalid CORS_WHITELIST")?;

    let stores = connect_stores(&config).await?;

    let state = AppState::from_stores(&stores, &config.api_key, config.base_url.clone())
        .with_not_found_redirect(config.not_found_redirect_url.clone());

    let app = app_router(state, cors);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("DWARF Url Shortener running on host {}", config.base_url);
    tracing::info!("Listening on http://{addr}");

    let served = axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    stores.disconnect().await;
    tracing::info!("Stores disconnected");

    served.context("Server error")
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

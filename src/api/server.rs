//! HTTP server setup for the webhook endpoint.
//!
//! A single route, `POST /`, takes a JSON array of content items. The body is
//! capped at 10 MiB and requests are traced through `tower_http`. The server
//! stops accepting connections on Ctrl-C or SIGTERM and lets in-flight
//! requests finish.

use std::{net::SocketAddr, sync::Arc};

use axum::{extract::DefaultBodyLimit, routing::post, Router};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::{
    api::handlers,
    core::relay::Relay,
    domain::ports::{Storage, TransferClient},
    utils::error::Result,
};

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Creates the router with the webhook route and shared relay state.
pub fn create_router<S, T>(relay: Arc<Relay<S, T>>) -> Router
where
    S: Storage + 'static,
    T: TransferClient + 'static,
{
    Router::new()
        .route("/", post(handlers::receive_items::<S, T>))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(relay)
}

/// Binds `addr` and serves until a shutdown signal arrives.
///
/// # Errors
///
/// Fails if the port is already in use or the audit log cannot be written.
pub async fn start_server<S, T>(relay: Arc<Relay<S, T>>, addr: SocketAddr) -> Result<()>
where
    S: Storage + 'static,
    T: TransferClient + 'static,
{
    let log = relay.log().clone();
    let app = create_router(relay);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    info!("Server listening on {}", actual_addr);
    log.record(&format!("Server listening on port {}", actual_addr.port()))
        .await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped gracefully");
    Ok(())
}

/// Waits for CTRL+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received CTRL+C, starting graceful shutdown");
        },
        () = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }

    warn!("Waiting for in-flight requests to complete");
}

//! HTTP/JSON gateway over the catalog dispatcher.

pub mod error;
pub mod ndjson;
mod router;
mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::{GatewayState, CALL_TIMEOUT_HEADER};

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use crate::app::CatalogApp;

/// Serves the gateway on `addr` until ctrl-c.
pub async fn serve(app: CatalogApp, addr: SocketAddr) -> Result<()> {
    let router = build_router(GatewayState::new(app));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind catalog gateway on {}", addr))?;
    info!("Catalog gateway listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("catalog gateway exited unexpectedly")?;
    info!("Catalog gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(?err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

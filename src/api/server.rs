//! HTTP server
//!
//! Axum-based server exposing the ping endpoint.

use axum::{Router, routing::get};
use std::future::Future;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Body returned by `GET /ping`
pub const PING_RESPONSE: &str = "pong";

/// Errors raised while running the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Bind `addr` and serve until `shutdown` resolves
pub async fn start_api_server<F>(addr: SocketAddr, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    serve(listener, shutdown).await
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(%addr, "Starting ping server");

    axum::serve(listener, create_router())
        .with_graceful_shutdown(shutdown)
        .await?;

    info!(%addr, "Ping server stopped");
    Ok(())
}

/// Create the service router
pub fn create_router() -> Router {
    Router::new()
        .route("/ping", get(ping_handler))
        .layer(TraceLayer::new_for_http())
}

/// Ping endpoint
///
/// Stateless; a `&'static str` body is served as `text/plain; charset=utf-8`.
async fn ping_handler() -> &'static str {
    PING_RESPONSE
}

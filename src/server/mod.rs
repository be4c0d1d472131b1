//! HTTP boundary.
//!
//! One Axum router with a single working endpoint, `POST /convert`, plus a
//! health probe. Each request owns its upload, its temp directory and its
//! [`crate::SchematicResult`]; the only shared state is the read-only
//! conversion config.

pub mod error;
pub mod routes;

pub use error::{ApiError, ValidationError};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ConversionConfig;

/// Shared, read-only handler state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ConversionConfig>,
}

impl AppState {
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Listener settings for the service.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Request body cap. Default: 64 MiB.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            max_upload_bytes: 64 * 1024 * 1024,
        }
    }
}

/// Build the router.
pub fn app(conversion: ConversionConfig, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/convert", post(routes::convert))
        .route("/healthz", get(routes::healthz))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(conversion))
}

/// Serve `router` on an already-bound listener until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "schematic2brd listening");
    }
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}

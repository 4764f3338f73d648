//! iseven parity HTTP service.
//!
//! This service answers whether an integer is even.
//!
//! # Endpoints
//!
//! - `POST /` - Evaluate `{"number": <int>}` and return `{"is_even": <bool>}`
//! - `GET /health` - Liveness probe returning `{"status": "ok"}`
//! - `GET /metrics` - Prometheus metrics endpoint (when enabled)
//!
//! # Configuration
//!
//! - `PORT` - HTTP port (default: 8080)
//! - `NEGATIVE_NUMBERS` - `reject` (default) or `accept`
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `METRICS_ENABLED` - Set to `false` to disable metrics

#![deny(warnings)]

pub mod config;
pub mod handlers;

use std::net::SocketAddr;

use axum::{
    routing::{any, get},
    Router,
};
use thiserror::Error;
use tracing::{error, info};

use iseven_service_shared::{
    health_handler, metrics_handler, AppState, MetricsConfig, MetricsLayer, RequestContextLayer,
};

pub use config::ServiceConfig;
pub use handlers::evaluate_handler;

/// Fatal server errors, propagated out of `main`.
#[derive(Debug, Error)]
pub enum ServeError {
    /// The listening socket could not be acquired.
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// The accept loop terminated with an error.
    #[error("server terminated: {0}")]
    Serve(#[source] std::io::Error),
}

/// Build the application router.
///
/// Handlers run inside [`RequestContextLayer`], which assigns the correlation
/// ID, with [`MetricsLayer`] between them.
pub fn build_router(state: AppState, metrics: &MetricsConfig) -> Router {
    let mut router = Router::new()
        .route("/", any(evaluate_handler))
        .route("/health", any(health_handler));

    if metrics.enabled {
        router = router.route(&metrics.path, get(metrics_handler));
    }

    router
        .layer(MetricsLayer)
        .layer(RequestContextLayer)
        .with_state(state)
}

/// Bind on all interfaces at `port` and serve `router` until the process is
/// stopped.
///
/// # Errors
///
/// Returns [`ServeError::Bind`] when the port is unusable or taken, and
/// [`ServeError::Serve`] if the server loop fails.
pub async fn serve(port: &str, router: Router) -> Result<(), ServeError> {
    let address = format!("0.0.0.0:{}", port);
    info!(port = %port, address = %address, "starting server");

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| {
            error!(error = %e, port = %port, "server failed to start");
            ServeError::Bind {
                address: address.clone(),
                source: e,
            }
        })?;

    serve_listener(listener, router).await
}

/// Serve `router` on an already bound listener.
pub async fn serve_listener(
    listener: tokio::net::TcpListener,
    router: Router,
) -> Result<(), ServeError> {
    if let Ok(addr) = listener.local_addr() {
        info!(addr = %addr, "listening");
    }

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| {
        error!(error = %e, "server terminated");
        ServeError::Serve(e)
    })
}

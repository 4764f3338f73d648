//! iseven service binary.

use tracing::{info, warn};

use iseven_service::{build_router, serve, ServiceConfig};
use iseven_service_shared::{init_logging, init_metrics, AppState, LoggingConfig, MetricsConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (reads LOG_FORMAT, RUST_LOG and SERVICE_NAME from environment)
    let mut logging_config = LoggingConfig::from_env();
    if logging_config.service.is_none() {
        logging_config = logging_config.with_service(env!("CARGO_PKG_NAME"));
    }
    init_logging(&logging_config);

    let metrics_config = MetricsConfig::from_env();
    if metrics_config.enabled {
        if let Err(e) = init_metrics(&metrics_config) {
            // Metrics are optional
            warn!(error = %e, "failed to initialize metrics, continuing without metrics");
        }
    }

    let config = ServiceConfig::from_env();
    info!(
        port = %config.port,
        negative_numbers = %config.negative_policy,
        "configuration loaded"
    );

    let state = AppState::with_policy(config.negative_policy);
    let app = build_router(state, &metrics_config);

    serve(&config.port, app).await?;

    Ok(())
}

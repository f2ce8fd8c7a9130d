//! risk-service - Medical risk prediction API
//!
//! Loads the scaler and both classifiers once at startup, then serves
//! predictions, health and metrics over HTTP.

use anyhow::Result;
use inference_lib::{load_artifacts, ServiceMetrics, StructuredLogger};
use risk_service::{api, config};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting risk-service");

    // Load configuration
    let config = config::ServiceConfig::load()?;
    info!(model_dir = %config.model_dir, api_port = config.api_port, "Service configured");

    // Load artifacts once; a failed slot leaves the service up but not ready
    let artifacts = load_artifacts(&config.model_dir);

    // Initialize metrics
    let metrics = ServiceMetrics::new();
    metrics.set_artifact_status(&artifacts);

    // Initialize structured logger
    let logger = StructuredLogger::new("risk-service");
    logger.log_startup(SERVICE_VERSION, &config.model_dir, artifacts.is_ready());

    // Create shared application state
    let app_state = Arc::new(api::AppState::new(artifacts, metrics, logger.clone()));

    // Start the API server
    let api_handle = tokio::spawn(api::serve(config.api_port, app_state));

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    logger.log_shutdown("SIGINT received");
    info!("Shutting down");

    api_handle.abort();

    Ok(())
}

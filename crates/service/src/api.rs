//! HTTP API for the prediction service

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use inference_lib::{
    validate_batch, ArtifactFailure, ArtifactSet, ArtifactState, BatchPredictionResponse,
    FeatureVector, FieldViolation, HealthResponse, ItemViolations, PredictionResponse,
    ServiceError, ServiceMetrics, StructuredLogger,
};
use prometheus::{Encoder, TextEncoder};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Shared application state
///
/// Built once in main and handed to every handler; the artifact state is the
/// only shared resource and is read-only for the process lifetime.
pub struct AppState {
    pub artifacts: ArtifactState,
    pub metrics: ServiceMetrics,
    pub logger: StructuredLogger,
}

impl AppState {
    pub fn new(artifacts: ArtifactState, metrics: ServiceMetrics, logger: StructuredLogger) -> Self {
        Self {
            artifacts,
            metrics,
            logger,
        }
    }
}

/// Request failures mapped to HTTP responses
pub enum ApiError {
    NotReady(Vec<ArtifactFailure>),
    Validation(Vec<FieldViolation>),
    BatchValidation(Vec<ItemViolations>),
    Inference,
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotReady { failures } => ApiError::NotReady(failures),
            ServiceError::Validation(violations) => ApiError::Validation(violations),
            ServiceError::Inference(_) => ApiError::Inference,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotReady(failures) => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({
                    "error": "models_not_loaded",
                    "detail": "Models not loaded. Ensure artifact files exist in the model directory.",
                    "failures": failures,
                }),
            ),
            ApiError::Validation(violations) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": "validation_failed",
                    "violations": violations,
                }),
            ),
            ApiError::BatchValidation(items) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": "validation_failed",
                    "items": items,
                }),
            ),
            ApiError::Inference => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "inference_failed",
                    "detail": "Prediction error",
                }),
            ),
        };
        (status, Json(body)).into_response()
    }
}

/// Root endpoint - service description
async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Medical Risk Prediction API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/": "GET - Service description",
            "/health": "GET - Readiness and per-artifact load status",
            "/predict": "POST - Predictions from both models for one feature vector",
            "/predict/batch": "POST - Predictions for an ordered sequence of feature vectors",
            "/metrics": "GET - Prometheus metrics",
        },
    }))
}

/// Health report - 200 when the artifact set is complete, 503 otherwise
async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let report = HealthResponse::from_state(&state.artifacts);
    let status_code = if report.models_loaded {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(report))
}

/// Combined prediction for one feature vector
async fn predict(
    State(state): State<Arc<AppState>>,
    Json(features): Json<FeatureVector>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let set = state.artifacts.ready().map_err(ApiError::from)?;

    if let Err(violations) = features.validate() {
        state.metrics.inc_validation_failures();
        return Err(ApiError::Validation(violations));
    }

    let start = Instant::now();
    let response = run_models(&state, set, &features)?;
    let elapsed = start.elapsed().as_secs_f64();

    state.metrics.observe_prediction_latency(elapsed);
    state.metrics.inc_predictions();
    state.logger.log_prediction(
        response.logistic_regression.prediction,
        response.logistic_regression.probability,
        response.decision_tree.prediction,
        response.decision_tree.probability,
        elapsed,
    );

    Ok(Json(response))
}

/// Combined predictions for an ordered sequence of feature vectors.
///
/// The whole batch is validated up front and rejected as a unit if any item
/// fails; otherwise every item is predicted in input order. No partial
/// result sets are returned.
async fn predict_batch(
    State(state): State<Arc<AppState>>,
    Json(items): Json<Vec<FeatureVector>>,
) -> Result<Json<BatchPredictionResponse>, ApiError> {
    let set = state.artifacts.ready().map_err(ApiError::from)?;

    if let Err(failures) = validate_batch(&items) {
        state.metrics.inc_validation_failures();
        return Err(ApiError::BatchValidation(failures));
    }

    let mut results = Vec::with_capacity(items.len());
    for features in &items {
        let start = Instant::now();
        let response = run_models(&state, set, features)?;
        state
            .metrics
            .observe_prediction_latency(start.elapsed().as_secs_f64());
        results.push(response);
    }

    let count = results.len();
    state.metrics.add_batch_items(count as u64);

    Ok(Json(BatchPredictionResponse { results, count }))
}

fn run_models(
    state: &AppState,
    set: &ArtifactSet,
    features: &FeatureVector,
) -> Result<PredictionResponse, ApiError> {
    set.predict(features).map_err(|e| {
        state.metrics.inc_inference_errors();
        let err = ServiceError::Inference(e);
        error!(error = %err, "Model evaluation failed");
        ApiError::from(err)
    })
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder.encode(&metric_families, &mut buffer).unwrap();

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/predict", post(predict))
        .route("/predict/batch", post(predict_batch))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

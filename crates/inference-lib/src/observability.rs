//! Observability infrastructure for the prediction service
//!
//! Provides:
//! - Prometheus metrics (prediction latency, request/error counters,
//!   per-artifact load status)
//! - Structured JSON logging helpers with tracing

use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, GaugeVec, Histogram, IntCounter,
};
use std::sync::OnceLock;
use tracing::{info, warn};

use crate::predictor::{ArtifactKind, ArtifactState};

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ServiceMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct ServiceMetricsInner {
    prediction_latency_seconds: Histogram,
    predictions_total: IntCounter,
    batch_items_total: IntCounter,
    validation_failures_total: IntCounter,
    inference_errors_total: IntCounter,
    artifact_loaded: GaugeVec,
}

impl ServiceMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "risk_service_prediction_latency_seconds",
                "Time spent running both models for one feature vector",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions_total: register_int_counter!(
                "risk_service_predictions_total",
                "Total number of combined predictions served"
            )
            .expect("Failed to register predictions_total"),

            batch_items_total: register_int_counter!(
                "risk_service_batch_items_total",
                "Total number of feature vectors served through the batch endpoint"
            )
            .expect("Failed to register batch_items_total"),

            validation_failures_total: register_int_counter!(
                "risk_service_validation_failures_total",
                "Total number of requests rejected by range validation"
            )
            .expect("Failed to register validation_failures_total"),

            inference_errors_total: register_int_counter!(
                "risk_service_inference_errors_total",
                "Total number of unexpected model evaluation failures"
            )
            .expect("Failed to register inference_errors_total"),

            artifact_loaded: register_gauge_vec!(
                "risk_service_artifact_loaded",
                "Whether each startup artifact deserialized successfully (1/0)",
                &["artifact"]
            )
            .expect("Failed to register artifact_loaded"),
        }
    }
}

/// Service metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct ServiceMetrics {
    // This is just a marker - we use the global instance
    _private: (),
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ServiceMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Record a prediction latency observation
    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    /// Increment the served-predictions counter
    pub fn inc_predictions(&self) {
        self.inner().predictions_total.inc();
    }

    /// Count the items of a served batch
    pub fn add_batch_items(&self, count: u64) {
        self.inner().batch_items_total.inc_by(count);
    }

    /// Increment the validation-failures counter
    pub fn inc_validation_failures(&self) {
        self.inner().validation_failures_total.inc();
    }

    /// Increment the inference-errors counter
    pub fn inc_inference_errors(&self) {
        self.inner().inference_errors_total.inc();
    }

    /// Record per-artifact load status from the startup outcome
    pub fn set_artifact_status(&self, state: &ArtifactState) {
        for kind in [
            ArtifactKind::Scaler,
            ArtifactKind::LogisticRegression,
            ArtifactKind::DecisionTree,
        ] {
            let loaded = if state.artifact_loaded(kind) { 1.0 } else { 0.0 };
            self.inner()
                .artifact_loaded
                .with_label_values(&[kind.as_str()])
                .set(loaded);
        }
    }
}

/// Structured logger for service events
///
/// Provides consistent JSON-formatted logging for startup, shutdown and
/// served predictions.
#[derive(Clone)]
pub struct StructuredLogger {
    service_name: String,
}

impl StructuredLogger {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    /// Log service startup
    pub fn log_startup(&self, version: &str, model_dir: &str, ready: bool) {
        if ready {
            info!(
                event = "service_started",
                service = %self.service_name,
                version = %version,
                model_dir = %model_dir,
                ready = true,
                "Prediction service started"
            );
        } else {
            warn!(
                event = "service_started",
                service = %self.service_name,
                version = %version,
                model_dir = %model_dir,
                ready = false,
                "Prediction service started without a complete artifact set"
            );
        }
    }

    /// Log service shutdown
    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            service = %self.service_name,
            reason = %reason,
            "Prediction service shutting down"
        );
    }

    /// Log one served combined prediction
    pub fn log_prediction(
        &self,
        linear_label: u8,
        linear_probability: f64,
        tree_label: u8,
        tree_probability: f64,
        latency_secs: f64,
    ) {
        info!(
            event = "prediction_served",
            service = %self.service_name,
            logistic_regression_label = linear_label,
            logistic_regression_probability = linear_probability,
            decision_tree_label = tree_label,
            decision_tree_probability = tree_probability,
            latency_secs = latency_secs,
            "Served combined prediction"
        );
    }
}

//! Core library for the medical risk prediction service
//!
//! This crate provides:
//! - Feature vector model and range validation
//! - Startup artifact loading (scaler + two classifiers)
//! - Dual-model inference and response shaping
//! - Health reporting and observability

pub mod error;
pub mod features;
pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;

pub use error::ServiceError;
pub use features::{validate_batch, FeatureVector, FieldViolation, ItemViolations, NUM_FEATURES};
pub use health::{HealthResponse, ServiceStatus};
pub use models::{BatchPredictionResponse, ModelPrediction, PredictionResponse};
pub use observability::{ServiceMetrics, StructuredLogger};
pub use predictor::{
    load_artifacts, ArtifactFailure, ArtifactKind, ArtifactSet, ArtifactState, Classifier, Scaler,
};

//! Health reporting derived from the artifact state
//!
//! The report carries the overall readiness flag plus one loaded boolean per
//! artifact, so an operator can see which file failed without reading logs.

use serde::{Deserialize, Serialize};

use crate::predictor::{ArtifactKind, ArtifactState};

/// Overall service status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Healthy,
    ModelsNotLoaded,
}

/// Health response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ServiceStatus,
    pub models_loaded: bool,
    pub scaler: bool,
    pub logistic_regression: bool,
    pub decision_tree: bool,
    pub checked_at: i64,
}

impl HealthResponse {
    pub fn from_state(state: &ArtifactState) -> Self {
        let models_loaded = state.is_ready();
        Self {
            status: if models_loaded {
                ServiceStatus::Healthy
            } else {
                ServiceStatus::ModelsNotLoaded
            },
            models_loaded,
            scaler: state.artifact_loaded(ArtifactKind::Scaler),
            logistic_regression: state.artifact_loaded(ArtifactKind::LogisticRegression),
            decision_tree: state.artifact_loaded(ArtifactKind::DecisionTree),
            checked_at: chrono::Utc::now().timestamp(),
        }
    }
}

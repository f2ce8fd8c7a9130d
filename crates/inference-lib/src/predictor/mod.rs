//! Dual-model prediction engine
//!
//! Owns the three startup artifacts (scaler, logistic regression, decision
//! tree) and runs one validated feature vector through both classifiers. The
//! linear path normalizes through the scaler first; the tree consumes raw
//! values. Readiness is all-or-nothing: a partial load collapses to
//! `ArtifactState::NotReady` and no inference runs.

mod loader;
mod onnx;

pub use loader::load_artifacts;
pub use onnx::{TractClassifier, TractScaler};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::features::{FeatureVector, NUM_FEATURES};
use crate::models::{
    ModelPrediction, PredictionResponse, DECISION_TREE_NAME, LOGISTIC_REGRESSION_NAME,
};

/// Number of output classes for both classifiers
pub const NUM_CLASSES: usize = 2;

/// Normalization transform paired with the linear classifier.
///
/// Must be applied before, and only before, the linear model's decision
/// function.
pub trait Scaler: Send + Sync {
    fn transform(&self, features: &[f32; NUM_FEATURES]) -> Result<[f32; NUM_FEATURES]>;
}

/// A pre-trained binary classifier treated as an opaque decision function
pub trait Classifier: Send + Sync {
    /// Probability mass per class, summing to ~1
    fn predict_proba(&self, features: &[f32; NUM_FEATURES]) -> Result<[f32; NUM_CLASSES]>;
}

/// The three artifact slots, identified for diagnostics and health reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Scaler,
    LogisticRegression,
    DecisionTree,
}

impl ArtifactKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            ArtifactKind::Scaler => "scaler.onnx",
            ArtifactKind::LogisticRegression => "logistic_model.onnx",
            ArtifactKind::DecisionTree => "decision_tree.onnx",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Scaler => "scaler",
            ArtifactKind::LogisticRegression => "logistic_regression",
            ArtifactKind::DecisionTree => "decision_tree",
        }
    }
}

/// Why one artifact slot could not be filled at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactFailure {
    pub artifact: ArtifactKind,
    pub reason: String,
}

/// The complete, ready artifact set. Loaded once, shared read-only across
/// requests for the process lifetime.
pub struct ArtifactSet {
    scaler: Box<dyn Scaler>,
    linear: Box<dyn Classifier>,
    tree: Box<dyn Classifier>,
}

impl ArtifactSet {
    pub fn new(
        scaler: Box<dyn Scaler>,
        linear: Box<dyn Classifier>,
        tree: Box<dyn Classifier>,
    ) -> Self {
        Self {
            scaler,
            linear,
            tree,
        }
    }

    /// Run both models against one validated feature vector.
    ///
    /// The two paths only read shared immutable state and have no data
    /// dependency on each other; they run sequentially because each
    /// evaluation is a sub-millisecond in-process call.
    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResponse> {
        let raw = features.to_array();

        let scaled = self
            .scaler
            .transform(&raw)
            .context("scaler transform failed")?;
        let linear_probs = self
            .linear
            .predict_proba(&scaled)
            .context("logistic regression inference failed")?;
        let tree_probs = self
            .tree
            .predict_proba(&raw)
            .context("decision tree inference failed")?;

        Ok(PredictionResponse {
            logistic_regression: label_prediction(&linear_probs, LOGISTIC_REGRESSION_NAME)?,
            decision_tree: label_prediction(&tree_probs, DECISION_TREE_NAME)?,
            input_features: features.clone(),
        })
    }
}

/// Pick the winning class and report the probability mass assigned to it
fn label_prediction(probs: &[f32; NUM_CLASSES], model_name: &str) -> Result<ModelPrediction> {
    if probs.iter().any(|p| !p.is_finite()) {
        anyhow::bail!("{} produced a non-finite probability", model_name);
    }
    let prediction: u8 = if probs[1] > probs[0] { 1 } else { 0 };
    let probability = probs[prediction as usize] as f64;
    Ok(ModelPrediction::new(prediction, probability, model_name))
}

/// Startup outcome of the artifact loader.
///
/// Modeled as a single tagged state so a partially-loaded set is
/// unrepresentable: either every slot is filled and inference may run, or
/// the failures are recorded and every inference endpoint refuses work.
pub enum ArtifactState {
    Ready(ArtifactSet),
    NotReady { failures: Vec<ArtifactFailure> },
}

impl ArtifactState {
    pub fn is_ready(&self) -> bool {
        matches!(self, ArtifactState::Ready(_))
    }

    /// Whether one slot loaded successfully at startup. Slots that loaded
    /// alongside a failed one are still reported as loaded for health
    /// purposes, even though they are never used for inference.
    pub fn artifact_loaded(&self, kind: ArtifactKind) -> bool {
        match self {
            ArtifactState::Ready(_) => true,
            ArtifactState::NotReady { failures } => {
                !failures.iter().any(|f| f.artifact == kind)
            }
        }
    }

    /// Borrow the ready set, or surface the readiness error for the handler
    pub fn ready(&self) -> Result<&ArtifactSet, ServiceError> {
        match self {
            ArtifactState::Ready(set) => Ok(set),
            ArtifactState::NotReady { failures } => Err(ServiceError::NotReady {
                failures: failures.clone(),
            }),
        }
    }
}

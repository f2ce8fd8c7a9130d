//! Wire types for the prediction API

use serde::{Deserialize, Serialize};

use crate::features::FeatureVector;

/// Display names reported alongside each model's prediction
pub const LOGISTIC_REGRESSION_NAME: &str = "Logistic Regression";
pub const DECISION_TREE_NAME: &str = "Decision Tree";

/// Scale factor for rounding probabilities to 4 decimal places
const PROBABILITY_SCALE: f64 = 10_000.0;

/// One model's prediction for one feature vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPrediction {
    /// Predicted class (0 or 1)
    pub prediction: u8,
    /// Probability mass the model assigns to the predicted class
    pub probability: f64,
    pub model_name: String,
}

impl ModelPrediction {
    /// Build a prediction, rounding the probability to 4 decimal places for
    /// presentation stability. Internal computation keeps full precision.
    pub fn new(prediction: u8, probability: f64, model_name: &str) -> Self {
        Self {
            prediction,
            probability: (probability * PROBABILITY_SCALE).round() / PROBABILITY_SCALE,
            model_name: model_name.to_string(),
        }
    }
}

/// Combined response: one prediction per model plus the validated input echo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub logistic_regression: ModelPrediction,
    pub decision_tree: ModelPrediction,
    pub input_features: FeatureVector,
}

/// Batch response, preserving input order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPredictionResponse {
    pub results: Vec<PredictionResponse>,
    pub count: usize,
}

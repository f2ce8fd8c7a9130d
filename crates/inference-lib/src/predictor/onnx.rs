//! ONNX-backed artifacts using tract
//!
//! Each serialized artifact is an ONNX graph produced by the external
//! training pipeline: the scaler maps a `[1,8]` raw feature tensor to a
//! `[1,8]` normalized one, and each classifier maps `[1,8]` features to a
//! single `[1,2]` float32 probability output (labels dropped, zipmap
//! disabled at export time).

use anyhow::{Context, Result};
use tract_onnx::prelude::*;

use super::{Classifier, Scaler, NUM_CLASSES};
use crate::features::NUM_FEATURES;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Parse, optimize and plan an ONNX graph with a fixed `[1, 8]` input
fn load_plan(model_bytes: &[u8]) -> Result<TractModel> {
    tract_onnx::onnx()
        .model_for_read(&mut std::io::Cursor::new(model_bytes))
        .context("Failed to parse ONNX model")?
        .with_input_fact(0, f32::fact([1, NUM_FEATURES]).into())
        .context("Failed to set input shape")?
        .into_optimized()
        .context("Failed to optimize model")?
        .into_runnable()
        .context("Failed to create runnable model")
}

fn features_to_tensor(features: &[f32; NUM_FEATURES]) -> Result<Tensor> {
    let array = tract_ndarray::Array2::from_shape_vec((1, NUM_FEATURES), features.to_vec())
        .context("Failed to shape input tensor")?;
    Ok(array.into())
}

fn run_plan(plan: &TractModel, features: &[f32; NUM_FEATURES]) -> Result<Vec<f32>> {
    let input = features_to_tensor(features)?;
    let result = plan.run(tvec!(input.into()))?;
    let output = result.get(0).context("No output from model")?;
    let view = output.to_array_view::<f32>()?;
    Ok(view.iter().copied().collect())
}

/// Feature scaler backed by a tract plan
pub struct TractScaler {
    plan: TractModel,
}

impl TractScaler {
    pub fn from_bytes(model_bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            plan: load_plan(model_bytes)?,
        })
    }
}

impl Scaler for TractScaler {
    fn transform(&self, features: &[f32; NUM_FEATURES]) -> Result<[f32; NUM_FEATURES]> {
        let values = run_plan(&self.plan, features)?;
        let scaled: [f32; NUM_FEATURES] = values
            .try_into()
            .map_err(|v: Vec<f32>| {
                anyhow::anyhow!("Scaler output has {} values, expected {}", v.len(), NUM_FEATURES)
            })?;
        Ok(scaled)
    }
}

/// Binary classifier backed by a tract plan
pub struct TractClassifier {
    plan: TractModel,
}

impl TractClassifier {
    pub fn from_bytes(model_bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            plan: load_plan(model_bytes)?,
        })
    }
}

impl Classifier for TractClassifier {
    fn predict_proba(&self, features: &[f32; NUM_FEATURES]) -> Result<[f32; NUM_CLASSES]> {
        let values = run_plan(&self.plan, features)?;
        let probs: [f32; NUM_CLASSES] = values
            .try_into()
            .map_err(|v: Vec<f32>| {
                anyhow::anyhow!("Classifier output has {} values, expected {}", v.len(), NUM_CLASSES)
            })?;
        Ok(probs)
    }
}

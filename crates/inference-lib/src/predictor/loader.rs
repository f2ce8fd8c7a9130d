//! Startup artifact loading
//!
//! Each of the three slots is attempted independently so a single missing
//! file still yields a complete diagnostic picture. Failures never abort the
//! process; the service starts and answers health queries either way. There
//! is no retry and no hot-reload: whatever loads here is fixed for the
//! process lifetime.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::onnx::{TractClassifier, TractScaler};
use super::{ArtifactFailure, ArtifactKind, ArtifactSet, ArtifactState};

fn read_artifact(model_dir: &Path, kind: ArtifactKind) -> Result<Vec<u8>> {
    let path = model_dir.join(kind.file_name());
    std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))
}

fn load_scaler(model_dir: &Path) -> Result<TractScaler> {
    let bytes = read_artifact(model_dir, ArtifactKind::Scaler)?;
    TractScaler::from_bytes(&bytes)
}

fn load_classifier(model_dir: &Path, kind: ArtifactKind) -> Result<TractClassifier> {
    let bytes = read_artifact(model_dir, kind)?;
    TractClassifier::from_bytes(&bytes)
}

/// Attempt to load all three artifacts from `model_dir`.
///
/// Returns `Ready` only when every slot deserialized successfully; any
/// missing or corrupt file collapses the whole set to `NotReady`, since the
/// linear path cannot run without its paired scaler and the API never serves
/// partial inference.
pub fn load_artifacts(model_dir: impl AsRef<Path>) -> ArtifactState {
    let model_dir = model_dir.as_ref();
    let mut failures = Vec::new();

    let scaler = load_scaler(model_dir)
        .map_err(|e| record_failure(&mut failures, ArtifactKind::Scaler, e))
        .ok();
    let linear = load_classifier(model_dir, ArtifactKind::LogisticRegression)
        .map_err(|e| record_failure(&mut failures, ArtifactKind::LogisticRegression, e))
        .ok();
    let tree = load_classifier(model_dir, ArtifactKind::DecisionTree)
        .map_err(|e| record_failure(&mut failures, ArtifactKind::DecisionTree, e))
        .ok();

    match (scaler, linear, tree) {
        (Some(scaler), Some(linear), Some(tree)) => {
            info!(model_dir = %model_dir.display(), "All artifacts loaded");
            ArtifactState::Ready(ArtifactSet::new(
                Box::new(scaler),
                Box::new(linear),
                Box::new(tree),
            ))
        }
        _ => ArtifactState::NotReady { failures },
    }
}

fn record_failure(failures: &mut Vec<ArtifactFailure>, kind: ArtifactKind, err: anyhow::Error) {
    let reason = format!("{:#}", err);
    warn!(
        artifact = kind.as_str(),
        error = %reason,
        "Failed to load artifact"
    );
    failures.push(ArtifactFailure {
        artifact: kind,
        reason,
    });
}

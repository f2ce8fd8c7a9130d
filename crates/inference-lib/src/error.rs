//! Service error taxonomy
//!
//! Three failure classes cross the request boundary: the artifact set never
//! finished loading (operator-level, 503), the input failed range validation
//! (caller-level, 422), or a model misbehaved during inference (500). The
//! HTTP mapping lives with the handlers; this module only names the cases.

use thiserror::Error;

use crate::features::FieldViolation;
use crate::predictor::ArtifactFailure;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// One or more artifacts failed to load at startup. Requires operator
    /// intervention; inference endpoints refuse work until redeploy.
    #[error("models not loaded")]
    NotReady { failures: Vec<ArtifactFailure> },

    /// One or more input fields are outside their declared range.
    #[error("input validation failed")]
    Validation(Vec<FieldViolation>),

    /// A model's decision function failed unexpectedly. The cause is logged
    /// server-side; callers see a generic failure.
    #[error("inference failed: {0:#}")]
    Inference(anyhow::Error),
}

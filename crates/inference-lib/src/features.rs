//! Patient feature vector and range validation
//!
//! The eight fields and their inclusive bounds mirror the dataset the
//! classifiers were trained on. Validation collects every violation so a
//! caller can fix all fields in one round trip.

use serde::{Deserialize, Serialize};

/// Number of input features expected by both models
pub const NUM_FEATURES: usize = 8;

/// Inclusive bounds for each feature, in canonical model input order
pub const FIELD_RANGES: [(&str, f64, f64); NUM_FEATURES] = [
    ("age", 0.0, 120.0),
    ("glucose", 0.0, 500.0),
    ("bp", 0.0, 200.0),
    ("skin_thickness", 0.0, 100.0),
    ("insulin", 0.0, 1000.0),
    ("bmi", 0.0, 100.0),
    ("diabetes_pedigree", 0.0, 3.0),
    ("pregnancies", 0.0, 20.0),
];

/// One patient's feature vector, immutable for the duration of a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureVector {
    pub age: f64,
    pub glucose: f64,
    pub bp: f64,
    pub skin_thickness: f64,
    pub insulin: f64,
    pub bmi: f64,
    pub diabetes_pedigree: f64,
    pub pregnancies: f64,
}

/// A single field that failed range validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

/// Validation failures for one item of a batch request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemViolations {
    pub index: usize,
    pub violations: Vec<FieldViolation>,
}

impl FeatureVector {
    /// Feature values in canonical model input order
    pub fn to_array(&self) -> [f32; NUM_FEATURES] {
        [
            self.age as f32,
            self.glucose as f32,
            self.bp as f32,
            self.skin_thickness as f32,
            self.insulin as f32,
            self.bmi as f32,
            self.diabetes_pedigree as f32,
            self.pregnancies as f32,
        ]
    }

    fn field_values(&self) -> [f64; NUM_FEATURES] {
        [
            self.age,
            self.glucose,
            self.bp,
            self.skin_thickness,
            self.insulin,
            self.bmi,
            self.diabetes_pedigree,
            self.pregnancies,
        ]
    }

    /// Check every field against its inclusive range, reporting all
    /// violations rather than stopping at the first. Non-finite values
    /// (NaN, infinity) never satisfy the bounds and are rejected.
    pub fn validate(&self) -> Result<(), Vec<FieldViolation>> {
        let values = self.field_values();
        let violations: Vec<FieldViolation> = FIELD_RANGES
            .iter()
            .zip(values.iter())
            .filter(|((_, min, max), value)| !(**value >= *min && **value <= *max))
            .map(|((field, min, max), value)| FieldViolation {
                field: (*field).to_string(),
                value: *value,
                min: *min,
                max: *max,
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Validate every item of a batch, preserving input order in the report.
/// An empty report means every item passed.
pub fn validate_batch(items: &[FeatureVector]) -> Result<(), Vec<ItemViolations>> {
    let failures: Vec<ItemViolations> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            item.validate().err().map(|violations| ItemViolations {
                index,
                violations,
            })
        })
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(failures)
    }
}

//! Patient Record & Feature Frame
//!
//! A `PatientRecord` is rebuilt from the form on every request and turned
//! into a one-row `FeatureFrame` with the fixed column layout.

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::constants::{AGE_DECIMALS, BIOMARKER_DECIMALS, FEATURE_COLUMNS};
use crate::error::{ModelError, ModelResult};

// ============================================================================
// PATIENT RECORD
// ============================================================================

/// Three clinical values entered by the user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PatientRecord {
    /// Age in whole years
    pub age: f64,
    /// CK-MB concentration (ng/mL)
    pub ck_mb: f64,
    /// Troponin concentration (ng/mL)
    pub troponin: f64,
}

impl PatientRecord {
    /// Validate bounds and round each value to its input precision.
    ///
    /// Zero is accepted for every field; there is no upper bound.
    pub fn new(age: f64, ck_mb: f64, troponin: f64) -> ModelResult<Self> {
        Ok(Self {
            age: round_to(check_bound("age", age)?, AGE_DECIMALS),
            ck_mb: round_to(check_bound("ck_mb", ck_mb)?, BIOMARKER_DECIMALS),
            troponin: round_to(check_bound("troponin", troponin)?, BIOMARKER_DECIMALS),
        })
    }

    /// Values in `FEATURE_COLUMNS` order
    pub fn values(&self) -> [f64; 3] {
        [self.age, self.ck_mb, self.troponin]
    }

    /// Single named row with columns `["Age", "CK-MB", "Troponin"]`
    pub fn to_frame(&self) -> FeatureFrame {
        FeatureFrame {
            values: Array1::from(self.values().to_vec()),
            columns: Some(FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect()),
        }
    }
}

fn check_bound(field: &'static str, value: f64) -> ModelResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ModelError::InvalidInput { field, value })
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let shifted = value * factor;
    // past 2^53 there are no fractional digits left to round
    if !shifted.is_finite() {
        return value;
    }
    // -0.0 shows up as "-0" in the form
    (shifted.round() / factor).abs()
}

// ============================================================================
// FEATURE FRAME
// ============================================================================

/// One row of features, with or without column names
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFrame {
    values: Array1<f64>,
    columns: Option<Vec<String>>,
}

impl FeatureFrame {
    /// Row without column names
    pub fn bare(values: Array1<f64>) -> Self {
        Self { values, columns: None }
    }

    /// Row with column names; the name count must match the width
    pub fn named(values: Array1<f64>, columns: Vec<String>) -> ModelResult<Self> {
        if columns.len() != values.len() {
            return Err(ModelError::ShapeMismatch {
                context: "column names".to_string(),
                expected: values.len(),
                found: columns.len(),
            });
        }
        Ok(Self { values, columns: Some(columns) })
    }

    /// Same values under a new set of column names
    pub fn with_columns(&self, columns: &[String]) -> ModelResult<Self> {
        Self::named(self.values.clone(), columns.to_vec())
    }

    pub fn width(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    pub fn columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.values.to_vec()
    }
}

//! Cardio Predict Core
//!
//! Everything between the three clinical inputs and the rendered results:
//!
//! ```text
//!  PatientRecord ──► FeatureFrame ──► Scaler ──► scaled row
//!                                                  │
//!                  ┌───────────────────────────────┘
//!                  ▼
//!    six classifiers (fixed order) ──► PredictionReport ──► comparison chart
//! ```
//!
//! Artifacts are JSON exports of the trained scaler and models, loaded
//! once through [`ArtifactSet::load`] and never mutated afterwards.

pub mod chart;
pub mod constants;
pub mod error;
pub mod inference;
pub mod model;
pub mod record;

pub use chart::render_comparison_chart;
pub use error::{ArtifactError, ModelError, ModelResult};
pub use inference::{predict_all, ModelPrediction, ModelProbability, PredictionReport, Verdict};
pub use model::{ArtifactSet, Classifier, ClassifierModel, Scaler};
pub use record::{FeatureFrame, PatientRecord};

//! Integration Tests for the inference pass
//!
//! Runs the loop over the sample artifacts and over recording stubs.

use std::cell::RefCell;

use ndarray::Array1;

use super::*;
use crate::constants::MODEL_REGISTRY;
use crate::error::ModelError;
use crate::model::ArtifactSet;

fn sample_artifacts() -> ArtifactSet {
    ArtifactSet::load(concat!(env!("CARGO_MANIFEST_DIR"), "/../artifacts")).unwrap()
}

/// Stub model that records every row it is given
struct Recorder {
    label: i64,
    proba: Option<f64>,
    names: Option<Vec<String>>,
    fail: bool,
    seen: RefCell<Vec<(Vec<f64>, Option<Vec<String>>)>>,
}

impl Recorder {
    fn new(label: i64, proba: Option<f64>) -> Self {
        Self { label, proba, names: None, fail: false, seen: RefCell::new(Vec::new()) }
    }

    fn named(mut self, names: &[&str]) -> Self {
        self.names = Some(names.iter().map(|n| n.to_string()).collect());
        self
    }

    fn failing() -> Self {
        Self { fail: true, ..Self::new(0, Some(0.5)) }
    }

    fn calls(&self) -> usize {
        self.seen.borrow().len()
    }
}

impl Classifier for Recorder {
    fn kind(&self) -> &'static str {
        "recorder"
    }

    fn classes(&self) -> &[i64] {
        &[0, 1]
    }

    fn n_features_in(&self) -> usize {
        3
    }

    fn feature_names_in(&self) -> Option<&[String]> {
        self.names.as_deref()
    }

    fn supports_proba(&self) -> bool {
        self.proba.is_some()
    }

    fn proba_unchecked(&self, _x: &FeatureFrame) -> ModelResult<Array1<f64>> {
        let p = self.proba.unwrap_or(0.0);
        Ok(Array1::from(vec![1.0 - p, p]))
    }

    fn predict(&self, x: &FeatureFrame) -> ModelResult<i64> {
        self.check_input(x)?;
        if self.fail {
            return Err(ModelError::invalid("boom"));
        }
        self.seen
            .borrow_mut()
            .push((x.to_vec(), x.columns().map(<[String]>::to_vec)));
        Ok(self.label)
    }
}

fn scaled_row() -> FeatureFrame {
    FeatureFrame::bare(Array1::from(vec![-0.82, -0.27, -0.29]))
}

#[test]
fn test_end_to_end_sample_artifacts() {
    let artifacts = sample_artifacts();
    let record = PatientRecord::new(45.0, 2.5, 0.02).unwrap();

    let frame = record.to_frame();
    assert_eq!(frame.to_vec(), vec![45.0, 2.5, 0.02]);
    assert_eq!(frame.columns().unwrap(), ["Age", "CK-MB", "Troponin"]);

    let (scaled, report) = run(&artifacts, &record).unwrap();
    assert_eq!(scaled.width(), 3);

    let order: Vec<&str> = report.predictions.iter().map(|p| p.model.as_str()).collect();
    assert_eq!(
        order,
        [
            "Regresión Logística",
            "KNN",
            "Naive Bayes",
            "SVM",
            "Red Neuronal (MLP)",
            "Árbol de Decisión"
        ]
    );

    // the linear SVM is label-only
    assert_eq!(report.probabilities.len(), 5);
    assert!(report.probabilities.iter().all(|p| p.model != "SVM"));
    assert!(report.probabilities.iter().all(|p| (0.0..=1.0).contains(&p.probability)));

    // normal biomarkers: every sample model says "low"
    assert!(report.predictions.iter().all(|p| p.label == 0));
    assert!(report.predictions.iter().all(|p| p.verdict == Verdict::Low));
}

#[test]
fn test_elevated_biomarkers_flagged() {
    let artifacts = sample_artifacts();
    let record = PatientRecord::new(68.0, 80.0, 4.5).unwrap();
    let (_, report) = run(&artifacts, &record).unwrap();
    assert!(report.predictions.iter().all(|p| p.verdict == Verdict::High));
}

#[test]
fn test_zero_inputs_produce_every_result() {
    let artifacts = sample_artifacts();
    let record = PatientRecord::new(0.0, 0.0, 0.0).unwrap();
    let (_, report) = run(&artifacts, &record).unwrap();
    assert_eq!(report.predictions.len(), MODEL_REGISTRY.len());
}

#[test]
fn test_same_scaled_row_for_every_model() {
    let a = Recorder::new(0, Some(0.1)).named(&["Age", "CK-MB", "Troponin"]);
    let b = Recorder::new(1, Some(0.9));
    let c = Recorder::new(0, None).named(&["f0", "f1", "f2"]);
    let models: Vec<(&str, &dyn Classifier)> = vec![("a", &a), ("b", &b), ("c", &c)];

    let scaled = scaled_row();
    predict_all(models, &scaled).unwrap();

    let expected = scaled.to_vec();
    for rec in [&a, &b, &c] {
        let seen = rec.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, expected);
    }

    // each model sees its own names, or none
    assert_eq!(a.seen.borrow()[0].1.as_deref().unwrap(), ["Age", "CK-MB", "Troponin"]);
    assert!(b.seen.borrow()[0].1.is_none());
    assert_eq!(c.seen.borrow()[0].1.as_deref().unwrap(), ["f0", "f1", "f2"]);
}

#[test]
fn test_label_only_model_skipped_from_probabilities() {
    let a = Recorder::new(1, Some(0.7));
    let b = Recorder::new(0, None);
    let models: Vec<(&str, &dyn Classifier)> = vec![("with", &a), ("without", &b)];

    let report = predict_all(models, &scaled_row()).unwrap();

    assert_eq!(report.predictions.len(), 2);
    assert_eq!(report.predictions[1].probability, None);
    assert_eq!(report.predictions[1].probability_text(), "No disponible probabilidad.");
    assert_eq!(
        report.probabilities,
        vec![ModelProbability { model: "with".to_string(), probability: 0.7 }]
    );
}

#[test]
fn test_no_probabilities_gives_empty_map() {
    let a = Recorder::new(0, None);
    let b = Recorder::new(1, None);
    let models: Vec<(&str, &dyn Classifier)> = vec![("a", &a), ("b", &b)];

    let report = predict_all(models, &scaled_row()).unwrap();
    assert!(report.probabilities.is_empty());
}

#[test]
fn test_failure_stops_later_models() {
    let first = Recorder::new(0, Some(0.2));
    let broken = Recorder::failing();
    let last = Recorder::new(0, Some(0.2));
    let models: Vec<(&str, &dyn Classifier)> =
        vec![("first", &first), ("broken", &broken), ("last", &last)];

    assert!(predict_all(models, &scaled_row()).is_err());
    assert_eq!(first.calls(), 1);
    assert_eq!(last.calls(), 0);
}

#[test]
fn test_wrong_length_feature_names_abort() {
    let bad = Recorder::new(0, Some(0.5)).named(&["Age", "CK-MB"]);
    let after = Recorder::new(0, Some(0.5));
    let models: Vec<(&str, &dyn Classifier)> = vec![("bad", &bad), ("after", &after)];

    assert!(matches!(
        predict_all(models, &scaled_row()),
        Err(ModelError::ShapeMismatch { expected: 3, found: 2, .. })
    ));
    assert_eq!(after.calls(), 0);
}

#[test]
fn test_relabelling_keeps_numeric_results() {
    let artifacts = sample_artifacts();
    let record = PatientRecord::new(52.0, 7.1234, 0.0891).unwrap();
    let scaled = preprocess(&artifacts, &record).unwrap();

    for (name, model) in artifacts.models() {
        let named = prepare_input(model, &scaled).unwrap();
        assert_eq!(model.predict(&named).unwrap(), model.predict(&scaled).unwrap(), "{name}");
        if model.supports_proba() {
            assert_eq!(
                model.predict_proba(&named).unwrap(),
                model.predict_proba(&scaled).unwrap(),
                "{name}"
            );
        }
    }
}

#[test]
fn test_verdict_banners() {
    assert_eq!(Verdict::from_label(1), Verdict::High);
    assert_eq!(Verdict::from_label(0), Verdict::Low);
    assert_eq!(Verdict::from_label(2), Verdict::Unknown);

    assert_eq!(Verdict::High.banner("KNN").unwrap(), "🔴 KNN: ¡Alta probabilidad de infarto!");
    assert_eq!(Verdict::Low.banner("KNN").unwrap(), "🟢 KNN: Baja probabilidad de infarto.");
    assert!(Verdict::Unknown.banner("KNN").is_none());
}

#[test]
fn test_percent_format() {
    assert_eq!(format_percent(0.1234, 2), "12.34%");
    assert_eq!(format_percent(1.0, 1), "100.0%");
    assert_eq!(format_percent(0.0, 2), "0.00%");
}

#[test]
fn test_huge_biomarker_rejected_before_results() {
    let artifacts = sample_artifacts();
    let record = PatientRecord::new(0.0, 1e306, 0.0).unwrap();
    assert!(record.ck_mb.is_finite());
    assert!(matches!(run(&artifacts, &record), Err(ModelError::NonFinite { .. })));
}

#[test]
fn test_nan_probability_stops_the_pass() {
    let first = Recorder::new(0, Some(f64::NAN));
    let after = Recorder::new(0, Some(0.2));
    let models: Vec<(&str, &dyn Classifier)> = vec![("nan", &first), ("after", &after)];

    assert!(matches!(
        predict_all(models, &scaled_row()),
        Err(ModelError::NonFinite { context }) if context == "nan"
    ));
    assert_eq!(after.calls(), 0);
}

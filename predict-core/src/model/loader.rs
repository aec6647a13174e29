//! Artifact Loader
//!
//! Reads the scaler and the six classifiers from one directory at startup.
//! There is no partial mode: the first missing or malformed file fails the
//! whole load.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::classifier::{Classifier, ClassifierModel};
use super::scaler::Scaler;
use crate::constants::{MODEL_REGISTRY, SCALER_FILE};
use crate::error::ArtifactError;

/// A classifier with its display name
#[derive(Debug, Clone)]
pub struct NamedModel {
    pub name: String,
    pub model: ClassifierModel,
}

/// Capabilities of one loaded model, for status endpoints and logs
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub name: String,
    pub kind: &'static str,
    pub n_features_in: usize,
    pub supports_proba: bool,
    pub feature_names_in: Option<Vec<String>>,
}

/// Scaler plus classifiers, immutable after load
#[derive(Debug, Clone)]
pub struct ArtifactSet {
    scaler: Scaler,
    models: Vec<NamedModel>,
}

impl ArtifactSet {
    /// Load every registered artifact from `dir`
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let dir = dir.as_ref();
        log::info!("Loading artifacts from {}", dir.display());

        let scaler: Scaler = read_artifact(&dir.join(SCALER_FILE))?;
        log::info!(
            "Loaded {} scaler ({} features, names: {})",
            scaler.kind(),
            scaler.n_features_in(),
            scaler.feature_names_in().is_some()
        );

        let mut models = Vec::with_capacity(MODEL_REGISTRY.len());
        for (name, file) in MODEL_REGISTRY {
            let model: ClassifierModel = read_artifact(&dir.join(file))?;
            let clf = model.as_classifier();
            log::info!(
                "Loaded {} from {} (kind: {}, proba: {}, names: {})",
                name,
                file,
                clf.kind(),
                clf.supports_proba(),
                clf.feature_names_in().is_some()
            );
            if clf.n_features_in() != scaler.n_features_in() {
                log::warn!(
                    "{} expects {} features but the scaler produces {}",
                    name,
                    clf.n_features_in(),
                    scaler.n_features_in()
                );
            }
            models.push(NamedModel { name: name.to_string(), model });
        }

        Ok(Self { scaler, models })
    }

    /// Assemble a set from already decoded parts
    pub fn from_parts(scaler: Scaler, models: Vec<NamedModel>) -> Self {
        Self { scaler, models }
    }

    pub fn scaler(&self) -> &Scaler {
        &self.scaler
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Classifiers in inference order
    pub fn models(&self) -> impl Iterator<Item = (&str, &dyn Classifier)> + '_ {
        self.models
            .iter()
            .map(|m| (m.name.as_str(), m.model.as_classifier()))
    }

    pub fn summaries(&self) -> Vec<ModelSummary> {
        self.models()
            .map(|(name, clf)| ModelSummary {
                name: name.to_string(),
                kind: clf.kind(),
                n_features_in: clf.n_features_in(),
                supports_proba: clf.supports_proba(),
                feature_names_in: clf.feature_names_in().map(<[String]>::to_vec),
            })
            .collect()
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let bytes = fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../artifacts")
    }

    fn copy_samples(to: &Path) {
        for entry in fs::read_dir(sample_dir()).unwrap() {
            let entry = entry.unwrap();
            fs::copy(entry.path(), to.join(entry.file_name())).unwrap();
        }
    }

    #[test]
    fn test_load_sample_artifacts() {
        let set = ArtifactSet::load(sample_dir()).unwrap();
        assert_eq!(set.len(), 6);

        let names: Vec<&str> = set.models().map(|(name, _)| name).collect();
        let expected: Vec<&str> = MODEL_REGISTRY.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, expected);

        let summaries = set.summaries();
        assert_eq!(summaries.iter().filter(|s| s.supports_proba).count(), 5);
        assert!(!summaries[3].supports_proba, "linear SVM is label-only");
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        copy_samples(dir.path());
        fs::remove_file(dir.path().join("knn_model.json")).unwrap();

        match ArtifactSet::load(dir.path()) {
            Err(ArtifactError::Io { path, .. }) => assert!(path.ends_with("knn_model.json")),
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn test_corrupt_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        copy_samples(dir.path());
        fs::write(dir.path().join(SCALER_FILE), b"\x80\x04not json").unwrap();

        assert!(matches!(
            ArtifactSet::load(dir.path()),
            Err(ArtifactError::Decode { .. })
        ));
    }

    #[test]
    fn test_invalid_shapes_are_fatal() {
        let dir = tempfile::tempdir().unwrap();
        copy_samples(dir.path());
        fs::write(
            dir.path().join("logreg_model.json"),
            r#"{"kind": "logistic_regression", "coef": [[1.0, 2.0]], "intercept": [0.0, 1.0], "classes": [0, 1]}"#,
        )
        .unwrap();

        assert!(matches!(
            ArtifactSet::load(dir.path()),
            Err(ArtifactError::Decode { .. })
        ));
    }
}

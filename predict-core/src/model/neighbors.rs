//! k-nearest neighbours classifier

use ndarray::{Array1, Array2, ArrayView1};
use serde::Deserialize;

use super::classifier::Classifier;
use super::{check_binary_classes, check_feature_names, matrix_from_rows};
use crate::error::{ModelError, ModelResult};
use crate::record::FeatureFrame;

/// Neighbour vote weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Weights {
    #[default]
    Uniform,
    Distance,
}

fn default_p() -> f64 {
    2.0
}

#[derive(Debug, Deserialize)]
struct KNeighborsArtifact {
    fit_x: Vec<Vec<f64>>,
    /// Index into `classes` for every training row
    fit_y: Vec<usize>,
    n_neighbors: usize,
    #[serde(default)]
    weights: Weights,
    #[serde(default = "default_p")]
    p: f64,
    classes: Vec<i64>,
    #[serde(default)]
    feature_names_in: Option<Vec<String>>,
}

/// Brute-force k-NN over the stored training set (Minkowski distance)
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "KNeighborsArtifact")]
pub struct KNeighbors {
    fit_x: Array2<f64>,
    fit_y: Vec<usize>,
    n_neighbors: usize,
    weights: Weights,
    p: f64,
    classes: Vec<i64>,
    feature_names_in: Option<Vec<String>>,
}

impl TryFrom<KNeighborsArtifact> for KNeighbors {
    type Error = ModelError;

    fn try_from(raw: KNeighborsArtifact) -> ModelResult<Self> {
        let fit_x = matrix_from_rows(raw.fit_x, "fit_x")?;
        check_binary_classes(&raw.classes)?;
        check_feature_names(raw.feature_names_in.as_deref(), fit_x.ncols())?;

        if raw.fit_y.len() != fit_x.nrows() {
            return Err(ModelError::invalid(format!(
                "fit_y has {} labels for {} samples",
                raw.fit_y.len(),
                fit_x.nrows()
            )));
        }
        if raw.fit_y.iter().any(|&y| y >= raw.classes.len()) {
            return Err(ModelError::invalid("fit_y references an unknown class"));
        }
        if raw.n_neighbors == 0 || raw.n_neighbors > fit_x.nrows() {
            return Err(ModelError::invalid(format!(
                "n_neighbors = {} with {} samples",
                raw.n_neighbors,
                fit_x.nrows()
            )));
        }
        if !(raw.p >= 1.0) {
            return Err(ModelError::invalid(format!("p must be >= 1, got {}", raw.p)));
        }

        Ok(Self {
            fit_x,
            fit_y: raw.fit_y,
            n_neighbors: raw.n_neighbors,
            weights: raw.weights,
            p: raw.p,
            classes: raw.classes,
            feature_names_in: raw.feature_names_in,
        })
    }
}

impl KNeighbors {
    fn distance(&self, a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
        if self.p == 2.0 {
            return a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum::<f64>().sqrt();
        }
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).abs().powf(self.p))
            .sum::<f64>()
            .powf(1.0 / self.p)
    }

    /// `(distance, sample index)` of the k nearest samples, closest first
    pub fn kneighbors(&self, x: &FeatureFrame) -> Vec<(f64, usize)> {
        let row = x.values();
        let mut dists: Vec<(f64, usize)> = self
            .fit_x
            .rows()
            .into_iter()
            .enumerate()
            .map(|(i, sample)| (self.distance(row, sample), i))
            .collect();
        // stable sort: equal distances keep training order
        dists.sort_by(|a, b| a.0.total_cmp(&b.0));
        dists.truncate(self.n_neighbors);
        dists
    }
}

impl Classifier for KNeighbors {
    fn kind(&self) -> &'static str {
        "k_neighbors"
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn n_features_in(&self) -> usize {
        self.fit_x.ncols()
    }

    fn feature_names_in(&self) -> Option<&[String]> {
        self.feature_names_in.as_deref()
    }

    fn proba_unchecked(&self, x: &FeatureFrame) -> ModelResult<Array1<f64>> {
        let neighbors = self.kneighbors(x);
        let exact_match = neighbors.iter().any(|(d, _)| *d == 0.0);

        let mut votes = Array1::<f64>::zeros(self.classes.len());
        for (d, i) in &neighbors {
            let weight = match self.weights {
                Weights::Uniform => 1.0,
                // exact matches take the whole vote
                Weights::Distance if exact_match => f64::from(u8::from(*d == 0.0)),
                Weights::Distance => 1.0 / d,
            };
            votes[self.fit_y[*i]] += weight;
        }

        let total = votes.sum();
        Ok(votes / total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn knn(weights: &str, k: usize) -> KNeighbors {
        serde_json::from_value(serde_json::json!({
            "fit_x": [[0.0, 0.0], [0.0, 1.0], [5.0, 5.0], [5.0, 6.0], [6.0, 5.0]],
            "fit_y": [0, 0, 1, 1, 1],
            "n_neighbors": k,
            "weights": weights,
            "classes": [0, 1]
        }))
        .unwrap()
    }

    #[test]
    fn test_uniform_vote() {
        let model = knn("uniform", 3);
        let row = FeatureFrame::bare(array![0.0, 0.5]);
        let proba = model.predict_proba(&row).unwrap();
        assert!((proba[0] - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(model.predict(&row).unwrap(), 0);

        let row = FeatureFrame::bare(array![5.0, 5.5]);
        assert_eq!(model.predict(&row).unwrap(), 1);
        assert_eq!(model.predict_proba(&row).unwrap()[1], 1.0);
    }

    #[test]
    fn test_distance_weights_exact_match() {
        let model = knn("distance", 5);
        let row = FeatureFrame::bare(array![0.0, 0.0]);
        let proba = model.predict_proba(&row).unwrap();
        assert_eq!(proba[0], 1.0);
        assert_eq!(proba[1], 0.0);
    }

    #[test]
    fn test_distance_weights_favour_closer() {
        let model = knn("distance", 5);
        let row = FeatureFrame::bare(array![1.0, 1.0]);
        let proba = model.predict_proba(&row).unwrap();
        assert!(proba[0] > proba[1]);
        assert!((proba.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_neighbor_count() {
        let err = serde_json::from_value::<KNeighbors>(serde_json::json!({
            "fit_x": [[0.0]], "fit_y": [0], "n_neighbors": 3, "classes": [0, 1]
        }));
        assert!(err.is_err());
    }
}

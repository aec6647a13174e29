//! Decision tree classifier (flattened node arrays)

use ndarray::Array1;
use serde::Deserialize;

use super::classifier::Classifier;
use super::{check_binary_classes, check_feature_names};
use crate::error::{ModelError, ModelResult};
use crate::record::FeatureFrame;

/// Child index marking a leaf
pub const TREE_LEAF: i64 = -1;

#[derive(Debug, Deserialize)]
struct DecisionTreeArtifact {
    n_features_in: usize,
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    /// Per-node class weights (counts or fractions)
    value: Vec<Vec<f64>>,
    classes: Vec<i64>,
    #[serde(default)]
    feature_names_in: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
struct Node {
    left: usize,
    right: usize,
    feature: usize,
    threshold: f64,
    leaf: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "DecisionTreeArtifact")]
pub struct DecisionTree {
    nodes: Vec<Node>,
    /// Normalized class distribution per node
    proba: Vec<Array1<f64>>,
    n_features_in: usize,
    classes: Vec<i64>,
    feature_names_in: Option<Vec<String>>,
}

impl TryFrom<DecisionTreeArtifact> for DecisionTree {
    type Error = ModelError;

    fn try_from(raw: DecisionTreeArtifact) -> ModelResult<Self> {
        check_binary_classes(&raw.classes)?;
        check_feature_names(raw.feature_names_in.as_deref(), raw.n_features_in)?;

        let n = raw.children_left.len();
        if n == 0 {
            return Err(ModelError::invalid("tree has no nodes"));
        }
        if [raw.children_right.len(), raw.feature.len(), raw.threshold.len(), raw.value.len()]
            .iter()
            .any(|&len| len != n)
        {
            return Err(ModelError::invalid("tree node arrays differ in length"));
        }

        let child = |c: i64, node: usize| -> ModelResult<usize> {
            // children always sit after their parent, which rules out cycles
            match usize::try_from(c) {
                Ok(c) if c > node && c < n => Ok(c),
                _ => Err(ModelError::invalid(format!("node {node} has invalid child {c}"))),
            }
        };

        let mut nodes = Vec::with_capacity(n);
        let mut proba = Vec::with_capacity(n);
        for i in 0..n {
            let leaf = raw.children_left[i] == TREE_LEAF;
            let node = if leaf {
                Node { left: 0, right: 0, feature: 0, threshold: 0.0, leaf }
            } else {
                let feature = usize::try_from(raw.feature[i])
                    .ok()
                    .filter(|f| *f < raw.n_features_in)
                    .ok_or_else(|| {
                        ModelError::invalid(format!("node {i} splits on feature {}", raw.feature[i]))
                    })?;
                Node {
                    left: child(raw.children_left[i], i)?,
                    right: child(raw.children_right[i], i)?,
                    feature,
                    threshold: raw.threshold[i],
                    leaf,
                }
            };
            nodes.push(node);

            let weights = Array1::from(raw.value[i].clone());
            if weights.len() != raw.classes.len() {
                return Err(ModelError::invalid(format!(
                    "node {i} has {} class weights",
                    weights.len()
                )));
            }
            let total = weights.sum();
            if !(total > 0.0) {
                return Err(ModelError::invalid(format!("node {i} has no class weight")));
            }
            proba.push(weights / total);
        }

        Ok(Self {
            nodes,
            proba,
            n_features_in: raw.n_features_in,
            classes: raw.classes,
            feature_names_in: raw.feature_names_in,
        })
    }
}

impl DecisionTree {
    /// Index of the leaf reached by `x`
    pub fn apply(&self, x: &FeatureFrame) -> ModelResult<usize> {
        self.check_input(x)?;
        Ok(self.leaf_index(x))
    }

    fn leaf_index(&self, x: &FeatureFrame) -> usize {
        let row = x.values();
        let mut idx = 0;
        while !self.nodes[idx].leaf {
            let node = &self.nodes[idx];
            idx = if row[node.feature] <= node.threshold { node.left } else { node.right };
        }
        idx
    }
}

impl Classifier for DecisionTree {
    fn kind(&self) -> &'static str {
        "decision_tree"
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn n_features_in(&self) -> usize {
        self.n_features_in
    }

    fn feature_names_in(&self) -> Option<&[String]> {
        self.feature_names_in.as_deref()
    }

    fn proba_unchecked(&self, x: &FeatureFrame) -> ModelResult<Array1<f64>> {
        Ok(self.proba[self.leaf_index(x)].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn stump() -> DecisionTree {
        // troponin <= 0.5 ? no infarction : infarction
        serde_json::from_value(serde_json::json!({
            "n_features_in": 3,
            "children_left": [1, -1, -1],
            "children_right": [2, -1, -1],
            "feature": [2, -2, -2],
            "threshold": [0.5, -2.0, -2.0],
            "value": [[10.0, 10.0], [9.0, 1.0], [1.0, 9.0]],
            "classes": [0, 1]
        }))
        .unwrap()
    }

    #[test]
    fn test_split_routes_rows() {
        let tree = stump();
        let low = FeatureFrame::bare(array![50.0, 1.0, 0.5]);
        let high = FeatureFrame::bare(array![50.0, 1.0, 0.51]);

        assert_eq!(tree.apply(&low).unwrap(), 1);
        assert_eq!(tree.predict(&low).unwrap(), 0);
        assert!((tree.predict_proba(&low).unwrap()[1] - 0.1).abs() < 1e-12);

        assert_eq!(tree.apply(&high).unwrap(), 2);
        assert_eq!(tree.predict(&high).unwrap(), 1);
    }

    #[test]
    fn test_apply_rejects_narrow_row() {
        let tree = stump();
        let narrow = FeatureFrame::bare(array![50.0, 1.0]);
        assert!(matches!(
            tree.apply(&narrow),
            Err(ModelError::ShapeMismatch { expected: 3, found: 2, .. })
        ));
    }

    #[test]
    fn test_backward_child_rejected() {
        let err = serde_json::from_value::<DecisionTree>(serde_json::json!({
            "n_features_in": 1,
            "children_left": [0],
            "children_right": [0],
            "feature": [0],
            "threshold": [0.0],
            "value": [[1.0, 1.0]],
            "classes": [0, 1]
        }));
        assert!(err.is_err());
    }
}

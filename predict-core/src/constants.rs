//! Central Constants
//!
//! Single source of truth for artifact file names, model order and the
//! input schema.

/// Column names of the patient record, in the order the scaler was fitted on
pub const FEATURE_COLUMNS: [&str; 3] = ["Age", "CK-MB", "Troponin"];

/// Number of input features
pub const FEATURE_COUNT: usize = FEATURE_COLUMNS.len();

/// Index of the positive class (myocardial infarction) in a probability vector
pub const POSITIVE_CLASS_INDEX: usize = 1;

/// Label meaning "infarction predicted"
pub const POSITIVE_LABEL: i64 = 1;

/// Label meaning "no infarction predicted"
pub const NEGATIVE_LABEL: i64 = 0;

/// Decimal places kept for age (whole years)
pub const AGE_DECIMALS: i32 = 0;

/// Decimal places kept for CK-MB and troponin (ng/mL)
pub const BIOMARKER_DECIMALS: i32 = 4;

/// Scaler artifact file name
pub const SCALER_FILE: &str = "scaler.json";

/// Classifier registry: display name and artifact file, in inference order
pub const MODEL_REGISTRY: &[(&str, &str)] = &[
    ("Regresión Logística", "logreg_model.json"),
    ("KNN", "knn_model.json"),
    ("Naive Bayes", "gaussian_nb_model.json"),
    ("SVM", "svm_linear_model.json"),
    ("Red Neuronal (MLP)", "mlp_model.json"),
    ("Árbol de Decisión", "decision_tree_model.json"),
];

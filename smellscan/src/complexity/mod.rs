//! Estimated algorithmic complexity class.
//!
//! Surface features are extracted from the text and classified by a model
//! trained offline (see [`crate::ml`]). Without a model the prediction is
//! reported as unavailable rather than guessed.

/// Feature extraction.
pub mod features;

use crate::error::{AnalysisError, Result};
use crate::ml::dataset::Dataset;
use crate::ml::TrainedModel;
pub use features::{ComplexityFeatures, FEATURE_NAMES};
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::Path;

/// Label column of a complexity dataset.
pub const LABEL_COLUMN: &str = "complexity";

/// Message carried by an unavailable prediction.
pub const NO_MODEL: &str = "No trained model available";

/// Big-O class predicted from surface features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComplexityClass {
    /// O(1).
    Constant,
    /// O(log n).
    Logarithmic,
    /// O(n).
    Linear,
    /// O(n log n).
    Linearithmic,
    /// O(n²).
    Quadratic,
}

impl ComplexityClass {
    /// All classes, cheapest first.
    pub const ALL: [Self; 5] = [
        Self::Constant,
        Self::Logarithmic,
        Self::Linear,
        Self::Linearithmic,
        Self::Quadratic,
    ];

    /// Display label, e.g. `O(n log n)`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Constant => "O(1)",
            Self::Logarithmic => "O(log n)",
            Self::Linear => "O(n)",
            Self::Linearithmic => "O(n log n)",
            Self::Quadratic => "O(n²)",
        }
    }

    /// Spelling used in training datasets.
    #[must_use]
    pub fn dataset_label(self) -> &'static str {
        match self {
            Self::Constant => "1",
            Self::Logarithmic => "logn",
            Self::Linear => "n",
            Self::Linearithmic => "nlogn",
            Self::Quadratic => "n_square",
        }
    }

    /// Accepts either spelling. `O(n^2)` is also understood.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label() == text || c.dataset_label() == text)
            .or_else(|| (text == "O(n^2)").then_some(Self::Quadratic))
    }

    /// Base debt of the class, before the confidence adjustment.
    #[must_use]
    pub fn base_debt(self) -> f64 {
        match self {
            Self::Constant => 0.0,
            Self::Logarithmic => 10.0,
            Self::Linear => 25.0,
            Self::Linearithmic => 40.0,
            Self::Quadratic => 60.0,
        }
    }
}

impl fmt::Display for ComplexityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ComplexityClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Classifier output, or the reason there is none.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComplexityPrediction {
    /// A model produced a label.
    Predicted {
        /// Most probable class.
        label: ComplexityClass,
        /// Probability of `label`.
        confidence: f64,
        /// Probability of every class the model knows.
        class_probabilities: Vec<(ComplexityClass, f64)>,
    },
    /// No model was available or it could not be used.
    Unavailable {
        /// Why.
        error: String,
    },
}

impl ComplexityPrediction {
    /// Label and confidence when a prediction was made.
    #[must_use]
    pub fn label(&self) -> Option<(ComplexityClass, f64)> {
        match self {
            Self::Predicted {
                label, confidence, ..
            } => Some((*label, *confidence)),
            Self::Unavailable { .. } => None,
        }
    }
}

/// Features and prediction for one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexityAnalysis {
    /// Extracted surface features.
    pub features: ComplexityFeatures,
    /// Classifier output.
    pub prediction: ComplexityPrediction,
}

/// Wraps an optional trained complexity model.
#[derive(Debug, Clone, Default)]
pub struct ComplexityPredictor {
    model: Option<TrainedModel>,
}

impl ComplexityPredictor {
    /// Predictor that always reports [`NO_MODEL`].
    #[must_use]
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Uses an already loaded model.
    #[must_use]
    pub fn with_model(model: TrainedModel) -> Self {
        Self { model: Some(model) }
    }

    /// Loads a model from disk.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::ModelUnavailable`] or [`AnalysisError::ModelFormat`].
    pub fn load(path: &Path) -> Result<Self> {
        let model = TrainedModel::load(path)?;
        if model.feature_names != FEATURE_NAMES {
            return Err(AnalysisError::ModelUnavailable {
                path: path.to_path_buf(),
                reason: "model was trained on different features".to_owned(),
            });
        }
        Ok(Self::with_model(model))
    }

    /// True when a model is loaded.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }

    /// Classifies a feature vector.
    #[must_use]
    pub fn predict(&self, features: &ComplexityFeatures) -> ComplexityPrediction {
        let Some(model) = &self.model else {
            return ComplexityPrediction::Unavailable {
                error: NO_MODEL.to_owned(),
            };
        };
        let prediction = model.predict(&features.to_vector());
        let Some(label) = ComplexityClass::parse(prediction.label) else {
            return ComplexityPrediction::Unavailable {
                error: format!("Prediction failed: unknown label '{}'", prediction.label),
            };
        };
        ComplexityPrediction::Predicted {
            label,
            confidence: prediction.confidence,
            class_probabilities: prediction
                .probabilities
                .iter()
                .filter_map(|(name, p)| ComplexityClass::parse(name).map(|c| (c, *p)))
                .collect(),
        }
    }

    /// Extracts features from `content` and classifies them.
    #[must_use]
    pub fn analyze(&self, content: &str) -> ComplexityAnalysis {
        let features = ComplexityFeatures::extract(content);
        ComplexityAnalysis {
            features,
            prediction: self.predict(&features),
        }
    }
}

/// Loads a complexity dataset, normalising labels to their display form.
///
/// # Errors
///
/// [`AnalysisError::Io`] or [`AnalysisError::Dataset`].
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    Dataset::from_path(path, &FEATURE_NAMES, LABEL_COLUMN, |label| {
        let parsed = ComplexityClass::parse(label);
        if parsed.is_none() {
            tracing::warn!(label, "skipping row with unknown complexity label");
        }
        parsed.map(|c| c.label().to_owned())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_both_spellings() {
        assert_eq!(ComplexityClass::parse("n_square"), Some(ComplexityClass::Quadratic));
        assert_eq!(ComplexityClass::parse("O(n²)"), Some(ComplexityClass::Quadratic));
        assert_eq!(ComplexityClass::parse("nlogn"), Some(ComplexityClass::Linearithmic));
        assert_eq!(ComplexityClass::parse("O(1)"), Some(ComplexityClass::Constant));
        assert_eq!(ComplexityClass::parse("n^3"), None);
    }

    #[test]
    fn test_missing_model_is_reported() {
        let analysis = ComplexityPredictor::unavailable().analyze("for x in y:\n    pass\n");
        assert_eq!(analysis.features.no_of_loop, 1);
        assert_eq!(
            analysis.prediction,
            ComplexityPrediction::Unavailable {
                error: NO_MODEL.to_owned()
            }
        );
        assert_eq!(analysis.prediction.label(), None);
    }

    #[test]
    fn test_prediction_serializes_with_status() {
        let prediction = ComplexityPrediction::Predicted {
            label: ComplexityClass::Linear,
            confidence: 0.75,
            class_probabilities: vec![(ComplexityClass::Linear, 0.75)],
        };
        let json = serde_json::to_value(&prediction).unwrap();
        assert_eq!(json["status"], "predicted");
        assert_eq!(json["label"], "O(n)");
    }

    #[test]
    fn test_load_rejects_foreign_model() {
        let err = ComplexityPredictor::load(Path::new("/no/such/model.json")).unwrap_err();
        assert!(matches!(err, AnalysisError::ModelUnavailable { .. }));
    }
}

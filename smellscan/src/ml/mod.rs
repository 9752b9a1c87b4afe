//! Small supervised classifiers for the complexity and pattern models.
//!
//! Training compares a random forest with k-nearest-neighbours on a
//! stratified validation split, refits the winner on every row and
//! persists it as JSON together with its preprocessing.

/// CSV datasets and splitting.
pub mod dataset;
/// Random forest.
pub mod forest;
/// k-nearest-neighbours.
pub mod knn;
/// Imputation and scaling.
pub mod preprocess;

use crate::error::{AnalysisError, Result};
use dataset::{stratified_split, Dataset};
use forest::{ForestParams, RandomForest};
use knn::{Knn, DEFAULT_K};
use preprocess::Pipeline;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Share of each class held out for validation.
pub const VALIDATION_FRACTION: f64 = 0.2;
/// Seed used for splitting and for the forest.
pub const SEED: u64 = 42;

/// A fitted estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    /// Bagged decision trees.
    RandomForest(RandomForest),
    /// Distance-weighted neighbours.
    Knn(Knn),
}

impl Estimator {
    fn predict_proba(&self, row: &[f64]) -> Vec<f64> {
        match self {
            Self::RandomForest(forest) => forest.predict_proba(row),
            Self::Knn(knn) => knn.predict_proba(row),
        }
    }

    fn validate(&self, width: usize, n_classes: usize) -> std::result::Result<(), String> {
        match self {
            Self::RandomForest(forest) => forest.validate(width, n_classes),
            Self::Knn(knn) => knn.validate(width, n_classes),
        }
    }

    /// Short name used in logs and reports.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::RandomForest(_) => "random_forest",
            Self::Knn(_) => "knn",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Candidate {
    RandomForest,
    Knn,
}

impl Candidate {
    fn fit(self, x: &[Vec<f64>], y: &[usize], n_classes: usize) -> Estimator {
        match self {
            Self::RandomForest => {
                Estimator::RandomForest(RandomForest::fit(x, y, n_classes, ForestParams::default()))
            }
            Self::Knn => Estimator::Knn(Knn::fit(x, y, n_classes, DEFAULT_K)),
        }
    }
}

/// Persisted classifier: preprocessing, estimator and class labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    /// Expected feature columns, in order.
    pub feature_names: Vec<String>,
    /// Class labels; probabilities are reported in this order.
    pub labels: Vec<String>,
    /// Fitted imputer and scaler.
    pub pipeline: Pipeline,
    /// Fitted estimator.
    pub estimator: Estimator,
    /// Accuracy on the held-out split during selection.
    pub validation_accuracy: f64,
}

/// One prediction: best label, its probability and the full distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction<'m> {
    /// Most probable label.
    pub label: &'m str,
    /// Probability of `label`.
    pub confidence: f64,
    /// Probability per label, in [`TrainedModel::labels`] order.
    pub probabilities: Vec<(&'m str, f64)>,
}

impl TrainedModel {
    /// Probability per class for one raw row.
    #[must_use]
    pub fn predict_proba(&self, row: &[Option<f64>]) -> Vec<f64> {
        self.estimator.predict_proba(&self.pipeline.transform(row))
    }

    /// Predicts one raw row. Ties go to the earlier label.
    #[must_use]
    pub fn predict(&self, row: &[f64]) -> Prediction<'_> {
        let raw: Vec<Option<f64>> = row.iter().copied().map(Some).collect();
        let probabilities = self.predict_proba(&raw);
        let (best, confidence) = argmax(&probabilities);
        Prediction {
            label: self.labels.get(best).map_or("", String::as_str),
            confidence,
            probabilities: self
                .labels
                .iter()
                .map(String::as_str)
                .zip(probabilities)
                .collect(),
        }
    }

    /// Writes the model as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| AnalysisError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Checks that preprocessing and estimator agree with the feature and
    /// label lists, so prediction cannot index out of bounds.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::ModelFormat`] naming the first inconsistency.
    pub fn validate(&self) -> Result<()> {
        let width = self.feature_names.len();
        let n_classes = self.labels.len();
        let check = if n_classes == 0 {
            Err("model has no labels".to_owned())
        } else if self.pipeline.has_width(width) {
            self.estimator.validate(width, n_classes)
        } else {
            Err(format!("preprocessing does not cover {width} features"))
        };
        check.map_err(|reason| {
            AnalysisError::ModelFormat(<serde_json::Error as serde::de::Error>::custom(reason))
        })
    }

    /// Reads a model written by [`TrainedModel::save`].
    ///
    /// A missing file is [`AnalysisError::ModelUnavailable`]; malformed or
    /// inconsistent content is [`AnalysisError::ModelFormat`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| AnalysisError::ModelUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let model: Self = serde_json::from_str(&content)?;
        model.validate()?;
        tracing::debug!(
            path = %path.display(),
            estimator = model.estimator.name(),
            classes = model.labels.len(),
            "model loaded"
        );
        Ok(model)
    }
}

fn argmax(values: &[f64]) -> (usize, f64) {
    values
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, v)| {
            if v > best.1 {
                (i, v)
            } else {
                best
            }
        })
}

fn encode(labels: &[String], classes: &[String]) -> Vec<usize> {
    labels
        .iter()
        .map(|label| classes.binary_search(label).unwrap_or_default())
        .collect()
}

fn accuracy(estimator: &Estimator, x: &[Vec<f64>], y: &[usize]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    let correct = x
        .iter()
        .zip(y)
        .filter(|(row, label)| argmax(&estimator.predict_proba(row)).0 == **label)
        .count();
    correct as f64 / x.len() as f64
}

/// Selects the better of random forest and k-NN on a stratified split,
/// then refits it on the whole dataset.
///
/// # Errors
///
/// [`AnalysisError::Dataset`] when no labelled rows remain.
pub fn train(dataset: &Dataset) -> Result<TrainedModel> {
    if dataset.is_empty() {
        return Err(AnalysisError::Dataset {
            reason: "no labelled rows".to_owned(),
        });
    }
    let classes = dataset.classes();
    let y = encode(&dataset.labels, &classes);
    let width = dataset.feature_names.len();
    let (train_idx, valid_idx) = stratified_split(&dataset.labels, VALIDATION_FRACTION, SEED);

    let train_rows: Vec<&[Option<f64>]> =
        train_idx.iter().map(|&i| dataset.rows[i].as_slice()).collect();
    let train_y: Vec<usize> = train_idx.iter().map(|&i| y[i]).collect();
    let (pipeline, train_x) = Pipeline::fit(&train_rows, width);
    let valid_x: Vec<Vec<f64>> = valid_idx
        .iter()
        .map(|&i| pipeline.transform(&dataset.rows[i]))
        .collect();
    let valid_y: Vec<usize> = valid_idx.iter().map(|&i| y[i]).collect();

    let mut best: Option<(Candidate, f64)> = None;
    for candidate in [Candidate::RandomForest, Candidate::Knn] {
        let estimator = candidate.fit(&train_x, &train_y, classes.len());
        let score = if valid_x.is_empty() {
            accuracy(&estimator, &train_x, &train_y)
        } else {
            accuracy(&estimator, &valid_x, &valid_y)
        };
        tracing::info!(model = estimator.name(), accuracy = score, "candidate evaluated");
        if best.map_or(true, |(_, current)| score > current) {
            best = Some((candidate, score));
        }
    }
    let (winner, validation_accuracy) = best.unwrap_or((Candidate::RandomForest, 0.0));

    let all_rows: Vec<&[Option<f64>]> = dataset.rows.iter().map(Vec::as_slice).collect();
    let (pipeline, all_x) = Pipeline::fit(&all_rows, width);
    let estimator = winner.fit(&all_x, &y, classes.len());
    tracing::info!(
        model = estimator.name(),
        rows = dataset.len(),
        validation_accuracy,
        "model trained"
    );
    Ok(TrainedModel {
        feature_names: dataset.feature_names.clone(),
        labels: classes,
        pipeline,
        estimator,
        validation_accuracy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn toy_dataset() -> Dataset {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..30_u8 {
            let value = f64::from(i);
            rows.push(vec![Some(value), Some(f64::from(i % 3))]);
            labels.push(if i < 15 { "low" } else { "high" }.to_owned());
        }
        Dataset {
            feature_names: vec!["v".to_owned(), "noise".to_owned()],
            rows,
            labels,
        }
    }

    #[test]
    fn test_train_and_predict() {
        let model = train(&toy_dataset()).unwrap();
        assert_eq!(model.labels, vec!["high".to_owned(), "low".to_owned()]);
        assert!(model.validation_accuracy > 0.8);
        let prediction = model.predict(&[1.0, 1.0]);
        assert_eq!(prediction.label, "low");
        let total: f64 = prediction.probabilities.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        let model = train(&toy_dataset()).unwrap();
        model.save(&path).unwrap();
        let loaded = TrainedModel::load(&path).unwrap();
        assert_eq!(loaded.labels, model.labels);
        assert_eq!(loaded.predict(&[25.0, 0.0]).label, "high");
    }

    #[test]
    fn test_missing_model_is_unavailable() {
        let err = TrainedModel::load(Path::new("/no/such/model.json")).unwrap_err();
        assert!(matches!(err, AnalysisError::ModelUnavailable { .. }));
    }

    #[test]
    fn test_garbage_model_is_format_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, "{\"labels\": 3}").unwrap();
        assert!(matches!(
            TrainedModel::load(&path).unwrap_err(),
            AnalysisError::ModelFormat(_)
        ));
    }

    #[test]
    fn test_trained_model_validates() {
        let model = train(&toy_dataset()).unwrap();
        assert!(model.validate().is_ok());

        let mut extra_feature = model.clone();
        extra_feature.feature_names.push("extra".to_owned());
        assert!(matches!(
            extra_feature.validate().unwrap_err(),
            AnalysisError::ModelFormat(_)
        ));

        let mut extra_label = model;
        extra_label.labels.push("medium".to_owned());
        assert!(extra_label.validate().is_err());
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        assert!(matches!(
            train(&Dataset::default()).unwrap_err(),
            AnalysisError::Dataset { .. }
        ));
    }
}

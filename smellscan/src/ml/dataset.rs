//! Labelled CSV datasets and the stratified train/validation split.

use crate::error::{AnalysisError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Feature rows with one label each. Missing cells are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Feature column names, in row order.
    pub feature_names: Vec<String>,
    /// Feature values per row.
    pub rows: Vec<Vec<Option<f64>>>,
    /// Label per row.
    pub labels: Vec<String>,
}

impl Dataset {
    /// Reads a CSV file. See [`Dataset::from_reader`].
    pub fn from_path(
        path: &Path,
        features: &[&str],
        label_column: &str,
        normalize_label: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let file = File::open(path).map_err(|source| AnalysisError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, features, label_column, normalize_label)
    }

    /// Parses CSV with a header row.
    ///
    /// Rows whose label is empty or rejected by `normalize_label` are
    /// dropped, as are exact duplicate rows.
    pub fn from_reader<R: Read>(
        reader: R,
        features: &[&str],
        label_column: &str,
        normalize_label: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv.headers().map_err(dataset_error)?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| AnalysisError::Dataset {
                    reason: format!("missing column '{name}'"),
                })
        };
        let feature_columns = features
            .iter()
            .map(|&name| column(name))
            .collect::<Result<Vec<_>>>()?;
        let label_index = column(label_column)?;

        let mut dataset = Self {
            feature_names: features.iter().map(|&f| f.to_owned()).collect(),
            ..Self::default()
        };
        let mut seen: FxHashSet<(Vec<Option<u64>>, String)> = FxHashSet::default();
        let mut dropped = 0usize;
        let mut duplicates = 0usize;

        for (row_number, record) in csv.records().enumerate() {
            let record = record.map_err(dataset_error)?;
            let raw_label = record.get(label_index).unwrap_or_default();
            let Some(label) = Some(raw_label)
                .filter(|l| !l.is_empty())
                .and_then(&normalize_label)
            else {
                dropped += 1;
                continue;
            };
            let mut row = Vec::with_capacity(feature_columns.len());
            for (&index, name) in feature_columns.iter().zip(features) {
                let cell = record.get(index).unwrap_or_default();
                row.push(parse_cell(cell, row_number + 2, name)?);
            }
            let key = (row.iter().map(|v| v.map(f64::to_bits)).collect(), label.clone());
            if !seen.insert(key) {
                duplicates += 1;
                continue;
            }
            dataset.rows.push(row);
            dataset.labels.push(label);
        }

        tracing::info!(rows = dataset.len(), dropped, duplicates, "dataset loaded");
        Ok(dataset)
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when no labelled rows remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct labels, sorted.
    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        let mut classes = self.labels.clone();
        classes.sort();
        classes.dedup();
        classes
    }
}

fn parse_cell(cell: &str, line: usize, column: &str) -> Result<Option<f64>> {
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse::<f64>()
        .map(Some)
        .map_err(|_| AnalysisError::Dataset {
            reason: format!("line {line}, column '{column}': '{cell}' is not a number"),
        })
}

#[allow(clippy::needless_pass_by_value)]
fn dataset_error(error: csv::Error) -> AnalysisError {
    AnalysisError::Dataset {
        reason: error.to_string(),
    }
}

/// Splits row indices per label so every class keeps its share in both
/// parts. Classes with a single row stay entirely in training.
#[must_use]
pub fn stratified_split(
    labels: &[String],
    test_fraction: f64,
    seed: u64,
) -> (Vec<usize>, Vec<usize>) {
    let mut by_label: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (index, label) in labels.iter().enumerate() {
        by_label.entry(label).or_default().push(index);
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();
    for indices in by_label.values_mut() {
        indices.shuffle(&mut rng);
        let wanted = (indices.len() as f64 * test_fraction).round() as usize;
        let n_test = wanted.min(indices.len().saturating_sub(1));
        test.extend_from_slice(&indices[..n_test]);
        train.extend_from_slice(&indices[n_test..]);
    }
    train.sort_unstable();
    test.sort_unstable();
    (train, test)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(label: &str) -> Option<String> {
        Some(label.to_owned())
    }

    #[test]
    fn test_missing_labels_and_duplicates_are_dropped() {
        let csv = "a,b,label\n1,2,x\n1,2,x\n3,,y\n5,6,\n";
        let dataset = Dataset::from_reader(csv.as_bytes(), &["a", "b"], "label", identity).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.rows[1], vec![Some(3.0), None]);
        assert_eq!(dataset.classes(), vec!["x".to_owned(), "y".to_owned()]);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let err = Dataset::from_reader("a,label\n1,x\n".as_bytes(), &["a", "b"], "label", identity)
            .unwrap_err();
        assert!(err.to_string().contains("missing column 'b'"));
    }

    #[test]
    fn test_non_numeric_cell_is_an_error() {
        let err = Dataset::from_reader("a,label\nzz,x\n".as_bytes(), &["a"], "label", identity)
            .unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_rejected_labels_are_dropped() {
        let dataset = Dataset::from_reader(
            "a,label\n1,keep\n2,skip\n".as_bytes(),
            &["a"],
            "label",
            |l: &str| (l == "keep").then(|| l.to_owned()),
        )
        .unwrap();
        assert_eq!(dataset.labels, vec!["keep".to_owned()]);
    }

    #[test]
    fn test_stratified_split_keeps_every_class_in_training() {
        let labels: Vec<String> = ["a"; 10]
            .iter()
            .chain(["b"; 5].iter())
            .chain(["c"].iter())
            .map(|&l| l.to_owned())
            .collect();
        let (train, test) = stratified_split(&labels, 0.2, 42);
        assert_eq!(train.len() + test.len(), 16);
        assert_eq!(test.len(), 3);
        assert!(train.iter().any(|&i| labels[i] == "c"));
        assert_eq!(stratified_split(&labels, 0.2, 42), (train, test));
    }
}

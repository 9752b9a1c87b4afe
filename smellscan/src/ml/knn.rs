//! Distance-weighted k-nearest-neighbours.

use serde::{Deserialize, Serialize};

/// Neighbours consulted per prediction.
pub const DEFAULT_K: usize = 5;

/// Memorised training set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Knn {
    k: usize,
    rows: Vec<Vec<f64>>,
    labels: Vec<usize>,
    n_classes: usize,
}

impl Knn {
    /// Stores the scaled training rows.
    #[must_use]
    pub fn fit(x: &[Vec<f64>], y: &[usize], n_classes: usize, k: usize) -> Self {
        Self {
            k: k.max(1),
            rows: x.to_vec(),
            labels: y.to_vec(),
            n_classes,
        }
    }

    /// Checks stored rows and labels against the feature width and class count.
    ///
    /// # Errors
    ///
    /// Describes the first inconsistency found.
    pub fn validate(&self, width: usize, n_classes: usize) -> Result<(), String> {
        if self.n_classes != n_classes {
            return Err(format!(
                "k-NN predicts {} classes, expected {n_classes}",
                self.n_classes
            ));
        }
        if self.rows.len() != self.labels.len() {
            return Err(format!(
                "k-NN stores {} rows but {} labels",
                self.rows.len(),
                self.labels.len()
            ));
        }
        if let Some(label) = self.labels.iter().find(|&&label| label >= n_classes) {
            return Err(format!("k-NN label index {label} out of range"));
        }
        if let Some(row) = self.rows.iter().find(|row| row.len() != width) {
            return Err(format!("k-NN row has {} features, expected {width}", row.len()));
        }
        Ok(())
    }

    /// Votes weighted by inverse distance. Exact matches take all the weight.
    #[must_use]
    pub fn predict_proba(&self, row: &[f64]) -> Vec<f64> {
        let mut probabilities = vec![0.0; self.n_classes];
        let mut neighbours: Vec<(f64, usize)> = self
            .rows
            .iter()
            .zip(&self.labels)
            .map(|(train, &label)| (euclidean(train, row), label))
            .collect();
        neighbours.sort_by(|a, b| a.0.total_cmp(&b.0));
        neighbours.truncate(self.k);

        if neighbours.iter().any(|(d, _)| *d < f64::EPSILON) {
            for (_, label) in neighbours.iter().filter(|(d, _)| *d < f64::EPSILON) {
                probabilities[*label] += 1.0;
            }
        } else {
            for (distance, label) in &neighbours {
                probabilities[*label] += 1.0 / distance;
            }
        }

        let total: f64 = probabilities.iter().sum();
        if total > 0.0 {
            for p in &mut probabilities {
                *p /= total;
            }
        }
        probabilities
    }
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_wins() {
        let x = vec![vec![0.0], vec![1.0], vec![2.0]];
        let knn = Knn::fit(&x, &[0, 1, 1], 2, DEFAULT_K);
        assert_eq!(knn.predict_proba(&[0.0]), vec![1.0, 0.0]);
    }

    #[test]
    fn test_closer_neighbours_weigh_more() {
        let x = vec![vec![0.0], vec![10.0]];
        let knn = Knn::fit(&x, &[0, 1], 2, DEFAULT_K);
        let p = knn.predict_proba(&[2.0]);
        assert!(p[0] > p[1]);
        assert!((p[0] + p[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_only_k_neighbours_vote() {
        let x = vec![vec![0.0], vec![0.1], vec![5.0]];
        let knn = Knn::fit(&x, &[0, 0, 1], 2, 2);
        assert!(knn.predict_proba(&[0.05])[1].abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_checks_labels_and_width() {
        let x = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        assert!(Knn::fit(&x, &[0, 1], 2, DEFAULT_K).validate(2, 2).is_ok());
        assert!(Knn::fit(&x, &[0, 2], 2, DEFAULT_K).validate(2, 2).is_err());
        assert!(Knn::fit(&x, &[0, 1], 2, DEFAULT_K).validate(3, 2).is_err());
        assert!(Knn::fit(&x, &[0], 2, DEFAULT_K).validate(2, 2).is_err());
    }
}

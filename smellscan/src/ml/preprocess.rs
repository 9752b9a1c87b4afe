//! Column-wise preprocessing fitted on training rows.

use serde::{Deserialize, Serialize};

/// Replaces missing cells with the training median of their column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedianImputer {
    medians: Vec<f64>,
}

impl MedianImputer {
    /// Learns one median per column. A column with no values imputes 0.
    #[must_use]
    pub fn fit(rows: &[&[Option<f64>]], width: usize) -> Self {
        let medians = (0..width)
            .map(|column| {
                let mut values: Vec<f64> = rows.iter().filter_map(|row| row[column]).collect();
                median(&mut values)
            })
            .collect();
        Self { medians }
    }

    /// Fills the gaps of one row.
    #[must_use]
    pub fn transform(&self, row: &[Option<f64>]) -> Vec<f64> {
        row.iter()
            .zip(&self.medians)
            .map(|(value, median)| value.unwrap_or(*median))
            .collect()
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.medians.len()
    }
}

fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Zero-mean, unit-variance scaling. Constant columns are only centred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    /// Learns mean and population standard deviation per column.
    #[must_use]
    pub fn fit(rows: &[Vec<f64>], width: usize) -> Self {
        let n = rows.len().max(1) as f64;
        let mut means = vec![0.0; width];
        for row in rows {
            for (mean, value) in means.iter_mut().zip(row) {
                *mean += value / n;
            }
        }
        let mut scales = vec![0.0; width];
        for row in rows {
            for ((scale, value), mean) in scales.iter_mut().zip(row).zip(&means) {
                *scale += (value - mean).powi(2) / n;
            }
        }
        for scale in &mut scales {
            *scale = scale.sqrt();
            if *scale < f64::EPSILON {
                *scale = 1.0;
            }
        }
        Self { means, scales }
    }

    /// Number of columns, or `None` when means and scales disagree.
    #[must_use]
    pub fn width(&self) -> Option<usize> {
        (self.means.len() == self.scales.len()).then_some(self.means.len())
    }

    /// Scales one row.
    #[must_use]
    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.means.iter().zip(&self.scales))
            .map(|(value, (mean, scale))| (value - mean) / scale)
            .collect()
    }
}

/// Imputer followed by scaler, as fitted on one training set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    /// Median imputer.
    pub imputer: MedianImputer,
    /// Standard scaler over imputed values.
    pub scaler: StandardScaler,
}

impl Pipeline {
    /// Fits both stages and returns the transformed training rows.
    #[must_use]
    pub fn fit(rows: &[&[Option<f64>]], width: usize) -> (Self, Vec<Vec<f64>>) {
        let imputer = MedianImputer::fit(rows, width);
        let imputed: Vec<Vec<f64>> = rows.iter().map(|row| imputer.transform(row)).collect();
        let scaler = StandardScaler::fit(&imputed, width);
        let scaled = imputed.iter().map(|row| scaler.transform(row)).collect();
        (Self { imputer, scaler }, scaled)
    }

    /// Transforms one raw row.
    #[must_use]
    pub fn transform(&self, row: &[Option<f64>]) -> Vec<f64> {
        self.scaler.transform(&self.imputer.transform(row))
    }

    /// Whether both stages were fitted on `width` columns.
    #[must_use]
    pub fn has_width(&self, width: usize) -> bool {
        self.imputer.width() == width && self.scaler.width() == Some(width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_imputation() {
        let a = [Some(1.0), None];
        let b = [Some(3.0), Some(4.0)];
        let c = [None, Some(8.0)];
        let rows: Vec<&[Option<f64>]> = vec![&a, &b, &c];
        let imputer = MedianImputer::fit(&rows, 2);
        assert_eq!(imputer.transform(&[None, None]), vec![2.0, 6.0]);
        assert_eq!(imputer.width(), 2);
    }

    #[test]
    fn test_empty_column_imputes_zero() {
        let a = [None];
        let rows: Vec<&[Option<f64>]> = vec![&a];
        assert_eq!(MedianImputer::fit(&rows, 1).transform(&[None]), vec![0.0]);
    }

    #[test]
    fn test_scaler_centres_and_scales() {
        let rows = vec![vec![1.0, 5.0], vec![3.0, 5.0]];
        let scaler = StandardScaler::fit(&rows, 2);
        assert_eq!(scaler.transform(&[1.0, 5.0]), vec![-1.0, 0.0]);
        assert_eq!(scaler.transform(&[3.0, 7.0]), vec![1.0, 2.0]);
        assert_eq!(scaler.width(), Some(2));
    }

    #[test]
    fn test_pipeline_width() {
        let a = [Some(1.0), Some(2.0)];
        let rows: Vec<&[Option<f64>]> = vec![&a];
        let (pipeline, _) = Pipeline::fit(&rows, 2);
        assert!(pipeline.has_width(2));
        assert!(!pipeline.has_width(3));
    }
}

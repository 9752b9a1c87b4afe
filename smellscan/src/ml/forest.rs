//! Random forest of CART trees split on Gini impurity.

use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Training parameters of a [`RandomForest`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestParams {
    /// Number of trees.
    pub n_trees: usize,
    /// Maximum tree depth.
    pub max_depth: usize,
    /// Nodes with fewer samples become leaves.
    pub min_samples_split: usize,
    /// Each side of a split keeps at least this many samples.
    pub min_samples_leaf: usize,
    /// Seed for bootstrap sampling and feature selection.
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 10,
            min_samples_split: 5,
            min_samples_leaf: 2,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Leaf {
        distribution: Vec<f64>,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// One fitted tree; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Class distribution of the leaf `row` falls into.
    #[must_use]
    pub fn predict_proba(&self, row: &[f64]) -> &[f64] {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { distribution } => return distribution,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Checks that every path from the root ends in a leaf of `n_classes`
    /// probabilities and only reads features below `width`.
    ///
    /// # Errors
    ///
    /// Describes the first offending node.
    pub fn validate(&self, width: usize, n_classes: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_owned());
        }
        for (index, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf { distribution } if distribution.len() != n_classes => {
                    return Err(format!(
                        "leaf {index} has {} probabilities, expected {n_classes}",
                        distribution.len()
                    ));
                }
                Node::Leaf { .. } => {}
                Node::Split {
                    feature,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= width {
                        return Err(format!("node {index} splits on missing feature {feature}"));
                    }
                    // Children always follow their parent, so walks terminate.
                    for child in [left, right] {
                        if *child <= index || *child >= self.nodes.len() {
                            return Err(format!("node {index} has invalid child {child}"));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

struct TreeBuilder<'a> {
    x: &'a [Vec<f64>],
    y: &'a [usize],
    n_classes: usize,
    max_features: usize,
    params: ForestParams,
    rng: &'a mut StdRng,
    nodes: Vec<Node>,
}

impl TreeBuilder<'_> {
    fn build(&mut self, samples: &[usize], depth: usize) -> usize {
        let counts = self.class_counts(samples);
        let index = self.nodes.len();
        let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        let split = if depth >= self.params.max_depth
            || samples.len() < self.params.min_samples_split
            || pure
        {
            None
        } else {
            self.best_split(samples)
        };

        let Some((feature, threshold)) = split else {
            self.nodes.push(Node::Leaf {
                distribution: normalize(&counts),
            });
            return index;
        };

        self.nodes.push(Node::Leaf {
            distribution: Vec::new(),
        });
        let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = samples
            .iter()
            .copied()
            .partition(|&s| self.x[s][feature] <= threshold);
        let left = self.build(&left_samples, depth + 1);
        let right = self.build(&right_samples, depth + 1);
        self.nodes[index] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
        index
    }

    fn class_counts(&self, samples: &[usize]) -> Vec<usize> {
        let mut counts = vec![0; self.n_classes];
        for &s in samples {
            counts[self.y[s]] += 1;
        }
        counts
    }

    /// Lowest weighted Gini split. Features are visited in random order
    /// until `max_features` non-constant ones have been tried.
    fn best_split(&mut self, samples: &[usize]) -> Option<(usize, f64)> {
        let n_features = self.x.first().map_or(0, Vec::len);
        if n_features == 0 {
            return None;
        }
        let order = sample(&mut *self.rng, n_features, n_features);
        let n = samples.len();
        let min_leaf = self.params.min_samples_leaf;
        let mut best: Option<(f64, usize, f64)> = None;
        let mut visited = 0;

        for feature in order.iter() {
            if visited >= self.max_features {
                break;
            }
            let mut sorted: Vec<(f64, usize)> = samples
                .iter()
                .map(|&s| (self.x[s][feature], self.y[s]))
                .collect();
            sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
            if sorted[n - 1].0 <= sorted[0].0 {
                continue;
            }
            visited += 1;

            let mut left = vec![0usize; self.n_classes];
            let mut right = vec![0usize; self.n_classes];
            for &(_, class) in &sorted {
                right[class] += 1;
            }
            for i in 1..n {
                let class = sorted[i - 1].1;
                left[class] += 1;
                right[class] -= 1;
                if sorted[i].0 <= sorted[i - 1].0 || i < min_leaf || n - i < min_leaf {
                    continue;
                }
                let impurity =
                    (i as f64 * gini(&left, i) + (n - i) as f64 * gini(&right, n - i)) / n as f64;
                if best.map_or(true, |(current, _, _)| impurity < current) {
                    best = Some((impurity, feature, (sorted[i - 1].0 + sorted[i].0) / 2.0));
                }
            }
        }
        best.map(|(_, feature, threshold)| (feature, threshold))
    }
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| (c as f64 / total).powi(2))
        .sum::<f64>()
}

fn normalize(counts: &[usize]) -> Vec<f64> {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return vec![0.0; counts.len()];
    }
    counts.iter().map(|&c| c as f64 / total as f64).collect()
}

/// Bagged ensemble of decision trees with `sqrt(features)` candidates per split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_classes: usize,
}

impl RandomForest {
    /// Fits the forest on scaled rows `x` with class indices `y`.
    #[must_use]
    pub fn fit(x: &[Vec<f64>], y: &[usize], n_classes: usize, params: ForestParams) -> Self {
        let mut rng = StdRng::seed_from_u64(params.seed);
        let n_features = x.first().map_or(0, Vec::len);
        let max_features = ((n_features as f64).sqrt().floor() as usize).max(1);
        let n = x.len();
        let mut trees = Vec::with_capacity(params.n_trees);
        for _ in 0..params.n_trees {
            if n == 0 {
                break;
            }
            let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            let mut builder = TreeBuilder {
                x,
                y,
                n_classes,
                max_features,
                params,
                rng: &mut rng,
                nodes: Vec::new(),
            };
            builder.build(&bootstrap, 0);
            trees.push(DecisionTree {
                nodes: builder.nodes,
            });
        }
        tracing::debug!(trees = trees.len(), "random forest fitted");
        Self { trees, n_classes }
    }

    /// Checks every tree against the feature width and class count.
    ///
    /// # Errors
    ///
    /// Describes the first inconsistency found.
    pub fn validate(&self, width: usize, n_classes: usize) -> Result<(), String> {
        if self.n_classes != n_classes {
            return Err(format!(
                "forest predicts {} classes, expected {n_classes}",
                self.n_classes
            ));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(width, n_classes)
                .map_err(|reason| format!("tree {i}: {reason}"))?;
        }
        Ok(())
    }

    /// Mean of the trees' leaf distributions.
    #[must_use]
    pub fn predict_proba(&self, row: &[f64]) -> Vec<f64> {
        let mut probabilities = vec![0.0; self.n_classes];
        if self.trees.is_empty() {
            return probabilities;
        }
        for tree in &self.trees {
            for (total, p) in probabilities.iter_mut().zip(tree.predict_proba(row)) {
                *total += p;
            }
        }
        let count = self.trees.len() as f64;
        for p in &mut probabilities {
            *p /= count;
        }
        probabilities
    }

    /// Fitted trees.
    #[must_use]
    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable() -> (Vec<Vec<f64>>, Vec<usize>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..20_u8 {
            x.push(vec![f64::from(i), 0.0]);
            y.push(usize::from(i >= 10));
        }
        (x, y)
    }

    #[test]
    fn test_forest_separates_threshold() {
        let (x, y) = separable();
        let forest = RandomForest::fit(&x, &y, 2, ForestParams::default());
        assert_eq!(forest.trees().len(), 100);
        let low = forest.predict_proba(&[1.0, 0.0]);
        let high = forest.predict_proba(&[18.0, 0.0]);
        assert!(low[0] > 0.8, "{low:?}");
        assert!(high[1] > 0.8, "{high:?}");
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let (x, y) = separable();
        let forest = RandomForest::fit(&x, &y, 2, ForestParams::default());
        let p = forest.predict_proba(&[9.5, 0.0]);
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (x, y) = separable();
        let a = RandomForest::fit(&x, &y, 2, ForestParams::default());
        let b = RandomForest::fit(&x, &y, 2, ForestParams::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_pure_node_is_a_leaf() {
        let x = vec![vec![1.0]; 6];
        let y = vec![0; 6];
        let forest = RandomForest::fit(&x, &y, 1, ForestParams::default());
        assert!(forest.trees().iter().all(|t| t.node_count() == 1));
    }

    #[test]
    fn test_validate_rejects_broken_trees() {
        let (x, y) = separable();
        let forest = RandomForest::fit(&x, &y, 2, ForestParams::default());
        assert!(forest.validate(2, 2).is_ok());
        assert!(forest.validate(2, 3).is_err());

        let empty = DecisionTree { nodes: Vec::new() };
        assert!(empty.validate(2, 2).is_err());
        let out_of_range = DecisionTree {
            nodes: vec![Node::Split {
                feature: 0,
                threshold: 0.5,
                left: 1,
                right: 7,
            }],
        };
        assert!(out_of_range.validate(2, 2).is_err());
        let self_loop = DecisionTree {
            nodes: vec![
                Node::Split {
                    feature: 0,
                    threshold: 0.5,
                    left: 0,
                    right: 1,
                },
                Node::Leaf {
                    distribution: vec![1.0, 0.0],
                },
            ],
        };
        assert!(self_loop.validate(2, 2).is_err());
        let wide_split = DecisionTree {
            nodes: vec![
                Node::Split {
                    feature: 4,
                    threshold: 0.5,
                    left: 1,
                    right: 2,
                },
                Node::Leaf {
                    distribution: vec![1.0, 0.0],
                },
                Node::Leaf {
                    distribution: vec![0.0, 1.0],
                },
            ],
        };
        assert!(wide_split.validate(2, 2).is_err());
        assert!(wide_split.validate(5, 2).is_ok());
    }

    #[test]
    fn test_gini() {
        assert!((gini(&[5, 5], 10) - 0.5).abs() < 1e-12);
        assert!(gini(&[4, 0], 4).abs() < 1e-12);
    }
}

//! CART decision tree used as the ensemble member.
//!
//! Trees are stored as a flat node arena so they serialize compactly and can
//! be walked without recursion. Splits minimise weighted Gini impurity; leaves
//! store the fraction of failed samples that reached them.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::features::{FeatureVector, FEATURE_COUNT};

/// Values closer than this are treated as equal when looking for thresholds.
const FEATURE_EPSILON: f64 = 1e-7;

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    /// Non-constant features examined per split.
    pub max_features: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Node {
    Leaf {
        probability: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted binary decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, Copy)]
struct Split {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

impl DecisionTree {
    /// Grow a tree over the rows of `x`/`y` selected by `sample` (duplicates allowed).
    pub fn grow<R: Rng + ?Sized>(
        x: &[FeatureVector],
        y: &[bool],
        sample: Vec<usize>,
        params: &TreeParams,
        rng: &mut R,
    ) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.grow_node(x, y, sample, 0, params, rng);
        tree
    }

    /// Number of nodes (splits and leaves).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Maximum root-to-leaf depth.
    #[cfg(test)]
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match nodes[idx] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, left).max(walk(nodes, right)),
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }

    /// Fraction of failed training samples in the leaf `features` falls into.
    pub fn predict_probability(&self, features: &FeatureVector) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(Node::Leaf { probability }) => return *probability,
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    idx = if features.get(*feature) <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                None => return 0.0,
            }
        }
    }

    fn grow_node<R: Rng + ?Sized>(
        &mut self,
        x: &[FeatureVector],
        y: &[bool],
        sample: Vec<usize>,
        depth: usize,
        params: &TreeParams,
        rng: &mut R,
    ) -> usize {
        let idx = self.nodes.len();
        let total = sample.len();
        let positives = sample.iter().filter(|&&i| y[i]).count();
        let probability = if total == 0 {
            0.0
        } else {
            positives as f64 / total as f64
        };
        self.nodes.push(Node::Leaf { probability });

        let pure = positives == 0 || positives == total;
        let depth_reached = params.max_depth.is_some_and(|max| depth >= max);
        if pure || depth_reached || total < params.min_samples_split {
            return idx;
        }

        let Some(split) = best_split(x, y, &sample, params.max_features, rng) else {
            return idx;
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = sample
            .into_iter()
            .partition(|&i| x[i].get(split.feature) <= split.threshold);
        debug_assert!(!left_rows.is_empty() && !right_rows.is_empty());

        let left = self.grow_node(x, y, left_rows, depth + 1, params, rng);
        let right = self.grow_node(x, y, right_rows, depth + 1, params, rng);
        self.nodes[idx] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        idx
    }
}

/// Search a random subset of features for the lowest weighted Gini impurity.
///
/// Features are visited in random order; constant features are skipped and do
/// not count towards `max_features`.
fn best_split<R: Rng + ?Sized>(
    x: &[FeatureVector],
    y: &[bool],
    sample: &[usize],
    max_features: usize,
    rng: &mut R,
) -> Option<Split> {
    let mut order: Vec<usize> = (0..FEATURE_COUNT).collect();
    order.shuffle(rng);

    let total = sample.len() as f64;
    let total_pos = sample.iter().filter(|&&i| y[i]).count() as f64;

    let mut best: Option<Split> = None;
    let mut examined = 0;
    let mut column: Vec<(f64, bool)> = Vec::with_capacity(sample.len());

    for feature in order {
        if examined >= max_features {
            break;
        }

        column.clear();
        column.extend(sample.iter().map(|&i| (x[i].get(feature), y[i])));
        column.sort_by(|a, b| a.0.total_cmp(&b.0));

        let (lo, hi) = (column[0].0, column[column.len() - 1].0);
        if hi <= lo + FEATURE_EPSILON {
            continue;
        }
        examined += 1;

        let mut left_n = 0.0;
        let mut left_pos = 0.0;
        for pair in column.windows(2) {
            let (value, label) = pair[0];
            let next = pair[1].0;
            left_n += 1.0;
            if label {
                left_pos += 1.0;
            }
            if next <= value + FEATURE_EPSILON {
                continue;
            }

            let right_n = total - left_n;
            let right_pos = total_pos - left_pos;
            let impurity =
                (left_n * gini(left_pos, left_n) + right_n * gini(right_pos, right_n)) / total;

            if best.map_or(true, |b| impurity < b.impurity) {
                let mut threshold = value + (next - value) / 2.0;
                if threshold >= next {
                    threshold = value;
                }
                best = Some(Split {
                    feature,
                    threshold,
                    impurity,
                });
            }
        }
    }

    best
}

fn gini(positives: f64, n: f64) -> f64 {
    if n == 0.0 {
        return 0.0;
    }
    let p = positives / n;
    1.0 - p * p - (1.0 - p) * (1.0 - p)
}

//! Queue-driven tree induction over a permuted index buffer.
//!
//! The builder owns one working index buffer. Each pending node covers an
//! [`Interval`] of that buffer. Trying a feature stably sorts the interval by
//! that feature's values and hands the sorted column to the split searcher.
//! The permutation of the winning feature is kept, so the two child
//! intervals are contiguous. No subset of the data is ever copied.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

use crate::checks::{distinct_targets, validate_training};
use crate::error::TreeError;
use crate::impurity::{ImpurityCalculator, WeightedTargets};
use crate::interval::Interval;
use crate::matrix::F64Matrix;
use crate::node::{FeatureIndex, Node, NodeIndex, Side};
use crate::split::{SplitResult, SplitSearcher};
use crate::tree::BinaryTree;

/// Order in which pending nodes are expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Growth {
    /// Expand the most recently created node first. Left subtrees are
    /// finished before right ones.
    DepthFirst,
    /// Expand the shallowest pending node first until `max_leaf_count - 1`
    /// splits have been made. Every node still pending then becomes a leaf.
    BestFirst {
        /// Maximum number of leaves in the finished tree.
        max_leaf_count: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    parent: Option<(NodeIndex, Side)>,
    interval: Interval,
    impurity: f64,
    depth: usize,
}

/// Builds [`BinaryTree`]s from a searcher and an impurity calculator.
///
/// Scratch buffers are reused across nodes and across builds. One builder
/// performs one build at a time; parallel ensembles use one builder per tree.
pub struct TreeBuilder {
    max_depth: usize,
    growth: Growth,
    features_per_split: usize,
    min_information_gain: f64,
    rng: ChaCha8Rng,
    searcher: Box<dyn SplitSearcher>,
    calculator: Box<dyn ImpurityCalculator>,

    work_indices: Vec<usize>,
    work_feature: Vec<f64>,
    work_targets: Vec<f64>,
    work_weights: Vec<f64>,
    interval_backup: Vec<usize>,
    best_indices: Vec<usize>,
    sort_buffer: Vec<(f64, usize)>,
    feature_order: Vec<usize>,
}

impl std::fmt::Debug for TreeBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeBuilder")
            .field("max_depth", &self.max_depth)
            .field("growth", &self.growth)
            .field("features_per_split", &self.features_per_split)
            .field("min_information_gain", &self.min_information_gain)
            .finish_non_exhaustive()
    }
}

impl TreeBuilder {
    /// Create a builder.
    ///
    /// `features_per_split == 0` tries every feature at every split. Any other
    /// value tries that many features drawn at random per split.
    ///
    /// # Errors
    ///
    /// - [`TreeError::InvalidMaxDepth`] if `max_depth` is zero.
    /// - [`TreeError::InvalidMaxLeafCount`] if a best-first leaf budget is below 2.
    /// - [`TreeError::InvalidMinInformationGain`] if the gain is not finite and positive.
    pub fn new(
        max_depth: usize,
        growth: Growth,
        features_per_split: usize,
        min_information_gain: f64,
        seed: u64,
        searcher: Box<dyn SplitSearcher>,
        calculator: Box<dyn ImpurityCalculator>,
    ) -> Result<Self, TreeError> {
        if max_depth == 0 {
            return Err(TreeError::InvalidMaxDepth { max_depth });
        }
        match growth {
            Growth::BestFirst { max_leaf_count } if max_leaf_count < 2 => {
                return Err(TreeError::InvalidMaxLeafCount { max_leaf_count });
            }
            _ => {}
        }
        if !min_information_gain.is_finite() || min_information_gain <= 0.0 {
            return Err(TreeError::InvalidMinInformationGain {
                min_information_gain,
            });
        }
        Ok(Self {
            max_depth,
            growth,
            features_per_split,
            min_information_gain,
            rng: ChaCha8Rng::seed_from_u64(seed),
            searcher,
            calculator,
            work_indices: Vec::new(),
            work_feature: Vec::new(),
            work_targets: Vec::new(),
            work_weights: Vec::new(),
            interval_backup: Vec::new(),
            best_indices: Vec::new(),
            sort_buffer: Vec::new(),
            feature_order: Vec::new(),
        })
    }

    /// Grow a tree on the rows listed in `indices`.
    ///
    /// `indices` may repeat rows (bootstrap samples). `weights` is either
    /// empty or holds one weight per observation row.
    ///
    /// # Errors
    ///
    /// Returns a shape or value error from input validation, or
    /// [`TreeError::InvalidFeaturesPerSplit`] if more features per split are
    /// requested than the data has.
    pub fn build(
        &mut self,
        observations: &F64Matrix,
        targets: &[f64],
        indices: &[usize],
        weights: &[f64],
    ) -> Result<BinaryTree, TreeError> {
        validate_training(observations, targets, indices, weights)?;
        self.grow(observations, targets, indices, weights)
    }

    /// Grow a tree on input that already passed `validate_training`.
    #[instrument(skip_all, fields(n_rows = indices.len(), n_features = observations.cols()))]
    pub(crate) fn grow(
        &mut self,
        observations: &F64Matrix,
        targets: &[f64],
        indices: &[usize],
        weights: &[f64],
    ) -> Result<BinaryTree, TreeError> {
        let n_features = observations.cols();
        if self.features_per_split > n_features {
            return Err(TreeError::InvalidFeaturesPerSplit {
                features_per_split: self.features_per_split,
                n_features,
            });
        }
        let n_candidates = match self.features_per_split {
            0 => n_features,
            k => k,
        };

        let n = indices.len();
        self.work_indices.clear();
        self.work_indices.extend_from_slice(indices);
        self.work_feature.resize(n, 0.0);
        self.work_targets.resize(n, 0.0);
        self.work_weights.resize(if weights.is_empty() { 0 } else { n }, 0.0);
        self.interval_backup.resize(n, 0);
        self.best_indices.resize(n, 0);
        self.feature_order.clear();
        self.feature_order.extend(0..n_features);

        let target_names = distinct_targets(targets);
        let root = Interval::of_len(n);
        self.load_targets(targets, weights, root);
        let data = WeightedTargets::weighted(&self.work_targets, &self.work_weights);
        self.calculator.init(&target_names, data, root);
        let root_impurity = self.calculator.node_impurity();

        let mut nodes: Vec<Node> = Vec::new();
        let mut probabilities: Vec<Vec<f64>> = Vec::new();
        let mut importance = vec![0.0; n_features];
        let mut remaining_splits = match self.growth {
            Growth::DepthFirst => usize::MAX,
            Growth::BestFirst { max_leaf_count } => max_leaf_count - 1,
        };

        let mut frontier = VecDeque::new();
        frontier.push_back(Pending {
            parent: None,
            interval: root,
            impurity: root_impurity,
            depth: 0,
        });

        while let Some(item) = self.next_pending(&mut frontier) {
            let interval = item.interval;
            let mut best: Option<(FeatureIndex, SplitResult)> = None;
            if item.depth < self.max_depth && remaining_splits > 0 {
                self.load_targets(targets, weights, interval);
                let data = WeightedTargets::weighted(&self.work_targets, &self.work_weights);
                self.calculator.update_interval(data, interval);
                best = self.search_features(observations, targets, weights, &item, n_candidates);
            }
            // targets in the final order of the interval
            self.load_targets(targets, weights, interval);
            let data = WeightedTargets::weighted(&self.work_targets, &self.work_weights);
            self.calculator.update_interval(data, interval);

            let split = best.and_then(|(feature, result)| {
                let index = result.split_index?;
                (result.impurity_improvement >= self.min_information_gain)
                    .then_some((feature, result, index))
            });

            let node_index = NodeIndex::new(nodes.len());
            match split {
                None => {
                    let leaf_probabilities = self.calculator.leaf_probabilities();
                    let probability_index = if leaf_probabilities.is_empty() {
                        None
                    } else {
                        probabilities.push(leaf_probabilities);
                        Some(probabilities.len() - 1)
                    };
                    nodes.push(Node::Leaf {
                        value: self.calculator.leaf_value(),
                        probability_index,
                    });
                }
                Some((feature, result, split_index)) => {
                    remaining_splits -= 1;
                    importance[feature.index()] +=
                        result.impurity_improvement * interval.len() as f64 / n as f64;
                    nodes.push(Node::Split {
                        feature,
                        threshold: result.threshold,
                        left: NodeIndex::ROOT,
                        right: NodeIndex::ROOT,
                    });
                    let (left, right) = interval.split_at(split_index);
                    let depth = item.depth + 1;
                    frontier.push_back(Pending {
                        parent: Some((node_index, Side::Right)),
                        interval: right,
                        impurity: result.impurity_right,
                        depth,
                    });
                    frontier.push_back(Pending {
                        parent: Some((node_index, Side::Left)),
                        interval: left,
                        impurity: result.impurity_left,
                        depth,
                    });
                }
            }
            if let Some((parent, side)) = item.parent {
                nodes[parent.index()].set_child(side, node_index);
            }
        }

        let tree = BinaryTree::new(nodes, probabilities, target_names, importance);
        debug!(
            n_nodes = tree.n_nodes(),
            n_leaves = tree.n_leaves(),
            depth = tree.depth(),
            "tree built"
        );
        Ok(tree)
    }

    fn next_pending(&self, frontier: &mut VecDeque<Pending>) -> Option<Pending> {
        match self.growth {
            Growth::DepthFirst => frontier.pop_back(),
            Growth::BestFirst { .. } => frontier.pop_front(),
        }
    }

    /// Copy targets (and weights) of the rows in `interval` into the working buffers.
    fn load_targets(&mut self, targets: &[f64], weights: &[f64], interval: Interval) {
        for position in interval.positions() {
            let row = self.work_indices[position];
            self.work_targets[position] = targets[row];
            if !weights.is_empty() {
                self.work_weights[position] = weights[row];
            }
        }
    }

    /// Try the candidate features on one node and leave the winning
    /// permutation in the working index buffer.
    fn search_features(
        &mut self,
        observations: &F64Matrix,
        targets: &[f64],
        weights: &[f64],
        item: &Pending,
        n_candidates: usize,
    ) -> Option<(FeatureIndex, SplitResult)> {
        let interval = item.interval;
        let range = interval.from..interval.to;
        self.interval_backup[range.clone()].copy_from_slice(&self.work_indices[range.clone()]);

        let n_features = self.feature_order.len();
        if n_candidates < n_features {
            // partial Fisher-Yates over the persistent feature order
            for i in 0..n_candidates {
                let j = self.rng.gen_range(i..n_features);
                self.feature_order.swap(i, j);
            }
        }

        let mut best: Option<(FeatureIndex, SplitResult)> = None;
        let mut best_improvement = 0.0;
        for c in 0..n_candidates {
            let feature = self.feature_order[c];
            self.work_indices[range.clone()].copy_from_slice(&self.interval_backup[range.clone()]);
            self.sort_interval(observations, feature, interval);
            self.load_targets(targets, weights, interval);

            let data = WeightedTargets::weighted(&self.work_targets, &self.work_weights);
            let result = self.searcher.find_best_split(
                self.calculator.as_mut(),
                &self.work_feature,
                data,
                interval,
                item.impurity,
            );
            if result.is_split() && result.impurity_improvement > best_improvement {
                best_improvement = result.impurity_improvement;
                best = Some((FeatureIndex::new(feature), result));
                self.best_indices[range.clone()].copy_from_slice(&self.work_indices[range.clone()]);
            }
        }

        let source = if best.is_some() {
            &self.best_indices
        } else {
            &self.interval_backup
        };
        self.work_indices[range.clone()].copy_from_slice(&source[range]);
        best
    }

    /// Stable sort of the interval by one feature, filling the feature buffer.
    fn sort_interval(&mut self, observations: &F64Matrix, feature: usize, interval: Interval) {
        self.sort_buffer.clear();
        self.sort_buffer.extend(
            self.work_indices[interval.from..interval.to]
                .iter()
                .map(|&row| (observations.at(row, feature), row)),
        );
        self.sort_buffer.sort_by(|a, b| a.0.total_cmp(&b.0));
        for (offset, &(value, row)) in self.sort_buffer.iter().enumerate() {
            self.work_feature[interval.from + offset] = value;
            self.work_indices[interval.from + offset] = row;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gini::FrequencyGiniImpurityCalculator;
    use crate::linear::LinearSplitSearcher;
    use crate::split::SplitMethod;
    use crate::test_data::aptitude;
    use crate::variance::RegressionImpurityCalculator;

    fn gini_builder(max_depth: usize, growth: Growth, features_per_split: usize) -> TreeBuilder {
        TreeBuilder::new(
            max_depth,
            growth,
            features_per_split,
            1e-6,
            42,
            Box::new(LinearSplitSearcher::new(1).unwrap()),
            Box::new(FrequencyGiniImpurityCalculator::new()),
        )
        .unwrap()
    }

    fn all_rows(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    /// Sizes of the leaf intervals, recovered by routing every training row.
    fn leaf_sizes(tree: &BinaryTree, observations: &F64Matrix, indices: &[usize]) -> Vec<usize> {
        let mut sizes = vec![0usize; tree.n_nodes()];
        for &row in indices {
            sizes[tree.leaf_index(observations.row(row)).unwrap().index()] += 1;
        }
        tree.nodes()
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_leaf())
            .map(|(i, _)| sizes[i])
            .collect()
    }

    #[test]
    fn constructor_validation() {
        let make = |depth, growth, gain| {
            TreeBuilder::new(
                depth,
                growth,
                0,
                gain,
                1,
                SplitMethod::Linear.searcher(1, 0.0, 1).unwrap(),
                Box::new(RegressionImpurityCalculator::new()),
            )
        };
        assert_eq!(
            make(0, Growth::DepthFirst, 1e-6).unwrap_err(),
            TreeError::InvalidMaxDepth { max_depth: 0 }
        );
        assert_eq!(
            make(5, Growth::BestFirst { max_leaf_count: 1 }, 1e-6).unwrap_err(),
            TreeError::InvalidMaxLeafCount { max_leaf_count: 1 }
        );
        assert_eq!(
            make(5, Growth::DepthFirst, 0.0).unwrap_err(),
            TreeError::InvalidMinInformationGain {
                min_information_gain: 0.0
            }
        );
        assert!(make(5, Growth::BestFirst { max_leaf_count: 2 }, 1e-6).is_ok());
    }

    #[test]
    fn single_target_gives_single_leaf() {
        let observations = F64Matrix::new(4, 2, vec![1.0, 5.0, 2.0, 4.0, 3.0, 3.0, 4.0, 2.0]).unwrap();
        let targets = [7.25; 4];
        let mut builder = TreeBuilder::new(
            10,
            Growth::DepthFirst,
            0,
            1e-6,
            1,
            Box::new(LinearSplitSearcher::unique_thresholds(1).unwrap()),
            Box::new(RegressionImpurityCalculator::new()),
        )
        .unwrap();
        let tree = builder.build(&observations, &targets, &all_rows(4), &[]).unwrap();
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.predict(&[100.0, -100.0]).unwrap(), 7.25);
        assert!(tree.variable_importance().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn separable_data_is_fit_exactly() {
        let rows: Vec<Vec<f64>> = (0..30).map(|i| vec![f64::from(i), f64::from(i % 3)]).collect();
        let targets: Vec<f64> = (0..30).map(|i| f64::from(i / 10)).collect();
        let observations = F64Matrix::from_rows(&rows).unwrap();
        let tree = gini_builder(100, Growth::DepthFirst, 0)
            .build(&observations, &targets, &all_rows(30), &[])
            .unwrap();
        for (row, &target) in targets.iter().enumerate() {
            assert_eq!(tree.predict(observations.row(row)).unwrap(), target);
        }
        assert_eq!(tree.n_leaves(), 3);
        assert_eq!(tree.depth(), 2);
        assert!(tree.variable_importance()[0] > 0.0);
        assert_eq!(tree.variable_importance()[1], 0.0);
        assert_eq!(tree.target_names(), &[0.0, 1.0, 2.0]);
    }

    #[test]
    fn aptitude_root_split() {
        let (observations, targets) = aptitude();
        let tree = gini_builder(1, Growth::DepthFirst, 0)
            .build(&observations, &targets, &all_rows(26), &[])
            .unwrap();
        // experience beats test score at the root
        match &tree.nodes()[0] {
            Node::Split {
                feature, threshold, ..
            } => {
                assert_eq!(feature.index(), 1);
                assert!((threshold - 17.0).abs() < 1e-12);
            }
            Node::Leaf { .. } => panic!("root should split"),
        }
        assert_eq!(tree.n_leaves(), 2);
        assert!((tree.variable_importance()[1] - 0.0800818614583797).abs() < 1e-9);
        assert_eq!(tree.variable_importance()[0], 0.0);
    }

    #[test]
    fn leaf_intervals_partition_training_rows() {
        let (observations, targets) = aptitude();
        let indices = all_rows(26);
        let tree = gini_builder(2000, Growth::DepthFirst, 0)
            .build(&observations, &targets, &indices, &[])
            .unwrap();
        let sizes = leaf_sizes(&tree, &observations, &indices);
        assert_eq!(sizes.iter().sum::<usize>(), 26);
        assert!(sizes.iter().all(|&s| s > 0));
    }

    #[test]
    fn max_depth_limits_tree() {
        let (observations, targets) = aptitude();
        for max_depth in 1..4 {
            let tree = gini_builder(max_depth, Growth::DepthFirst, 0)
                .build(&observations, &targets, &all_rows(26), &[])
                .unwrap();
            assert!(tree.depth() <= max_depth);
        }
    }

    #[test]
    fn leaf_budget_is_respected() {
        let (observations, targets) = aptitude();
        let unbounded = gini_builder(2000, Growth::DepthFirst, 0)
            .build(&observations, &targets, &all_rows(26), &[])
            .unwrap();
        assert!(unbounded.n_leaves() > 4);
        for max_leaf_count in 2..5 {
            let tree = gini_builder(2000, Growth::BestFirst { max_leaf_count }, 0)
                .build(&observations, &targets, &all_rows(26), &[])
                .unwrap();
            assert_eq!(tree.n_leaves(), max_leaf_count);
        }
    }

    #[test]
    fn best_first_and_depth_first_agree_without_budget() {
        let (observations, targets) = aptitude();
        let depth_first = gini_builder(2000, Growth::DepthFirst, 0)
            .build(&observations, &targets, &all_rows(26), &[])
            .unwrap();
        let breadth = gini_builder(2000, Growth::BestFirst { max_leaf_count: 10_000 }, 0)
            .build(&observations, &targets, &all_rows(26), &[])
            .unwrap();
        assert_eq!(depth_first.n_leaves(), breadth.n_leaves());
        let (a, b): (Vec<f64>, Vec<f64>) = (0..26)
            .map(|r| {
                (
                    depth_first.predict(observations.row(r)).unwrap(),
                    breadth.predict(observations.row(r)).unwrap(),
                )
            })
            .unzip();
        assert_eq!(a, b);
    }

    #[test]
    fn subset_and_repeated_indices() {
        let observations = F64Matrix::new(6, 1, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let targets = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let tree = gini_builder(10, Growth::DepthFirst, 0)
            .build(&observations, &targets, &[0, 0, 1, 5, 5], &[])
            .unwrap();
        assert_eq!(tree.n_leaves(), 2);
        assert_eq!(tree.predict(&[2.0]).unwrap(), 0.0);
        assert_eq!(tree.predict(&[6.0]).unwrap(), 1.0);
        match &tree.nodes()[0] {
            Node::Split { threshold, .. } => assert!((threshold - 4.0).abs() < 1e-12),
            Node::Leaf { .. } => panic!("root should split"),
        }
    }

    #[test]
    fn weights_move_the_majority() {
        let observations = F64Matrix::new(4, 1, vec![1.0, 1.0, 1.0, 1.0]).unwrap();
        let targets = [0.0, 0.0, 0.0, 1.0];
        let mut builder = gini_builder(10, Growth::DepthFirst, 0);
        let plain = builder.build(&observations, &targets, &all_rows(4), &[]).unwrap();
        assert_eq!(plain.predict(&[1.0]).unwrap(), 0.0);
        let weighted = builder
            .build(&observations, &targets, &all_rows(4), &[1.0, 1.0, 1.0, 5.0])
            .unwrap();
        assert_eq!(weighted.predict(&[1.0]).unwrap(), 1.0);
    }

    #[test]
    fn min_information_gain_stops_weak_splits() {
        let (observations, targets) = aptitude();
        let tree = TreeBuilder::new(
            2000,
            Growth::DepthFirst,
            0,
            0.1,
            42,
            Box::new(LinearSplitSearcher::new(1).unwrap()),
            Box::new(FrequencyGiniImpurityCalculator::new()),
        )
        .unwrap()
        .build(&observations, &targets, &all_rows(26), &[])
        .unwrap();
        // best root improvement is about 0.08
        assert_eq!(tree.n_nodes(), 1);
    }

    #[test]
    fn random_feature_subsets_are_reproducible() {
        let (observations, targets) = aptitude();
        let a = gini_builder(2000, Growth::DepthFirst, 1)
            .build(&observations, &targets, &all_rows(26), &[])
            .unwrap();
        let b = gini_builder(2000, Growth::DepthFirst, 1)
            .build(&observations, &targets, &all_rows(26), &[])
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn too_many_features_per_split() {
        let (observations, targets) = aptitude();
        let err = gini_builder(10, Growth::DepthFirst, 3)
            .build(&observations, &targets, &all_rows(26), &[])
            .unwrap_err();
        assert_eq!(
            err,
            TreeError::InvalidFeaturesPerSplit {
                features_per_split: 3,
                n_features: 2
            }
        );
    }

    #[test]
    fn importance_never_exceeds_root_impurity() {
        let (observations, targets) = aptitude();
        let tree = gini_builder(2000, Growth::DepthFirst, 0)
            .build(&observations, &targets, &all_rows(26), &[])
            .unwrap();
        let mut calc = FrequencyGiniImpurityCalculator::new();
        calc.init(&[0.0, 1.0], WeightedTargets::unweighted(&targets), Interval::of_len(26));
        let total: f64 = tree.variable_importance().iter().sum();
        assert!(total > 0.0);
        assert!(total <= calc.node_impurity() + 1e-12);
    }
}

//! Configuration builder for single decision trees.

use crate::builder::{Growth, TreeBuilder};
use crate::error::TreeError;
use crate::impurity::ImpurityCalculator;
use crate::split::SplitMethod;

/// How classification leaves estimate class probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum ProbabilityEstimate {
    /// `(count + 1) / (total + n_classes)`.
    #[default]
    LaplaceAdjusted,
    /// `count / total`.
    Frequency,
}

/// Configuration for growing one decision tree.
///
/// Construct via [`DecisionTreeConfig::new`], then chain `with_*` methods.
/// Values are validated when a learner is created from the config.
///
/// # Defaults
///
/// | Parameter              | Default                    |
/// |------------------------|----------------------------|
/// | `max_depth`            | 2000                       |
/// | `max_leaf_count`       | `None` (depth-first growth)|
/// | `min_split_size`       | 1                          |
/// | `min_leaf_weight`      | 0.0                        |
/// | `features_per_split`   | 0 (all features)           |
/// | `min_information_gain` | 1e-6                       |
/// | `split_method`         | `UniqueThresholds`         |
/// | `seed`                 | 42                         |
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DecisionTreeConfig {
    pub(crate) max_depth: usize,
    pub(crate) max_leaf_count: Option<usize>,
    pub(crate) min_split_size: usize,
    pub(crate) min_leaf_weight: f64,
    pub(crate) features_per_split: usize,
    pub(crate) min_information_gain: f64,
    pub(crate) split_method: SplitMethod,
    pub(crate) seed: u64,
}

impl DecisionTreeConfig {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_depth: 2000,
            max_leaf_count: None,
            min_split_size: 1,
            min_leaf_weight: 0.0,
            features_per_split: 0,
            min_information_gain: 1e-6,
            split_method: SplitMethod::UniqueThresholds,
            seed: 42,
        }
    }

    /// Set the maximum depth. The root has depth 0.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set a leaf budget. `Some(n)` grows best-first until the tree has `n`
    /// leaves; `None` grows depth-first.
    #[must_use]
    pub fn with_max_leaf_count(mut self, max_leaf_count: Option<usize>) -> Self {
        self.max_leaf_count = max_leaf_count;
        self
    }

    /// Set the minimum number of samples on each side of a split.
    #[must_use]
    pub fn with_min_split_size(mut self, min_split_size: usize) -> Self {
        self.min_split_size = min_split_size;
        self
    }

    /// Set the minimum total sample weight on each side of a split.
    #[must_use]
    pub fn with_min_leaf_weight(mut self, min_leaf_weight: f64) -> Self {
        self.min_leaf_weight = min_leaf_weight;
        self
    }

    /// Set the number of randomly drawn features tried per split. 0 tries all.
    #[must_use]
    pub fn with_features_per_split(mut self, features_per_split: usize) -> Self {
        self.features_per_split = features_per_split;
        self
    }

    /// Set the smallest impurity improvement that still produces a split.
    #[must_use]
    pub fn with_min_information_gain(mut self, min_information_gain: f64) -> Self {
        self.min_information_gain = min_information_gain;
        self
    }

    /// Set the split search strategy.
    #[must_use]
    pub fn with_split_method(mut self, split_method: SplitMethod) -> Self {
        self.split_method = split_method;
        self
    }

    /// Set the seed for feature subsampling and random thresholds.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    // --- Getters ---

    /// Return the maximum depth.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Return the leaf budget.
    #[must_use]
    pub fn max_leaf_count(&self) -> Option<usize> {
        self.max_leaf_count
    }

    /// Return the minimum split size.
    #[must_use]
    pub fn min_split_size(&self) -> usize {
        self.min_split_size
    }

    /// Return the minimum leaf weight.
    #[must_use]
    pub fn min_leaf_weight(&self) -> f64 {
        self.min_leaf_weight
    }

    /// Return the number of features tried per split.
    #[must_use]
    pub fn features_per_split(&self) -> usize {
        self.features_per_split
    }

    /// Return the minimum information gain.
    #[must_use]
    pub fn min_information_gain(&self) -> f64 {
        self.min_information_gain
    }

    /// Return the split search strategy.
    #[must_use]
    pub fn split_method(&self) -> SplitMethod {
        self.split_method
    }

    /// Return the seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Growth order implied by the leaf budget.
    #[must_use]
    pub fn growth(&self) -> Growth {
        match self.max_leaf_count {
            Some(max_leaf_count) => Growth::BestFirst { max_leaf_count },
            None => Growth::DepthFirst,
        }
    }

    /// Create a tree builder for this configuration around `calculator`.
    ///
    /// # Errors
    ///
    /// Returns the first invalid parameter found by the searcher or builder.
    pub fn builder(
        &self,
        calculator: Box<dyn ImpurityCalculator>,
    ) -> Result<TreeBuilder, TreeError> {
        let searcher = self
            .split_method
            .searcher(self.min_split_size, self.min_leaf_weight, self.seed)?;
        TreeBuilder::new(
            self.max_depth,
            self.growth(),
            self.features_per_split,
            self.min_information_gain,
            self.seed,
            searcher,
            calculator,
        )
    }
}

impl Default for DecisionTreeConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variance::RegressionImpurityCalculator;

    #[test]
    fn defaults() {
        let config = DecisionTreeConfig::default();
        assert_eq!(config.max_depth(), 2000);
        assert_eq!(config.max_leaf_count(), None);
        assert_eq!(config.growth(), Growth::DepthFirst);
        assert_eq!(config.min_split_size(), 1);
        assert_eq!(config.features_per_split(), 0);
        assert!((config.min_information_gain() - 1e-6).abs() < 1e-18);
        assert_eq!(config.split_method(), SplitMethod::UniqueThresholds);
        assert_eq!(config.seed(), 42);
        assert_eq!(ProbabilityEstimate::default(), ProbabilityEstimate::LaplaceAdjusted);
    }

    #[test]
    fn setters_chain() {
        let config = DecisionTreeConfig::new()
            .with_max_depth(5)
            .with_max_leaf_count(Some(8))
            .with_min_split_size(3)
            .with_min_leaf_weight(0.5)
            .with_features_per_split(2)
            .with_min_information_gain(0.01)
            .with_split_method(SplitMethod::Random)
            .with_seed(7);
        assert_eq!(config.max_depth(), 5);
        assert_eq!(config.growth(), Growth::BestFirst { max_leaf_count: 8 });
        assert_eq!(config.min_split_size(), 3);
        assert_eq!(config.min_leaf_weight(), 0.5);
        assert_eq!(config.features_per_split(), 2);
        assert_eq!(config.min_information_gain(), 0.01);
        assert_eq!(config.split_method(), SplitMethod::Random);
        assert_eq!(config.seed(), 7);
    }

    #[test]
    fn builder_reports_invalid_parameters() {
        let calc = || Box::new(RegressionImpurityCalculator::new());
        assert_eq!(
            DecisionTreeConfig::new().with_max_depth(0).builder(calc()).unwrap_err(),
            TreeError::InvalidMaxDepth { max_depth: 0 }
        );
        assert_eq!(
            DecisionTreeConfig::new().with_min_split_size(0).builder(calc()).unwrap_err(),
            TreeError::InvalidMinSplitSize { min_split_size: 0 }
        );
        assert_eq!(
            DecisionTreeConfig::new().with_max_leaf_count(Some(1)).builder(calc()).unwrap_err(),
            TreeError::InvalidMaxLeafCount { max_leaf_count: 1 }
        );
        assert!(DecisionTreeConfig::new().builder(calc()).is_ok());
    }
}

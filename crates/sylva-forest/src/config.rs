//! Configuration builder for forest training.

use sylva_tree::{DecisionTreeConfig, SplitMethod};

use crate::error::ForestError;

/// Strategy for the number of features tried at each split.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum MaxFeatures {
    /// `Sqrt` for classification, `Third` for regression.
    Default,
    /// Square root of the feature count, rounded down.
    Sqrt,
    /// A third of the feature count, rounded down.
    Third,
    /// A fraction of the feature count (must be in (0.0, 1.0]), rounded down.
    Fraction(f64),
    /// A fixed count.
    Fixed(usize),
    /// All features (no subsampling).
    All,
}

impl MaxFeatures {
    /// Resolve to a concrete count for `n_features` columns.
    ///
    /// `Default` resolves through `fallback`. Rounded strategies never
    /// resolve below 1.
    pub(crate) fn resolve(self, n_features: usize, fallback: MaxFeatures) -> Result<usize, ForestError> {
        let resolved = match self {
            MaxFeatures::Default => return fallback.resolve(n_features, MaxFeatures::All),
            MaxFeatures::Sqrt => ((n_features as f64).sqrt() as usize).max(1),
            MaxFeatures::Third => (n_features / 3).max(1),
            MaxFeatures::Fraction(fraction) => {
                if !(fraction > 0.0 && fraction <= 1.0) {
                    return Err(ForestError::InvalidFeatureFraction { fraction });
                }
                ((n_features as f64 * fraction) as usize).max(1)
            }
            MaxFeatures::Fixed(n) => n,
            MaxFeatures::All => n_features,
        };
        if resolved == 0 || resolved > n_features {
            return Err(ForestError::InvalidMaxFeatures {
                max_features: resolved,
                n_features,
            });
        }
        Ok(resolved)
    }
}

/// Configuration for forest training.
///
/// Construct via [`ForestConfig::new`], then chain `with_*` methods.
/// The exhaustive split methods (`UniqueThresholds`, `Linear`, `Bucketed`)
/// grow a random forest, `SplitMethod::Random` grows extremely randomized trees.
///
/// # Defaults
///
/// | Parameter              | Default            |
/// |------------------------|--------------------|
/// | `n_trees`              | 100                |
/// | `max_features`         | `Default`          |
/// | `max_depth`            | 2000               |
/// | `min_split_size`       | 1                  |
/// | `min_information_gain` | 1e-6               |
/// | `sub_sample_ratio`     | 1.0                |
/// | `split_method`         | `UniqueThresholds` |
/// | `seed`                 | 42                 |
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ForestConfig {
    pub(crate) n_trees: usize,
    pub(crate) max_features: MaxFeatures,
    pub(crate) max_depth: usize,
    pub(crate) min_split_size: usize,
    pub(crate) min_information_gain: f64,
    pub(crate) sub_sample_ratio: f64,
    pub(crate) split_method: SplitMethod,
    pub(crate) seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_features: MaxFeatures::Default,
            max_depth: 2000,
            min_split_size: 1,
            min_information_gain: 1e-6,
            sub_sample_ratio: 1.0,
            split_method: SplitMethod::UniqueThresholds,
            seed: 42,
        }
    }
}

impl ForestConfig {
    /// Create a new config with the given number of trees.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::InvalidTreeCount`] if `n_trees` is zero.
    pub fn new(n_trees: usize) -> Result<Self, ForestError> {
        if n_trees == 0 {
            return Err(ForestError::InvalidTreeCount { n_trees });
        }
        Ok(Self {
            n_trees,
            ..Self::default()
        })
    }

    // --- Setters ---

    /// Set the max features strategy.
    #[must_use]
    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = max_features;
        self
    }

    /// Set the maximum tree depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the minimum number of samples on each side of a split.
    #[must_use]
    pub fn with_min_split_size(mut self, min_split_size: usize) -> Self {
        self.min_split_size = min_split_size;
        self
    }

    /// Set the smallest impurity improvement that still produces a split.
    #[must_use]
    pub fn with_min_information_gain(mut self, min_information_gain: f64) -> Self {
        self.min_information_gain = min_information_gain;
        self
    }

    /// Set the bootstrap sample size as a ratio of the training rows.
    #[must_use]
    pub fn with_sub_sample_ratio(mut self, sub_sample_ratio: f64) -> Self {
        self.sub_sample_ratio = sub_sample_ratio;
        self
    }

    /// Set the split search strategy used by every tree.
    #[must_use]
    pub fn with_split_method(mut self, split_method: SplitMethod) -> Self {
        self.split_method = split_method;
        self
    }

    /// Set the master seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    // --- Getters ---

    /// Return the number of trees.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    /// Return the max features strategy.
    #[must_use]
    pub fn max_features(&self) -> MaxFeatures {
        self.max_features
    }

    /// Return the maximum tree depth.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Return the minimum split size.
    #[must_use]
    pub fn min_split_size(&self) -> usize {
        self.min_split_size
    }

    /// Return the minimum information gain.
    #[must_use]
    pub fn min_information_gain(&self) -> f64 {
        self.min_information_gain
    }

    /// Return the sub-sample ratio.
    #[must_use]
    pub fn sub_sample_ratio(&self) -> f64 {
        self.sub_sample_ratio
    }

    /// Return the split search strategy.
    #[must_use]
    pub fn split_method(&self) -> SplitMethod {
        self.split_method
    }

    /// Return the master seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub(crate) fn validate(&self) -> Result<(), ForestError> {
        if !(self.sub_sample_ratio.is_finite() && self.sub_sample_ratio > 0.0) {
            return Err(ForestError::InvalidSubSampleRatio {
                ratio: self.sub_sample_ratio,
            });
        }
        if let MaxFeatures::Fraction(fraction) = self.max_features {
            if !(fraction > 0.0 && fraction <= 1.0) {
                return Err(ForestError::InvalidFeatureFraction { fraction });
            }
        }
        Ok(())
    }

    /// Per-tree configuration: depth-first growth with the forest's limits.
    pub(crate) fn tree_config(&self, features_per_split: usize, seed: u64) -> DecisionTreeConfig {
        DecisionTreeConfig::new()
            .with_max_depth(self.max_depth)
            .with_min_split_size(self.min_split_size)
            .with_min_information_gain(self.min_information_gain)
            .with_features_per_split(features_per_split)
            .with_split_method(self.split_method)
            .with_seed(seed)
    }
}

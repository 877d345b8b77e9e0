use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::TreeError;
use crate::impurity::{ImpurityCalculator, WeightedTargets};
use crate::interval::Interval;
use crate::split::{
    SplitResult, SplitSearcher, midpoint, size_admissible, validate_min_leaf_weight,
    validate_min_split_size,
};

/// Extremely randomized split: one uniform threshold per search.
///
/// The threshold is drawn from `[min, max)` of the feature values in the
/// interval, and the split lands on the first admissible boundary above it.
/// The generator is seeded once per instance, so a fixed seed reproduces
/// the same sequence of thresholds across calls.
#[derive(Debug, Clone)]
pub struct RandomSplitSearcher {
    min_split_size: usize,
    min_leaf_weight: f64,
    rng: ChaCha8Rng,
}

impl RandomSplitSearcher {
    /// Create a random searcher with its own seeded generator.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidMinSplitSize`] if `min_split_size` is zero.
    pub fn new(min_split_size: usize, seed: u64) -> Result<Self, TreeError> {
        validate_min_split_size(min_split_size)?;
        Ok(Self {
            min_split_size,
            min_leaf_weight: 0.0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Set the minimum total weight on each side of a split.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidMinLeafWeight`] if the weight is negative or not finite.
    pub fn with_min_leaf_weight(mut self, min_leaf_weight: f64) -> Result<Self, TreeError> {
        validate_min_leaf_weight(min_leaf_weight)?;
        self.min_leaf_weight = min_leaf_weight;
        Ok(self)
    }
}

impl SplitSearcher for RandomSplitSearcher {
    fn find_best_split(
        &mut self,
        calculator: &mut dyn ImpurityCalculator,
        feature: &[f64],
        data: WeightedTargets<'_>,
        parent: Interval,
        parent_impurity: f64,
    ) -> SplitResult {
        calculator.reset();
        if parent.len() < 2 {
            return SplitResult::none();
        }
        let values = &feature[parent.from..parent.to];
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if min == max {
            return SplitResult::none();
        }

        let mut threshold = self.rng.r#gen::<f64>() * (max - min) + min;
        if threshold >= max {
            threshold = min;
        }

        let Some(position) = size_admissible(parent, self.min_split_size)
            .find(|&j| feature[j] > threshold && feature[j - 1] < feature[j])
        else {
            return SplitResult::none();
        };

        calculator.update_index(data, position);
        if calculator.weighted_left() < self.min_leaf_weight
            || calculator.weighted_right() < self.min_leaf_weight
        {
            return SplitResult::none();
        }

        // keep the partition and the reported threshold consistent when the
        // size constraint pushed the boundary past the drawn value
        if feature[position - 1] > threshold {
            threshold = midpoint(feature[position - 1], feature[position]);
        }

        let children = calculator.child_impurities();
        SplitResult {
            split_index: Some(position),
            threshold,
            impurity_improvement: calculator.impurity_improvement(parent_impurity),
            impurity_left: children.left,
            impurity_right: children.right,
        }
    }
}

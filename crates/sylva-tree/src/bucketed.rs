use crate::error::TreeError;
use crate::impurity::{ImpurityCalculator, WeightedTargets};
use crate::interval::Interval;
use crate::split::{
    CandidateBoundaries, SplitResult, SplitSearcher, consider_boundary, size_admissible,
    validate_min_leaf_weight, validate_min_split_size,
};

/// Two-pass bucketed scan over the same candidates as the linear searcher.
///
/// Candidate boundaries are grouped into `n_buckets` consecutive buckets.
/// The coarse pass evaluates the first candidate of each bucket. The refine
/// pass evaluates every candidate within one bucket width of the coarse
/// winner. With at most `n_buckets` candidates every one of them is
/// evaluated, so the result equals the linear searcher's.
#[derive(Debug, Clone)]
pub struct BucketedSplitSearcher {
    min_split_size: usize,
    min_leaf_weight: f64,
    n_buckets: usize,
    candidates: Vec<usize>,
}

impl BucketedSplitSearcher {
    /// Create a bucketed searcher.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidMinSplitSize`] if `min_split_size` is zero
    /// and [`TreeError::InvalidBucketCount`] if `n_buckets` is zero.
    pub fn new(min_split_size: usize, n_buckets: usize) -> Result<Self, TreeError> {
        validate_min_split_size(min_split_size)?;
        if n_buckets == 0 {
            return Err(TreeError::InvalidBucketCount { n_buckets });
        }
        Ok(Self {
            min_split_size,
            min_leaf_weight: 0.0,
            n_buckets,
            candidates: Vec::new(),
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

    /// Return the number of coarse buckets.
    #[must_use]
    pub fn n_buckets(&self) -> usize {
        self.n_buckets
    }

    #[allow(clippy::too_many_arguments)]
    fn scan(
        &self,
        calculator: &mut dyn ImpurityCalculator,
        feature: &[f64],
        data: WeightedTargets<'_>,
        parent_impurity: f64,
        picks: impl Iterator<Item = usize>,
        best: &mut SplitResult,
    ) {
        calculator.reset();
        for k in picks {
            consider_boundary(
                calculator,
                feature,
                data,
                self.candidates[k],
                parent_impurity,
                self.min_leaf_weight,
                best,
            );
        }
    }
}

impl SplitSearcher for BucketedSplitSearcher {
    fn find_best_split(
        &mut self,
        calculator: &mut dyn ImpurityCalculator,
        feature: &[f64],
        data: WeightedTargets<'_>,
        parent: Interval,
        parent_impurity: f64,
    ) -> SplitResult {
        self.candidates.clear();
        self.candidates.extend(
            size_admissible(parent, self.min_split_size).filter(|&position| {
                CandidateBoundaries::FeatureAndTargetChange.accepts(feature, &data, position)
            }),
        );
        let n = self.candidates.len();
        let mut best = SplitResult::none();

        if n <= self.n_buckets {
            self.scan(calculator, feature, data, parent_impurity, 0..n, &mut best);
            return best;
        }

        let stride = n.div_ceil(self.n_buckets);
        let mut coarse = SplitResult::none();
        self.scan(
            calculator,
            feature,
            data,
            parent_impurity,
            (0..n).step_by(stride),
            &mut coarse,
        );

        let Some(winner) = coarse.split_index else {
            // nothing sampled survived the weight constraint
            self.scan(calculator, feature, data, parent_impurity, 0..n, &mut best);
            return best;
        };
        let k = self.candidates.partition_point(|&position| position < winner);
        let lo = k.saturating_sub(stride - 1);
        let hi = (k + stride).min(n);
        self.scan(calculator, feature, data, parent_impurity, lo..hi, &mut best);
        best
    }
}

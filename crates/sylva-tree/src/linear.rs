use crate::error::TreeError;
use crate::impurity::{ImpurityCalculator, WeightedTargets};
use crate::interval::Interval;
use crate::split::{
    CandidateBoundaries, SplitResult, SplitSearcher, consider_boundary, size_admissible,
    validate_min_leaf_weight, validate_min_split_size,
};

/// Exhaustive left-to-right scan of every candidate boundary.
///
/// The threshold of a split is the midpoint of the two feature values on
/// either side of the boundary. Boundaries leaving fewer than
/// `min_split_size` positions, or less than `min_leaf_weight`, on either
/// side are skipped.
#[derive(Debug, Clone)]
pub struct LinearSplitSearcher {
    min_split_size: usize,
    min_leaf_weight: f64,
    boundaries: CandidateBoundaries,
}

impl LinearSplitSearcher {
    /// Searcher that only considers boundaries where both the feature value
    /// and the target change.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidMinSplitSize`] if `min_split_size` is zero.
    pub fn new(min_split_size: usize) -> Result<Self, TreeError> {
        validate_min_split_size(min_split_size)?;
        Ok(Self {
            min_split_size,
            min_leaf_weight: 0.0,
            boundaries: CandidateBoundaries::FeatureAndTargetChange,
        })
    }

    /// Searcher that considers every distinct feature-value boundary.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidMinSplitSize`] if `min_split_size` is zero.
    pub fn unique_thresholds(min_split_size: usize) -> Result<Self, TreeError> {
        let mut searcher = Self::new(min_split_size)?;
        searcher.boundaries = CandidateBoundaries::FeatureChange;
        Ok(searcher)
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

    /// Return the minimum number of positions on each side of a split.
    #[must_use]
    pub fn min_split_size(&self) -> usize {
        self.min_split_size
    }

    /// Return the candidate boundary rule.
    #[must_use]
    pub fn boundaries(&self) -> CandidateBoundaries {
        self.boundaries
    }
}

impl SplitSearcher for LinearSplitSearcher {
    fn find_best_split(
        &mut self,
        calculator: &mut dyn ImpurityCalculator,
        feature: &[f64],
        data: WeightedTargets<'_>,
        parent: Interval,
        parent_impurity: f64,
    ) -> SplitResult {
        calculator.reset();
        let mut best = SplitResult::none();
        for position in size_admissible(parent, self.min_split_size) {
            if !self.boundaries.accepts(feature, &data, position) {
                continue;
            }
            consider_boundary(
                calculator,
                feature,
                data,
                position,
                parent_impurity,
                self.min_leaf_weight,
                &mut best,
            );
        }
        best
    }
}

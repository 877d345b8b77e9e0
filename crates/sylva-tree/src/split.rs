//! Split search over one sorted feature column.

use crate::bucketed::BucketedSplitSearcher;
use crate::error::TreeError;
use crate::impurity::{ImpurityCalculator, WeightedTargets};
use crate::interval::Interval;
use crate::linear::LinearSplitSearcher;
use crate::random_split::RandomSplitSearcher;

/// Outcome of a split search on one feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitResult {
    /// First position of the right child, or `None` when no boundary qualified.
    pub split_index: Option<usize>,
    /// Observations with `value <= threshold` go left.
    pub threshold: f64,
    /// Impurity improvement achieved by the split.
    pub impurity_improvement: f64,
    /// Impurity of the left child.
    pub impurity_left: f64,
    /// Impurity of the right child.
    pub impurity_right: f64,
}

impl SplitResult {
    /// The "no split found" result.
    #[must_use]
    pub fn none() -> Self {
        Self {
            split_index: None,
            threshold: 0.0,
            impurity_improvement: 0.0,
            impurity_left: 0.0,
            impurity_right: 0.0,
        }
    }

    /// Return `true` if a boundary was found.
    #[must_use]
    pub fn is_split(&self) -> bool {
        self.split_index.is_some()
    }
}

/// Finds the best boundary in a feature column sorted within an interval.
pub trait SplitSearcher: Send {
    /// Search `parent` for the boundary with the largest impurity improvement.
    ///
    /// `feature` and `data` are the working buffers, already ordered so that
    /// `feature` is non-decreasing over `parent`. `calculator` must have been
    /// initialised over `parent`; the searcher resets its boundary before scanning.
    fn find_best_split(
        &mut self,
        calculator: &mut dyn ImpurityCalculator,
        feature: &[f64],
        data: WeightedTargets<'_>,
        parent: Interval,
        parent_impurity: f64,
    ) -> SplitResult;
}

/// Which positions count as candidate boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CandidateBoundaries {
    /// Both the feature value and the target change across the boundary.
    ///
    /// Cheaper, but it skips boundaries where the target repeats across a
    /// feature-value change.
    FeatureAndTargetChange,
    /// Any change in the feature value.
    FeatureChange,
}

impl CandidateBoundaries {
    /// Return `true` if the boundary before `position` is a candidate.
    #[inline]
    pub(crate) fn accepts(self, feature: &[f64], data: &WeightedTargets<'_>, position: usize) -> bool {
        if feature[position - 1] == feature[position] {
            return false;
        }
        match self {
            CandidateBoundaries::FeatureAndTargetChange => {
                data.target(position - 1) != data.target(position)
            }
            CandidateBoundaries::FeatureChange => true,
        }
    }
}

/// Boundaries that leave at least `min_split_size` positions on each side.
pub(crate) fn size_admissible(parent: Interval, min_split_size: usize) -> std::ops::Range<usize> {
    let first = (parent.from + min_split_size).max(parent.from + 1);
    let end = (parent.to + 1).saturating_sub(min_split_size).max(first);
    first..end
}

/// Threshold between two sorted neighbours with `low <= threshold < high`.
///
/// The midpoint rounds up to `high` when the two values are adjacent floats;
/// `low` is used then.
#[inline]
pub(crate) fn midpoint(low: f64, high: f64) -> f64 {
    let mid = (low + high) / 2.0;
    if mid >= high { low } else { mid }
}

/// Evaluate the boundary at `position` and keep it in `best` if it wins.
///
/// The calculator boundary must not be past `position`.
pub(crate) fn consider_boundary(
    calculator: &mut dyn ImpurityCalculator,
    feature: &[f64],
    data: WeightedTargets<'_>,
    position: usize,
    parent_impurity: f64,
    min_leaf_weight: f64,
    best: &mut SplitResult,
) {
    calculator.update_index(data, position);
    if calculator.weighted_left() < min_leaf_weight || calculator.weighted_right() < min_leaf_weight {
        return;
    }
    let improvement = calculator.impurity_improvement(parent_impurity);
    if improvement > best.impurity_improvement {
        let children = calculator.child_impurities();
        *best = SplitResult {
            split_index: Some(position),
            threshold: midpoint(feature[position - 1], feature[position]),
            impurity_improvement: improvement,
            impurity_left: children.left,
            impurity_right: children.right,
        };
    }
}

/// Strategy used to search each feature for a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SplitMethod {
    /// Exhaustive scan of boundaries where both feature and target change.
    Linear,
    /// Exhaustive scan of every distinct feature-value boundary.
    UniqueThresholds,
    /// Coarse pass over `n_buckets` evenly spaced candidates, then a refine
    /// pass around the coarse winner.
    Bucketed {
        /// Number of coarse buckets.
        n_buckets: usize,
    },
    /// One uniformly drawn threshold per feature (extremely randomized trees).
    Random,
}

impl SplitMethod {
    /// Build the searcher for this method.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidMinSplitSize`], [`TreeError::InvalidMinLeafWeight`]
    /// or [`TreeError::InvalidBucketCount`] for invalid parameters.
    pub fn searcher(
        self,
        min_split_size: usize,
        min_leaf_weight: f64,
        seed: u64,
    ) -> Result<Box<dyn SplitSearcher>, TreeError> {
        let searcher: Box<dyn SplitSearcher> = match self {
            SplitMethod::Linear => Box::new(
                LinearSplitSearcher::new(min_split_size)?.with_min_leaf_weight(min_leaf_weight)?,
            ),
            SplitMethod::UniqueThresholds => Box::new(
                LinearSplitSearcher::unique_thresholds(min_split_size)?
                    .with_min_leaf_weight(min_leaf_weight)?,
            ),
            SplitMethod::Bucketed { n_buckets } => Box::new(
                BucketedSplitSearcher::new(min_split_size, n_buckets)?
                    .with_min_leaf_weight(min_leaf_weight)?,
            ),
            SplitMethod::Random => Box::new(
                RandomSplitSearcher::new(min_split_size, seed)?.with_min_leaf_weight(min_leaf_weight)?,
            ),
        };
        Ok(searcher)
    }
}

pub(crate) fn validate_min_split_size(min_split_size: usize) -> Result<(), TreeError> {
    if min_split_size == 0 {
        return Err(TreeError::InvalidMinSplitSize { min_split_size });
    }
    Ok(())
}

pub(crate) fn validate_min_leaf_weight(min_leaf_weight: f64) -> Result<(), TreeError> {
    if !min_leaf_weight.is_finite() || min_leaf_weight < 0.0 {
        return Err(TreeError::InvalidMinLeafWeight { min_leaf_weight });
    }
    Ok(())
}

//! Incremental impurity statistics over an interval of the working buffers.
//!
//! A calculator is initialised over a node's interval with every sample on
//! the right of the split boundary. Split searchers then slide the boundary
//! forward one position at a time with [`ImpurityCalculator::update_index`],
//! which moves the newly passed samples from the right totals to the left
//! totals in constant time per sample.

use crate::interval::Interval;

/// Targets and optional weights of the working buffers, borrowed per call.
///
/// Positions are positions in the working buffers, not observation rows.
/// An empty `weights` slice means every sample weighs 1.0.
#[derive(Debug, Clone, Copy)]
pub struct WeightedTargets<'a> {
    /// Target value per position.
    pub targets: &'a [f64],
    /// Weight per position, or empty for uniform weights.
    pub weights: &'a [f64],
}

impl<'a> WeightedTargets<'a> {
    /// Uniformly weighted targets.
    #[must_use]
    pub fn unweighted(targets: &'a [f64]) -> Self {
        Self {
            targets,
            weights: &[],
        }
    }

    /// Targets with one weight per position.
    #[must_use]
    pub fn weighted(targets: &'a [f64], weights: &'a [f64]) -> Self {
        Self { targets, weights }
    }

    /// Weight at `position`.
    #[inline]
    #[must_use]
    pub fn weight(&self, position: usize) -> f64 {
        if self.weights.is_empty() {
            1.0
        } else {
            self.weights[position]
        }
    }

    /// Target at `position`.
    #[inline]
    #[must_use]
    pub fn target(&self, position: usize) -> f64 {
        self.targets[position]
    }
}

/// Impurities of the two sides of the current split boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildImpurities {
    /// Impurity of `[from, boundary)`.
    pub left: f64,
    /// Impurity of `[boundary, to)`.
    pub right: f64,
}

/// Running impurity statistics for one node.
///
/// Implementations keep totals for the whole interval and for each side of a
/// split boundary that only moves forward between resets.
pub trait ImpurityCalculator: Send {
    /// Start a node: record the distinct targets and accumulate totals over `interval`.
    ///
    /// The boundary is placed at `interval.from`, so every sample is on the right.
    fn init(&mut self, target_names: &[f64], data: WeightedTargets<'_>, interval: Interval);

    /// Recompute totals for a new interval, keeping the distinct targets from [`Self::init`].
    fn update_interval(&mut self, data: WeightedTargets<'_>, interval: Interval);

    /// Move the boundary back to the start of the current interval.
    fn reset(&mut self);

    /// Move the boundary forward to `new_position`.
    ///
    /// # Panics
    ///
    /// Panics if `new_position` is behind the current boundary or past the
    /// end of the interval.
    fn update_index(&mut self, data: WeightedTargets<'_>, new_position: usize);

    /// Impurity of the whole current interval.
    fn node_impurity(&self) -> f64;

    /// Impurities of both sides of the current boundary.
    fn child_impurities(&self) -> ChildImpurities;

    /// Weighted impurity reduction achieved by the current boundary.
    fn impurity_improvement(&self, parent_impurity: f64) -> f64;

    /// Prediction for a leaf covering the current interval.
    fn leaf_value(&self) -> f64;

    /// Per-class probabilities for a leaf covering the current interval,
    /// aligned with the distinct targets. Empty for regression.
    fn leaf_probabilities(&self) -> Vec<f64>;

    /// Total weight left of the boundary.
    fn weighted_left(&self) -> f64;

    /// Total weight right of the boundary.
    fn weighted_right(&self) -> f64;
}

pub(crate) fn check_forward(current: usize, new_position: usize, interval: Interval) {
    assert!(
        new_position >= current,
        "split boundary can only move forward: at {current}, asked for {new_position}"
    );
    assert!(
        new_position <= interval.to,
        "split boundary {new_position} is past the end of interval {interval}"
    );
}

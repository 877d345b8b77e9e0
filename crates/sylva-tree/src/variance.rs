//! Weighted variance impurity for regression.

use crate::impurity::{ChildImpurities, ImpurityCalculator, WeightedTargets, check_forward};
use crate::interval::Interval;

/// Weighted sum, sum of squares and total weight of one side of a boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Moments {
    weight: f64,
    sum: f64,
    sq_sum: f64,
}

impl Moments {
    #[inline]
    fn add(&mut self, target: f64, weight: f64) {
        self.weight += weight;
        self.sum += weight * target;
        self.sq_sum += weight * target * target;
    }

    #[inline]
    fn remove(&mut self, target: f64, weight: f64) {
        self.weight -= weight;
        self.sum -= weight * target;
        self.sq_sum -= weight * target * target;
    }

    fn mean(&self) -> f64 {
        if self.weight > 0.0 { self.sum / self.weight } else { 0.0 }
    }

    // Naive E[x^2] - E[x]^2, kept for speed.
    fn variance(&self) -> f64 {
        if self.weight <= 0.0 {
            return 0.0;
        }
        let mean = self.mean();
        self.sq_sum / self.weight - mean * mean
    }
}

/// Regression impurity: the weighted variance of the targets.
///
/// The improvement of a boundary is the weighted variance reduction
/// `parent - wl/W * var_left - wr/W * var_right`, which for variance
/// reduces to `wl * wr * (mean_left - mean_right)^2 / W^2`. The closed
/// form is what gets evaluated, so the result never exceeds the node
/// variance and is never negative.
#[derive(Debug, Clone, Default)]
pub struct RegressionImpurityCalculator {
    interval: Interval,
    current: usize,
    total: Moments,
    left: Moments,
    right: Moments,
}

impl RegressionImpurityCalculator {
    /// Create an uninitialised calculator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImpurityCalculator for RegressionImpurityCalculator {
    fn init(&mut self, _target_names: &[f64], data: WeightedTargets<'_>, interval: Interval) {
        self.update_interval(data, interval);
    }

    fn update_interval(&mut self, data: WeightedTargets<'_>, interval: Interval) {
        self.interval = interval;
        self.total = Moments::default();
        for position in interval.positions() {
            self.total.add(data.target(position), data.weight(position));
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.current = self.interval.from;
        self.left = Moments::default();
        self.right = self.total;
    }

    fn update_index(&mut self, data: WeightedTargets<'_>, new_position: usize) {
        check_forward(self.current, new_position, self.interval);
        for position in self.current..new_position {
            let target = data.target(position);
            let weight = data.weight(position);
            self.left.add(target, weight);
            self.right.remove(target, weight);
        }
        self.current = new_position;
    }

    fn node_impurity(&self) -> f64 {
        self.total.variance()
    }

    fn child_impurities(&self) -> ChildImpurities {
        ChildImpurities {
            left: self.left.variance(),
            right: self.right.variance(),
        }
    }

    fn impurity_improvement(&self, _parent_impurity: f64) -> f64 {
        let total = self.total.weight;
        if self.left.weight <= 0.0 || self.right.weight <= 0.0 || total <= 0.0 {
            return 0.0;
        }
        let diff = self.left.mean() - self.right.mean();
        self.left.weight * self.right.weight * diff * diff / (total * total)
    }

    fn leaf_value(&self) -> f64 {
        self.total.mean()
    }

    fn leaf_probabilities(&self) -> Vec<f64> {
        Vec::new()
    }

    fn weighted_left(&self) -> f64 {
        self.left.weight
    }

    fn weighted_right(&self) -> f64 {
        self.right.weight
    }
}

//! Gini impurity with weighted class counts.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use crate::impurity::{ChildImpurities, ImpurityCalculator, WeightedTargets, check_forward};
use crate::interval::Interval;

/// How a classification leaf turns class weights into probabilities.
pub trait LeafEstimate: fmt::Debug + Default + Clone + Send + Sync + 'static {
    /// Probability of a class with weight `count` in a leaf of weight `total`
    /// drawn from `n_classes` distinct classes.
    fn probability(count: f64, total: f64, n_classes: usize) -> f64;
}

/// Plain relative frequency, `count / total`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Frequency;

impl LeafEstimate for Frequency {
    fn probability(count: f64, total: f64, _n_classes: usize) -> f64 {
        if total > 0.0 { count / total } else { 0.0 }
    }
}

/// Add-one smoothing, `(count + 1) / (total + n_classes)`.
///
/// No class gets a zero probability, which calibrates single trees better.
#[derive(Debug, Default, Clone, Copy)]
pub struct Laplace;

impl LeafEstimate for Laplace {
    fn probability(count: f64, total: f64, n_classes: usize) -> f64 {
        (count + 1.0) / (total + n_classes as f64)
    }
}

/// Gini impurity calculator, generic over the leaf probability estimate.
///
/// Class ids must be integral. Each distinct target owns one slot of the
/// count tables, in `target_names` order, whatever its magnitude or sign.
#[derive(Debug, Clone)]
pub struct GiniImpurityCalculator<E: LeafEstimate = Frequency> {
    interval: Interval,
    current: usize,
    target_names: Vec<f64>,
    slots: HashMap<u64, usize>,
    weighted_total: f64,
    weighted_left: f64,
    weighted_right: f64,
    total: Vec<f64>,
    left: Vec<f64>,
    right: Vec<f64>,
    estimate: PhantomData<E>,
}

/// Gini calculator whose leaves report plain class frequencies.
pub type FrequencyGiniImpurityCalculator = GiniImpurityCalculator<Frequency>;

/// Gini calculator whose leaves report Laplace-smoothed probabilities.
pub type LaplaceGiniImpurityCalculator = GiniImpurityCalculator<Laplace>;

impl<E: LeafEstimate> GiniImpurityCalculator<E> {
    /// Create an uninitialised calculator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            interval: Interval::of_len(0),
            current: 0,
            target_names: Vec::new(),
            slots: HashMap::new(),
            weighted_total: 0.0,
            weighted_left: 0.0,
            weighted_right: 0.0,
            total: Vec::new(),
            left: Vec::new(),
            right: Vec::new(),
            estimate: PhantomData,
        }
    }

    /// Count-table slot of a target; every target is one of `target_names`.
    #[inline]
    fn slot(&self, target: f64) -> usize {
        self.slots[&(target + 0.0).to_bits()]
    }

    fn gini(counts: &[f64], weight: f64) -> f64 {
        if weight <= 0.0 {
            return 0.0;
        }
        let sum_sq: f64 = counts
            .iter()
            .map(|&count| {
                let p = count / weight;
                p * p
            })
            .sum();
        1.0 - sum_sq
    }
}

impl<E: LeafEstimate> Default for GiniImpurityCalculator<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: LeafEstimate> ImpurityCalculator for GiniImpurityCalculator<E> {
    fn init(&mut self, target_names: &[f64], data: WeightedTargets<'_>, interval: Interval) {
        self.target_names.clear();
        self.target_names.extend_from_slice(target_names);

        self.slots.clear();
        for &name in target_names {
            let next = self.slots.len();
            self.slots.entry((name + 0.0).to_bits()).or_insert(next);
        }
        let size = self.slots.len();
        self.total = vec![0.0; size];
        self.left = vec![0.0; size];
        self.right = vec![0.0; size];

        self.update_interval(data, interval);
    }

    fn update_interval(&mut self, data: WeightedTargets<'_>, interval: Interval) {
        self.interval = interval;
        self.total.fill(0.0);
        self.weighted_total = 0.0;
        for position in interval.positions() {
            let w = data.weight(position);
            let slot = self.slot(data.target(position));
            self.total[slot] += w;
            self.weighted_total += w;
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.current = self.interval.from;
        self.left.fill(0.0);
        self.right.copy_from_slice(&self.total);
        self.weighted_left = 0.0;
        self.weighted_right = self.weighted_total;
    }

    fn update_index(&mut self, data: WeightedTargets<'_>, new_position: usize) {
        check_forward(self.current, new_position, self.interval);
        for position in self.current..new_position {
            let w = data.weight(position);
            let slot = self.slot(data.target(position));
            self.left[slot] += w;
            self.right[slot] -= w;
            self.weighted_left += w;
            self.weighted_right -= w;
        }
        self.current = new_position;
    }

    fn node_impurity(&self) -> f64 {
        Self::gini(&self.total, self.weighted_total)
    }

    fn child_impurities(&self) -> ChildImpurities {
        ChildImpurities {
            left: Self::gini(&self.left, self.weighted_left),
            right: Self::gini(&self.right, self.weighted_right),
        }
    }

    fn impurity_improvement(&self, parent_impurity: f64) -> f64 {
        if self.weighted_total <= 0.0 {
            return 0.0;
        }
        let children = self.child_impurities();
        parent_impurity
            - self.weighted_left / self.weighted_total * children.left
            - self.weighted_right / self.weighted_total * children.right
    }

    fn leaf_value(&self) -> f64 {
        let mut best_value = 0.0;
        let mut best_weight = 0.0;
        for (&name, &weight) in self.target_names.iter().zip(&self.total) {
            if weight > best_weight {
                best_weight = weight;
                best_value = name;
            }
        }
        best_value
    }

    fn leaf_probabilities(&self) -> Vec<f64> {
        let n_classes = self.target_names.len();
        self.total
            .iter()
            .map(|&count| E::probability(count, self.weighted_total, n_classes))
            .collect()
    }

    fn weighted_left(&self) -> f64 {
        self.weighted_left
    }

    fn weighted_right(&self) -> f64 {
        self.weighted_right
    }
}

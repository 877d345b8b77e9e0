//! Trained forest models: vote and average over member trees.

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use sylva_tree::{
    ClassificationDecisionTreeModel, F64Matrix, ProbabilityPrediction, RankedFeature,
    RegressionDecisionTreeModel, rank_features,
};

use crate::error::ForestError;
use crate::forest::sum_importance;

/// Highest-scoring class; ties go to the lowest class value.
fn arg_max(scores: &[(f64, f64)]) -> Option<f64> {
    scores
        .iter()
        .copied()
        .reduce(|best, (class, score)| {
            if score > best.1 || (score == best.1 && class < best.0) {
                (class, score)
            } else {
                best
            }
        })
        .map(|(class, _)| class)
}

fn accumulate(scores: &mut Vec<(f64, f64)>, class: f64, amount: f64) {
    match scores.iter_mut().find(|(c, _)| *c == class) {
        Some((_, score)) => *score += amount,
        None => scores.push((class, amount)),
    }
}

/// A trained classification forest.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClassificationForestModel {
    trees: Vec<ClassificationDecisionTreeModel>,
    raw_variable_importance: Vec<f64>,
}

impl ClassificationForestModel {
    /// Wrap trained trees; importance is summed across them. Learners never produce an empty forest.
    pub(crate) fn new(trees: Vec<ClassificationDecisionTreeModel>) -> Self {
        let n_features = trees.first().map_or(0, |t| t.tree().n_features());
        let raw_variable_importance =
            sum_importance(n_features, trees.iter().map(|t| t.raw_variable_importance()));
        Self {
            trees,
            raw_variable_importance,
        }
    }

    /// Majority vote over the trees.
    ///
    /// # Errors
    ///
    /// Returns a prediction error from the first tree that rejects the
    /// observation, or [`ForestError::EmptyForest`] for a forest without trees.
    pub fn predict(&self, observation: &[f64]) -> Result<f64, ForestError> {
        let mut votes: Vec<(f64, f64)> = Vec::new();
        for tree in &self.trees {
            accumulate(&mut votes, tree.predict(observation)?, 1.0);
        }
        arg_max(&votes).ok_or(ForestError::EmptyForest)
    }

    /// Predict every row of `observations` in parallel.
    ///
    /// # Errors
    ///
    /// Returns a prediction error on a wrong column count.
    pub fn predict_matrix(&self, observations: &F64Matrix) -> Result<Vec<f64>, ForestError> {
        (0..observations.rows())
            .into_par_iter()
            .map(|row| self.predict(observations.row(row)))
            .collect()
    }

    /// Per-class mean of the tree probabilities; the prediction is the most
    /// probable class. Classes are listed in ascending order.
    ///
    /// # Errors
    ///
    /// Returns a prediction error from the first tree that rejects the
    /// observation, or [`ForestError::EmptyForest`] for a forest without trees.
    pub fn predict_probability(&self, observation: &[f64]) -> Result<ProbabilityPrediction, ForestError> {
        let mut probabilities: Vec<(f64, f64)> = Vec::new();
        for tree in &self.trees {
            for (class, p) in tree.predict_probability(observation)?.probabilities {
                accumulate(&mut probabilities, class, p);
            }
        }
        let n_trees = self.trees.len() as f64;
        for (_, p) in &mut probabilities {
            *p /= n_trees;
        }
        probabilities.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(ProbabilityPrediction {
            prediction: arg_max(&probabilities).ok_or(ForestError::EmptyForest)?,
            probabilities,
        })
    }

    /// Class distributions for every row of `observations`, in parallel.
    ///
    /// # Errors
    ///
    /// Returns a prediction error on a wrong column count.
    pub fn predict_probability_matrix(
        &self,
        observations: &F64Matrix,
    ) -> Result<Vec<ProbabilityPrediction>, ForestError> {
        (0..observations.rows())
            .into_par_iter()
            .map(|row| self.predict_probability(observations.row(row)))
            .collect()
    }

    /// Importance per feature column, summed across trees.
    #[must_use]
    pub fn raw_variable_importance(&self) -> &[f64] {
        &self.raw_variable_importance
    }

    /// Importance keyed by name, scaled to 0-100 and sorted descending.
    ///
    /// # Errors
    ///
    /// Returns an error if the names do not match the feature count.
    pub fn variable_importance(&self, feature_names: &[String]) -> Result<Vec<RankedFeature>, ForestError> {
        Ok(rank_features(&self.raw_variable_importance, feature_names)?)
    }

    /// The member trees, in seed order.
    #[must_use]
    pub fn trees(&self) -> &[ClassificationDecisionTreeModel] {
        &self.trees
    }
}

/// A trained regression forest.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RegressionForestModel {
    trees: Vec<RegressionDecisionTreeModel>,
    raw_variable_importance: Vec<f64>,
}

impl RegressionForestModel {
    /// Wrap trained trees; importance is summed across them. Learners never produce an empty forest.
    pub(crate) fn new(trees: Vec<RegressionDecisionTreeModel>) -> Self {
        let n_features = trees.first().map_or(0, |t| t.tree().n_features());
        let raw_variable_importance =
            sum_importance(n_features, trees.iter().map(|t| t.raw_variable_importance()));
        Self {
            trees,
            raw_variable_importance,
        }
    }

    /// Mean of the tree predictions.
    ///
    /// # Errors
    ///
    /// Returns a prediction error from the first tree that rejects the
    /// observation, or [`ForestError::EmptyForest`] for a forest without trees.
    pub fn predict(&self, observation: &[f64]) -> Result<f64, ForestError> {
        if self.trees.is_empty() {
            return Err(ForestError::EmptyForest);
        }
        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.predict(observation)?;
        }
        Ok(sum / self.trees.len() as f64)
    }

    /// Predict every row of `observations` in parallel.
    ///
    /// # Errors
    ///
    /// Returns a prediction error on a wrong column count.
    pub fn predict_matrix(&self, observations: &F64Matrix) -> Result<Vec<f64>, ForestError> {
        (0..observations.rows())
            .into_par_iter()
            .map(|row| self.predict(observations.row(row)))
            .collect()
    }

    /// Importance per feature column, summed across trees.
    #[must_use]
    pub fn raw_variable_importance(&self) -> &[f64] {
        &self.raw_variable_importance
    }

    /// Importance keyed by name, scaled to 0-100 and sorted descending.
    ///
    /// # Errors
    ///
    /// Returns an error if the names do not match the feature count.
    pub fn variable_importance(&self, feature_names: &[String]) -> Result<Vec<RankedFeature>, ForestError> {
        Ok(rank_features(&self.raw_variable_importance, feature_names)?)
    }

    /// The member trees, in seed order.
    #[must_use]
    pub fn trees(&self) -> &[RegressionDecisionTreeModel] {
        &self.trees
    }
}

//! Trained decision-tree models.

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::TreeError;
use crate::importance::{RankedFeature, rank_features};
use crate::matrix::F64Matrix;
use crate::tree::{BinaryTree, ProbabilityPrediction};

fn predict_matrix(tree: &BinaryTree, observations: &F64Matrix) -> Result<Vec<f64>, TreeError> {
    (0..observations.rows())
        .into_par_iter()
        .map(|row| tree.predict(observations.row(row)))
        .collect()
}

fn predict_rows(
    tree: &BinaryTree,
    observations: &F64Matrix,
    indices: &[usize],
) -> Result<Vec<f64>, TreeError> {
    indices
        .iter()
        .map(|&row| {
            if row >= observations.rows() {
                return Err(TreeError::IndexOutOfRange {
                    index: row,
                    rows: observations.rows(),
                });
            }
            tree.predict(observations.row(row))
        })
        .collect()
}

/// A trained classification tree.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClassificationDecisionTreeModel {
    tree: BinaryTree,
}

impl ClassificationDecisionTreeModel {
    /// Wrap a classification tree.
    #[must_use]
    pub fn new(tree: BinaryTree) -> Self {
        Self { tree }
    }

    /// Predict the class of one observation.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::PredictionFeatureMismatch`] on a wrong observation length.
    pub fn predict(&self, observation: &[f64]) -> Result<f64, TreeError> {
        self.tree.predict(observation)
    }

    /// Predict every row of `observations` in parallel.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::PredictionFeatureMismatch`] on a wrong column count.
    pub fn predict_matrix(&self, observations: &F64Matrix) -> Result<Vec<f64>, TreeError> {
        predict_matrix(&self.tree, observations)
    }

    /// Predict the rows of `observations` listed in `indices`, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::IndexOutOfRange`] for an unknown row, or
    /// [`TreeError::PredictionFeatureMismatch`] on a wrong column count.
    pub fn predict_rows(&self, observations: &F64Matrix, indices: &[usize]) -> Result<Vec<f64>, TreeError> {
        predict_rows(&self.tree, observations, indices)
    }

    /// Predict the class and class distribution of one observation.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::PredictionFeatureMismatch`] on a wrong observation length.
    pub fn predict_probability(&self, observation: &[f64]) -> Result<ProbabilityPrediction, TreeError> {
        self.tree.predict_probability(observation)
    }

    /// Predict class distributions for every row of `observations` in parallel.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::PredictionFeatureMismatch`] on a wrong column count.
    pub fn predict_probability_matrix(
        &self,
        observations: &F64Matrix,
    ) -> Result<Vec<ProbabilityPrediction>, TreeError> {
        (0..observations.rows())
            .into_par_iter()
            .map(|row| self.tree.predict_probability(observations.row(row)))
            .collect()
    }

    /// Raw importance per feature column.
    #[must_use]
    pub fn raw_variable_importance(&self) -> &[f64] {
        self.tree.variable_importance()
    }

    /// Importance keyed by name, scaled to 0-100 and sorted descending.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::FeatureNameCountMismatch`] if the names do not
    /// match the feature count.
    pub fn variable_importance(&self, feature_names: &[String]) -> Result<Vec<RankedFeature>, TreeError> {
        rank_features(self.tree.variable_importance(), feature_names)
    }

    /// The underlying tree.
    #[must_use]
    pub fn tree(&self) -> &BinaryTree {
        &self.tree
    }
}

/// A trained regression tree.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RegressionDecisionTreeModel {
    tree: BinaryTree,
}

impl RegressionDecisionTreeModel {
    /// Wrap a regression tree.
    #[must_use]
    pub fn new(tree: BinaryTree) -> Self {
        Self { tree }
    }

    /// Predict the value of one observation.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::PredictionFeatureMismatch`] on a wrong observation length.
    pub fn predict(&self, observation: &[f64]) -> Result<f64, TreeError> {
        self.tree.predict(observation)
    }

    /// Predict every row of `observations` in parallel.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::PredictionFeatureMismatch`] on a wrong column count.
    pub fn predict_matrix(&self, observations: &F64Matrix) -> Result<Vec<f64>, TreeError> {
        predict_matrix(&self.tree, observations)
    }

    /// Predict the rows of `observations` listed in `indices`, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::IndexOutOfRange`] for an unknown row, or
    /// [`TreeError::PredictionFeatureMismatch`] on a wrong column count.
    pub fn predict_rows(&self, observations: &F64Matrix, indices: &[usize]) -> Result<Vec<f64>, TreeError> {
        predict_rows(&self.tree, observations, indices)
    }

    /// Raw importance per feature column.
    #[must_use]
    pub fn raw_variable_importance(&self) -> &[f64] {
        self.tree.variable_importance()
    }

    /// Importance keyed by name, scaled to 0-100 and sorted descending.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::FeatureNameCountMismatch`] if the names do not
    /// match the feature count.
    pub fn variable_importance(&self, feature_names: &[String]) -> Result<Vec<RankedFeature>, TreeError> {
        rank_features(self.tree.variable_importance(), feature_names)
    }

    /// The underlying tree.
    #[must_use]
    pub fn tree(&self) -> &BinaryTree {
        &self.tree
    }
}

//! Decision-tree learners: validated configuration plus input checks.

use tracing::{debug, instrument};

use crate::checks::{validate_class_labels, validate_training};
use crate::config::{DecisionTreeConfig, ProbabilityEstimate};
use crate::error::TreeError;
use crate::gini::{FrequencyGiniImpurityCalculator, LaplaceGiniImpurityCalculator};
use crate::impurity::ImpurityCalculator;
use crate::matrix::F64Matrix;
use crate::model::{ClassificationDecisionTreeModel, RegressionDecisionTreeModel};
use crate::variance::RegressionImpurityCalculator;

fn all_rows(observations: &F64Matrix) -> Vec<usize> {
    (0..observations.rows()).collect()
}

/// Learns classification trees with Gini impurity.
#[derive(Debug, Clone)]
pub struct ClassificationDecisionTreeLearner {
    config: DecisionTreeConfig,
    estimate: ProbabilityEstimate,
}

impl ClassificationDecisionTreeLearner {
    /// Create a learner; the configuration is validated here.
    ///
    /// # Errors
    ///
    /// Returns the first invalid configuration parameter.
    pub fn new(config: DecisionTreeConfig) -> Result<Self, TreeError> {
        config.builder(Box::new(FrequencyGiniImpurityCalculator::new()))?;
        Ok(Self {
            config,
            estimate: ProbabilityEstimate::default(),
        })
    }

    /// Set how leaves estimate class probabilities.
    #[must_use]
    pub fn with_probability_estimate(mut self, estimate: ProbabilityEstimate) -> Self {
        self.estimate = estimate;
        self
    }

    /// Return the configuration.
    #[must_use]
    pub fn config(&self) -> &DecisionTreeConfig {
        &self.config
    }

    /// Learn from every row with uniform weights.
    ///
    /// # Errors
    ///
    /// Returns a [`TreeError`] for inconsistent or invalid training data.
    pub fn learn(&self, observations: &F64Matrix, targets: &[f64]) -> Result<ClassificationDecisionTreeModel, TreeError> {
        self.learn_indexed_weighted(observations, targets, &all_rows(observations), &[])
    }

    /// Learn from every row with one weight per row.
    ///
    /// # Errors
    ///
    /// Returns a [`TreeError`] for inconsistent or invalid training data.
    pub fn learn_weighted(
        &self,
        observations: &F64Matrix,
        targets: &[f64],
        weights: &[f64],
    ) -> Result<ClassificationDecisionTreeModel, TreeError> {
        self.learn_indexed_weighted(observations, targets, &all_rows(observations), weights)
    }

    /// Learn from the rows listed in `indices`.
    ///
    /// # Errors
    ///
    /// Returns a [`TreeError`] for inconsistent or invalid training data.
    pub fn learn_indexed(
        &self,
        observations: &F64Matrix,
        targets: &[f64],
        indices: &[usize],
    ) -> Result<ClassificationDecisionTreeModel, TreeError> {
        self.learn_indexed_weighted(observations, targets, indices, &[])
    }

    /// Learn from the rows listed in `indices` with per-row weights.
    ///
    /// # Errors
    ///
    /// Returns a [`TreeError`] for inconsistent or invalid training data,
    /// including non-integral class labels.
    #[instrument(skip_all, fields(n_rows = indices.len(), n_features = observations.cols()))]
    pub fn learn_indexed_weighted(
        &self,
        observations: &F64Matrix,
        targets: &[f64],
        indices: &[usize],
        weights: &[f64],
    ) -> Result<ClassificationDecisionTreeModel, TreeError> {
        validate_training(observations, targets, indices, weights)?;
        validate_class_labels(targets)?;
        let calculator: Box<dyn ImpurityCalculator> = match self.estimate {
            ProbabilityEstimate::LaplaceAdjusted => Box::new(LaplaceGiniImpurityCalculator::new()),
            ProbabilityEstimate::Frequency => Box::new(FrequencyGiniImpurityCalculator::new()),
        };
        let tree = self
            .config
            .builder(calculator)?
            .grow(observations, targets, indices, weights)?;
        debug!(n_classes = tree.target_names().len(), "classification tree learned");
        Ok(ClassificationDecisionTreeModel::new(tree))
    }
}

/// Learns regression trees with variance impurity.
#[derive(Debug, Clone)]
pub struct RegressionDecisionTreeLearner {
    config: DecisionTreeConfig,
}

impl RegressionDecisionTreeLearner {
    /// Create a learner; the configuration is validated here.
    ///
    /// # Errors
    ///
    /// Returns the first invalid configuration parameter.
    pub fn new(config: DecisionTreeConfig) -> Result<Self, TreeError> {
        config.builder(Box::new(RegressionImpurityCalculator::new()))?;
        Ok(Self { config })
    }

    /// Return the configuration.
    #[must_use]
    pub fn config(&self) -> &DecisionTreeConfig {
        &self.config
    }

    /// Learn from every row with uniform weights.
    ///
    /// # Errors
    ///
    /// Returns a [`TreeError`] for inconsistent or invalid training data.
    pub fn learn(&self, observations: &F64Matrix, targets: &[f64]) -> Result<RegressionDecisionTreeModel, TreeError> {
        self.learn_indexed_weighted(observations, targets, &all_rows(observations), &[])
    }

    /// Learn from every row with one weight per row.
    ///
    /// # Errors
    ///
    /// Returns a [`TreeError`] for inconsistent or invalid training data.
    pub fn learn_weighted(
        &self,
        observations: &F64Matrix,
        targets: &[f64],
        weights: &[f64],
    ) -> Result<RegressionDecisionTreeModel, TreeError> {
        self.learn_indexed_weighted(observations, targets, &all_rows(observations), weights)
    }

    /// Learn from the rows listed in `indices`.
    ///
    /// # Errors
    ///
    /// Returns a [`TreeError`] for inconsistent or invalid training data.
    pub fn learn_indexed(
        &self,
        observations: &F64Matrix,
        targets: &[f64],
        indices: &[usize],
    ) -> Result<RegressionDecisionTreeModel, TreeError> {
        self.learn_indexed_weighted(observations, targets, indices, &[])
    }

    /// Learn from the rows listed in `indices` with per-row weights.
    ///
    /// # Errors
    ///
    /// Returns a [`TreeError`] for inconsistent or invalid training data.
    #[instrument(skip_all, fields(n_rows = indices.len(), n_features = observations.cols()))]
    pub fn learn_indexed_weighted(
        &self,
        observations: &F64Matrix,
        targets: &[f64],
        indices: &[usize],
        weights: &[f64],
    ) -> Result<RegressionDecisionTreeModel, TreeError> {
        let tree = self
            .config
            .builder(Box::new(RegressionImpurityCalculator::new()))?
            .build(observations, targets, indices, weights)?;
        debug!(n_leaves = tree.n_leaves(), "regression tree learned");
        Ok(RegressionDecisionTreeModel::new(tree))
    }
}

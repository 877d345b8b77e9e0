//! Forest learners: random forests and extremely randomized trees.

use sylva_tree::{
    ClassificationDecisionTreeLearner, F64Matrix, ProbabilityEstimate, RegressionDecisionTreeLearner,
};
use tracing::instrument;

use crate::config::{ForestConfig, MaxFeatures};
use crate::error::ForestError;
use crate::forest::grow_forest;
use crate::model::{ClassificationForestModel, RegressionForestModel};

/// Learns classification forests of Gini trees.
///
/// `MaxFeatures::Default` resolves to the square root of the feature count.
#[derive(Debug, Clone)]
pub struct ClassificationForestLearner {
    config: ForestConfig,
    estimate: ProbabilityEstimate,
}

impl ClassificationForestLearner {
    /// Create a learner; the configuration is validated here.
    ///
    /// # Errors
    ///
    /// Returns the first invalid forest or tree parameter.
    pub fn new(config: ForestConfig) -> Result<Self, ForestError> {
        config.validate()?;
        ClassificationDecisionTreeLearner::new(config.tree_config(0, config.seed))?;
        Ok(Self {
            config,
            estimate: ProbabilityEstimate::default(),
        })
    }

    /// Set how tree leaves estimate class probabilities.
    #[must_use]
    pub fn with_probability_estimate(mut self, estimate: ProbabilityEstimate) -> Self {
        self.estimate = estimate;
        self
    }

    /// Return the configuration.
    #[must_use]
    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Learn from every row.
    ///
    /// # Errors
    ///
    /// Returns a [`ForestError`] for invalid training data or a feature
    /// count that the max features strategy cannot serve.
    pub fn learn(&self, observations: &F64Matrix, targets: &[f64]) -> Result<ClassificationForestModel, ForestError> {
        let indices: Vec<usize> = (0..observations.rows()).collect();
        self.learn_indexed(observations, targets, &indices)
    }

    /// Learn from the rows listed in `indices`; bootstrap samples draw from them.
    ///
    /// # Errors
    ///
    /// Returns a [`ForestError`] for invalid training data or a feature
    /// count that the max features strategy cannot serve.
    #[instrument(skip_all, fields(n_rows = indices.len(), n_features = observations.cols()))]
    pub fn learn_indexed(
        &self,
        observations: &F64Matrix,
        targets: &[f64],
        indices: &[usize],
    ) -> Result<ClassificationForestModel, ForestError> {
        let trees = grow_forest(&self.config, MaxFeatures::Sqrt, observations, indices, |config, sample| {
            ClassificationDecisionTreeLearner::new(config.clone())?
                .with_probability_estimate(self.estimate)
                .learn_indexed(observations, targets, sample)
        })?;
        Ok(ClassificationForestModel::new(trees))
    }
}

/// Learns regression forests of variance trees.
///
/// `MaxFeatures::Default` resolves to a third of the feature count.
#[derive(Debug, Clone)]
pub struct RegressionForestLearner {
    config: ForestConfig,
}

impl RegressionForestLearner {
    /// Create a learner; the configuration is validated here.
    ///
    /// # Errors
    ///
    /// Returns the first invalid forest or tree parameter.
    pub fn new(config: ForestConfig) -> Result<Self, ForestError> {
        config.validate()?;
        RegressionDecisionTreeLearner::new(config.tree_config(0, config.seed))?;
        Ok(Self { config })
    }

    /// Return the configuration.
    #[must_use]
    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Learn from every row.
    ///
    /// # Errors
    ///
    /// Returns a [`ForestError`] for invalid training data or a feature
    /// count that the max features strategy cannot serve.
    pub fn learn(&self, observations: &F64Matrix, targets: &[f64]) -> Result<RegressionForestModel, ForestError> {
        let indices: Vec<usize> = (0..observations.rows()).collect();
        self.learn_indexed(observations, targets, &indices)
    }

    /// Learn from the rows listed in `indices`; bootstrap samples draw from them.
    ///
    /// # Errors
    ///
    /// Returns a [`ForestError`] for invalid training data or a feature
    /// count that the max features strategy cannot serve.
    #[instrument(skip_all, fields(n_rows = indices.len(), n_features = observations.cols()))]
    pub fn learn_indexed(
        &self,
        observations: &F64Matrix,
        targets: &[f64],
        indices: &[usize],
    ) -> Result<RegressionForestModel, ForestError> {
        let trees = grow_forest(&self.config, MaxFeatures::Third, observations, indices, |config, sample| {
            RegressionDecisionTreeLearner::new(config.clone())?.learn_indexed(observations, targets, sample)
        })?;
        Ok(RegressionForestModel::new(trees))
    }
}

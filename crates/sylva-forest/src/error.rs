use sylva_tree::TreeError;

/// Errors from forest configuration, training and prediction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ForestError {
    /// Returned when n_trees is zero.
    #[error("n_trees must be at least 1, got {n_trees}")]
    InvalidTreeCount {
        /// The invalid tree count provided.
        n_trees: usize,
    },

    /// Returned when the sub-sample ratio is not finite and positive.
    #[error("sub_sample_ratio must be finite and positive, got {ratio}")]
    InvalidSubSampleRatio {
        /// The invalid ratio provided.
        ratio: f64,
    },

    /// Returned when the feature fraction is outside (0.0, 1.0].
    #[error("feature fraction must be in (0.0, 1.0], got {fraction}")]
    InvalidFeatureFraction {
        /// The invalid fraction provided.
        fraction: f64,
    },

    /// Returned when a fixed feature count is zero or exceeds the column count.
    #[error("max_features resolved to {max_features}, but the data has {n_features} features")]
    InvalidMaxFeatures {
        /// The resolved number of features per split.
        max_features: usize,
        /// The number of feature columns in the data.
        n_features: usize,
    },

    /// Returned when the sub-sample ratio rounds a tree's sample down to nothing.
    #[error("sub_sample_ratio {ratio} draws no samples from {n_indices} indices")]
    EmptyBootstrap {
        /// The configured ratio.
        ratio: f64,
        /// The number of indices sampled from.
        n_indices: usize,
    },

    /// Returned when a model without trees is asked to predict.
    #[error("the forest has no trees")]
    EmptyForest,

    /// A tree-level configuration, data or prediction error.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

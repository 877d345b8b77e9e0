/// Errors from decision-tree configuration, training and prediction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeError {
    /// Returned when max_depth is zero.
    #[error("max_depth must be at least 1, got {max_depth}")]
    InvalidMaxDepth {
        /// The invalid max_depth value provided.
        max_depth: usize,
    },

    /// Returned when a best-first leaf budget is below 2.
    #[error("max_leaf_count must be at least 2, got {max_leaf_count}")]
    InvalidMaxLeafCount {
        /// The invalid leaf budget provided.
        max_leaf_count: usize,
    },

    /// Returned when min_split_size is zero.
    #[error("min_split_size must be at least 1, got {min_split_size}")]
    InvalidMinSplitSize {
        /// The invalid min_split_size value provided.
        min_split_size: usize,
    },

    /// Returned when min_leaf_weight is negative or not finite.
    #[error("min_leaf_weight must be finite and non-negative, got {min_leaf_weight}")]
    InvalidMinLeafWeight {
        /// The invalid min_leaf_weight value provided.
        min_leaf_weight: f64,
    },

    /// Returned when min_information_gain is not strictly positive.
    #[error("min_information_gain must be finite and positive, got {min_information_gain}")]
    InvalidMinInformationGain {
        /// The invalid min_information_gain value provided.
        min_information_gain: f64,
    },

    /// Returned when the bucketed searcher is given zero buckets.
    #[error("n_buckets must be at least 1, got {n_buckets}")]
    InvalidBucketCount {
        /// The invalid bucket count provided.
        n_buckets: usize,
    },

    /// Returned when features_per_split exceeds the number of columns.
    #[error("features_per_split is {features_per_split}, but the data has {n_features} features")]
    InvalidFeaturesPerSplit {
        /// The requested number of features per split.
        features_per_split: usize,
        /// The number of feature columns in the data.
        n_features: usize,
    },

    /// Returned when the observation matrix has zero rows.
    #[error("training dataset has zero observations")]
    EmptyDataset,

    /// Returned when the observation matrix has zero feature columns.
    #[error("training dataset has zero feature columns")]
    ZeroFeatures,

    /// Returned when a flat buffer does not match the declared matrix shape.
    #[error("matrix of shape {rows}x{cols} needs {expected} values, got {got}")]
    MatrixShapeMismatch {
        /// Declared number of rows.
        rows: usize,
        /// Declared number of columns.
        cols: usize,
        /// Number of values the shape requires.
        expected: usize,
        /// Number of values supplied.
        got: usize,
    },

    /// Returned when rows passed to [`crate::F64Matrix::from_rows`] differ in length.
    #[error("row {row} has {got} values, expected {expected}")]
    RaggedRows {
        /// The expected row length.
        expected: usize,
        /// The actual row length.
        got: usize,
        /// The zero-based index of the offending row.
        row: usize,
    },

    /// Returned when the target vector does not have one entry per observation.
    #[error("expected {expected} targets, got {got}")]
    TargetCountMismatch {
        /// Number of observation rows.
        expected: usize,
        /// Number of targets supplied.
        got: usize,
    },

    /// Returned when a non-empty weight vector does not have one entry per observation.
    #[error("expected {expected} weights (or none), got {got}")]
    WeightCountMismatch {
        /// Number of observation rows.
        expected: usize,
        /// Number of weights supplied.
        got: usize,
    },

    /// Returned when a sample weight is negative or not finite.
    #[error("weight at row {row} must be finite and non-negative, got {weight}")]
    InvalidWeight {
        /// The zero-based row of the offending weight.
        row: usize,
        /// The offending weight.
        weight: f64,
    },

    /// Returned when the training index subset is empty.
    #[error("training index subset is empty")]
    EmptyIndices,

    /// Returned when a training index does not refer to an observation row.
    #[error("index {index} is out of range for {rows} observations")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of observation rows.
        rows: usize,
    },

    /// Returned when an observation value is NaN or infinite.
    #[error("non-finite value at row {row}, feature {feature}")]
    NonFiniteValue {
        /// The zero-based row of the offending value.
        row: usize,
        /// The zero-based feature column of the offending value.
        feature: usize,
    },

    /// Returned when a target value is NaN or infinite.
    #[error("non-finite target at row {row}")]
    NonFiniteTarget {
        /// The zero-based row of the offending target.
        row: usize,
    },

    /// Returned when a classification target is not a whole number.
    #[error("class label {target} at row {row} is not an integer")]
    NonIntegralClassLabel {
        /// The zero-based row of the offending target.
        row: usize,
        /// The offending target value.
        target: f64,
    },

    /// Returned when an observation has a different number of features at prediction time.
    #[error("prediction input has {got} features, expected {expected}")]
    PredictionFeatureMismatch {
        /// The number of features the model was trained on.
        expected: usize,
        /// The number of features supplied.
        got: usize,
    },

    /// Returned when feature names do not line up with the importance vector.
    #[error("expected {expected} feature names, got {got}")]
    FeatureNameCountMismatch {
        /// The number of features the model was trained on.
        expected: usize,
        /// The number of names supplied.
        got: usize,
    },
}

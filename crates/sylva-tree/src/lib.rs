//! Decision-tree induction: grow binary trees for classification and regression.
//!
//! Provides incremental impurity calculators (Gini, variance), split
//! searchers over sorted feature columns (exhaustive, bucketed, extremely
//! randomized), a tree builder with depth-first or leaf-budgeted growth,
//! and the learners and models built on top of them.

mod bucketed;
mod builder;
mod checks;
mod config;
mod error;
mod gini;
mod importance;
mod impurity;
mod interval;
mod learner;
mod linear;
mod matrix;
mod model;
mod node;
mod random_split;
mod split;
mod tree;
mod variance;

#[cfg(test)]
mod test_data;

pub use bucketed::BucketedSplitSearcher;
pub use builder::{Growth, TreeBuilder};
pub use config::{DecisionTreeConfig, ProbabilityEstimate};
pub use error::TreeError;
pub use gini::{
    Frequency, FrequencyGiniImpurityCalculator, GiniImpurityCalculator, Laplace,
    LaplaceGiniImpurityCalculator, LeafEstimate,
};
pub use importance::{RankedFeature, rank_features};
pub use impurity::{ChildImpurities, ImpurityCalculator, WeightedTargets};
pub use interval::Interval;
pub use learner::{ClassificationDecisionTreeLearner, RegressionDecisionTreeLearner};
pub use linear::LinearSplitSearcher;
pub use matrix::F64Matrix;
pub use model::{ClassificationDecisionTreeModel, RegressionDecisionTreeModel};
pub use node::{FeatureIndex, Node, NodeIndex};
pub use random_split::RandomSplitSearcher;
pub use split::{CandidateBoundaries, SplitMethod, SplitResult, SplitSearcher};
pub use tree::{BinaryTree, ProbabilityPrediction};
pub use variance::RegressionImpurityCalculator;

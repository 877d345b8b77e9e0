//! The immutable flat-array tree produced by [`crate::TreeBuilder`].

use std::collections::VecDeque;

use crate::error::TreeError;
use crate::node::{Node, NodeIndex};

/// A predicted value together with its class distribution.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProbabilityPrediction {
    /// The predicted class.
    pub prediction: f64,
    /// `(class, probability)` pairs in distinct-target order.
    pub probabilities: Vec<(f64, f64)>,
}

impl ProbabilityPrediction {
    /// Probability assigned to `target`, or `None` for an unknown class.
    #[must_use]
    pub fn probability(&self, target: f64) -> Option<f64> {
        self.probabilities
            .iter()
            .find(|(class, _)| *class == target)
            .map(|&(_, p)| p)
    }
}

/// Binary decision tree stored as a flat node list.
///
/// The root is node 0. Leaves of classification trees point into a
/// parallel list of probability vectors aligned with [`Self::target_names`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BinaryTree {
    nodes: Vec<Node>,
    probabilities: Vec<Vec<f64>>,
    target_names: Vec<f64>,
    variable_importance: Vec<f64>,
    n_features: usize,
}

impl BinaryTree {
    pub(crate) fn new(
        nodes: Vec<Node>,
        probabilities: Vec<Vec<f64>>,
        target_names: Vec<f64>,
        variable_importance: Vec<f64>,
    ) -> Self {
        let n_features = variable_importance.len();
        Self {
            nodes,
            probabilities,
            target_names,
            variable_importance,
            n_features,
        }
    }

    /// Predict the value for one observation.
    ///
    /// At each split the observation goes left when
    /// `observation[feature] <= threshold`, right otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::PredictionFeatureMismatch`] when the observation
    /// length differs from the number of training features.
    pub fn predict(&self, observation: &[f64]) -> Result<f64, TreeError> {
        self.check_len(observation)?;
        match &self.nodes[self.traverse(observation).index()] {
            Node::Leaf { value, .. } => Ok(*value),
            Node::Split { .. } => unreachable!("traverse always ends at a leaf"),
        }
    }

    /// Predict the class and the class distribution for one observation.
    ///
    /// Regression trees carry no distributions and return an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::PredictionFeatureMismatch`] when the observation
    /// length differs from the number of training features.
    pub fn predict_probability(&self, observation: &[f64]) -> Result<ProbabilityPrediction, TreeError> {
        self.check_len(observation)?;
        match &self.nodes[self.traverse(observation).index()] {
            Node::Leaf {
                value,
                probability_index,
            } => {
                let probabilities = probability_index
                    .map(|i| {
                        self.target_names
                            .iter()
                            .copied()
                            .zip(self.probabilities[i].iter().copied())
                            .collect()
                    })
                    .unwrap_or_default();
                Ok(ProbabilityPrediction {
                    prediction: *value,
                    probabilities,
                })
            }
            Node::Split { .. } => unreachable!("traverse always ends at a leaf"),
        }
    }

    /// Return the index of the leaf an observation falls into.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::PredictionFeatureMismatch`] when the observation
    /// length differs from the number of training features.
    pub fn leaf_index(&self, observation: &[f64]) -> Result<NodeIndex, TreeError> {
        self.check_len(observation)?;
        Ok(self.traverse(observation))
    }

    /// The node list; the root is at position 0.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Per-leaf class probabilities.
    #[must_use]
    pub fn probabilities(&self) -> &[Vec<f64>] {
        &self.probabilities
    }

    /// Distinct training targets in order of first appearance.
    #[must_use]
    pub fn target_names(&self) -> &[f64] {
        &self.target_names
    }

    /// Accumulated impurity improvement per feature, weighted by the share of
    /// training samples reaching each split.
    #[must_use]
    pub fn variable_importance(&self) -> &[f64] {
        &self.variable_importance
    }

    /// Number of features the tree was trained on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Total number of nodes.
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Depth of the deepest leaf. A single-leaf tree has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }
        let mut max_depth = 0usize;
        let mut queue = VecDeque::new();
        queue.push_back((NodeIndex::ROOT, 0usize));
        while let Some((node, d)) = queue.pop_front() {
            match &self.nodes[node.index()] {
                Node::Leaf { .. } => max_depth = max_depth.max(d),
                Node::Split { left, right, .. } => {
                    queue.push_back((*left, d + 1));
                    queue.push_back((*right, d + 1));
                }
            }
        }
        max_depth
    }

    fn check_len(&self, observation: &[f64]) -> Result<(), TreeError> {
        if observation.len() != self.n_features {
            return Err(TreeError::PredictionFeatureMismatch {
                expected: self.n_features,
                got: observation.len(),
            });
        }
        Ok(())
    }

    fn traverse(&self, observation: &[f64]) -> NodeIndex {
        let mut node = NodeIndex::ROOT;
        for _ in 0..=self.nodes.len() {
            match &self.nodes[node.index()] {
                Node::Leaf { .. } => return node,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if observation[feature.index()] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
        unreachable!("tree contains a cycle: no leaf after {} steps", self.nodes.len())
    }
}

use std::fmt;

/// Zero-based feature column index.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    serde::Serialize, serde::Deserialize,
)]
pub struct FeatureIndex(usize);

impl FeatureIndex {
    /// Create a feature index from a zero-based column position.
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based feature column index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FeatureIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of a node in a tree's flat node list. The root is always 0.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    serde::Serialize, serde::Deserialize,
)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// The root node.
    pub const ROOT: NodeIndex = NodeIndex(0);

    /// Create a node index from a zero-based list position.
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based list position.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node in a tree's flat node list.
///
/// Children are referenced by [`NodeIndex`]. A node's own index is its
/// position in the list.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Node {
    /// An internal split node.
    Split {
        /// Feature used for the split.
        feature: FeatureIndex,
        /// Observations with `value <= threshold` go left.
        threshold: f64,
        /// Left child.
        left: NodeIndex,
        /// Right child.
        right: NodeIndex,
    },
    /// A terminal node.
    Leaf {
        /// Predicted value: the majority class or the weighted mean.
        value: f64,
        /// Index into the tree's leaf-probability list (classification only).
        probability_index: Option<usize>,
    },
}

impl Node {
    /// Return `true` if this node is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Return the split feature, or `None` for a leaf.
    #[must_use]
    pub fn feature(&self) -> Option<FeatureIndex> {
        match self {
            Node::Split { feature, .. } => Some(*feature),
            Node::Leaf { .. } => None,
        }
    }

    /// Split threshold for internal nodes, predicted value for leaves.
    #[must_use]
    pub fn value(&self) -> f64 {
        match self {
            Node::Split { threshold, .. } => *threshold,
            Node::Leaf { value, .. } => *value,
        }
    }

    pub(crate) fn set_child(&mut self, side: Side, child: NodeIndex) {
        if let Node::Split { left, right, .. } = self {
            match side {
                Side::Left => *left = child,
                Side::Right => *right = child,
            }
        }
    }
}

/// Which child pointer of a parent a pending node will fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

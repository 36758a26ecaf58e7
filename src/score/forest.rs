//! Decision-tree ensemble in the conifer/scikit-learn array layout.
//!
//! Each tree stores parallel arrays indexed by node id. A node whose left
//! child is `-1` is a leaf; otherwise the sample goes left when
//! `x[feature] <= threshold`. The ensemble score is `base_score` plus the
//! leaf value reached in every tree.

use crate::score::Scorer;
use crate::triplet::{FeatureVector, N_FEATURES};
use crate::util::{W3PiError, W3PiResult};

/// Child index marking a leaf.
pub const LEAF: i32 = -1;

/// One validated regression tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Tree {
    feature: Vec<i32>,
    threshold: Vec<f32>,
    children_left: Vec<i32>,
    children_right: Vec<i32>,
    value: Vec<f32>,
}

impl Tree {
    /// Builds a tree from its node arrays.
    ///
    /// Fails when the arrays differ in length, a child index is out of
    /// range, a split uses an unknown feature, or a node is reachable twice
    /// from the root (which also rules out cycles).
    pub fn new(
        feature: Vec<i32>,
        threshold: Vec<f32>,
        children_left: Vec<i32>,
        children_right: Vec<i32>,
        value: Vec<f32>,
    ) -> W3PiResult<Self> {
        let n = feature.len();
        if n == 0 {
            return Err(invalid("tree has no nodes"));
        }
        if [threshold.len(), children_left.len(), children_right.len(), value.len()]
            .iter()
            .any(|&len| len != n)
        {
            return Err(invalid(format!("tree node arrays differ in length (expected {n})")));
        }

        let tree = Self {
            feature,
            threshold,
            children_left,
            children_right,
            value,
        };
        tree.check_nodes()?;
        tree.check_reachability()?;
        Ok(tree)
    }

    fn check_nodes(&self) -> W3PiResult<()> {
        let n = self.len();
        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == LEAF {
                if right != LEAF {
                    return Err(invalid(format!("node {node} has only a right child")));
                }
                continue;
            }
            for child in [left, right] {
                if child < 0 || child as usize >= n {
                    return Err(invalid(format!("node {node} has child {child} out of range")));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= N_FEATURES {
                return Err(invalid(format!("node {node} splits on unknown feature {feature}")));
            }
        }
        Ok(())
    }

    fn check_reachability(&self) -> W3PiResult<()> {
        let mut seen = vec![false; self.len()];
        let mut stack = vec![0usize];
        while let Some(node) = stack.pop() {
            if seen[node] {
                return Err(invalid(format!("node {node} is reachable more than once")));
            }
            seen[node] = true;
            if !self.is_leaf(node) {
                stack.push(self.children_left[node] as usize);
                stack.push(self.children_right[node] as usize);
            }
        }
        Ok(())
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.feature.len()
    }

    /// Always false; a valid tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.feature.is_empty()
    }

    fn is_leaf(&self, node: usize) -> bool {
        self.children_left[node] == LEAF
    }

    /// Returns the leaf value reached by `x`.
    pub fn evaluate(&self, x: &FeatureVector) -> f32 {
        let mut node = 0usize;
        while !self.is_leaf(node) {
            let feature = self.feature[node] as usize;
            node = if x[feature] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        self.value[node]
    }
}

/// Additive ensemble of trees.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeEnsemble {
    base_score: f32,
    trees: Vec<Tree>,
}

impl TreeEnsemble {
    /// Builds an ensemble from validated trees.
    pub fn new(base_score: f32, trees: Vec<Tree>) -> W3PiResult<Self> {
        if !base_score.is_finite() {
            return Err(invalid("base score is not finite"));
        }
        Ok(Self { base_score, trees })
    }

    /// Number of trees.
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Constant added to the tree sum.
    pub fn base_score(&self) -> f32 {
        self.base_score
    }

    /// Returns the trees.
    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }
}

impl Scorer for TreeEnsemble {
    fn score(&self, features: &FeatureVector) -> f32 {
        self.trees
            .iter()
            .fold(self.base_score, |acc, tree| acc + tree.evaluate(features))
    }
}

fn invalid(reason: impl Into<String>) -> W3PiError {
    W3PiError::InvalidModel {
        reason: reason.into(),
    }
}

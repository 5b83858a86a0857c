//! Decision tree representation shared by the tree ensembles

use serde::{Deserialize, Serialize};

use super::error::InferenceError;

/// A node in a flattened binary decision tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    /// `features[feature] < threshold` descends into `left`, otherwise `right`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf(f64),
}

/// Flattened tree; node 0 is the root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    pub fn new(nodes: Vec<TreeNode>) -> Self {
        Self { nodes }
    }

    /// Walk from the root to a leaf and return its value
    pub fn evaluate(&self, stage: &'static str, features: &[f64]) -> Result<f64, InferenceError> {
        let mut index = 0;

        // A well-formed tree reaches a leaf in fewer hops than it has nodes.
        for _ in 0..=self.nodes.len() {
            let node = self.nodes.get(index).ok_or_else(|| {
                InferenceError::malformed(stage, format!("node {} does not exist", index))
            })?;

            match node {
                TreeNode::Leaf(value) => return Ok(*value),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features.get(*feature).ok_or_else(|| {
                        InferenceError::malformed(
                            stage,
                            format!("split on feature {} outside input", feature),
                        )
                    })?;
                    index = if value < threshold { *left } else { *right };
                }
            }
        }

        Err(InferenceError::malformed(stage, "tree contains a cycle"))
    }

    /// Highest feature index any split reads, if the tree splits at all
    pub fn max_feature(&self) -> Option<usize> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                TreeNode::Split { feature, .. } => Some(*feature),
                TreeNode::Leaf(_) => None,
            })
            .max()
    }
}

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{Classifier, ClassifierError};
use crate::eligibility::encoding::{EncodedFeatureVector, FEATURE_COUNT};

/// Serialized forest as exported from training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestDocument {
    pub n_features: usize,
    pub classes: Vec<i64>,
    pub trees: Vec<TreeNode>,
}

/// A node in one tree of the forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    Split(Split),
    Leaf(Leaf),
}

/// Internal node; samples with `x[feature] <= threshold` go left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub feature: usize,
    pub threshold: f64,
    pub left: Box<TreeNode>,
    pub right: Box<TreeNode>,
}

/// Terminal node holding per-class training weight, aligned with `classes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    pub distribution: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ForestError {
    #[error("forest contains no trees")]
    Empty,
    #[error("forest declares no classes")]
    NoClasses,
    #[error("class code {code} is declared twice")]
    DuplicateClass { code: i64 },
    #[error("forest was trained on {found} features; the encoder produces {expected}")]
    FeatureCount { expected: usize, found: usize },
    #[error("tree {tree} splits on feature {feature}, beyond the {n_features} model features")]
    FeatureIndex {
        tree: usize,
        feature: usize,
        n_features: usize,
    },
    #[error("tree {tree} has a non-finite split threshold")]
    Threshold { tree: usize },
    #[error("tree {tree} has a leaf with {found} class weights; expected {expected}")]
    Distribution {
        tree: usize,
        expected: usize,
        found: usize,
    },
    #[error("tree {tree} has a leaf without positive finite weight")]
    EmptyLeaf { tree: usize },
}

/// Random-forest style classifier: averaged leaf probabilities, argmax class.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionForest {
    classes: Vec<i64>,
    trees: Vec<TreeNode>,
}

impl DecisionForest {
    pub fn classes(&self) -> &[i64] {
        &self.classes
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Mean class probability across trees, aligned with `classes()`.
    pub fn probabilities(
        &self,
        features: &EncodedFeatureVector,
    ) -> Result<Vec<f64>, ClassifierError> {
        let sample = features.as_slice();
        let mut totals = vec![0.0; self.classes.len()];

        for tree in &self.trees {
            let leaf = route(tree, sample)?;
            let weight: f64 = leaf.distribution.iter().sum();
            for (total, value) in totals.iter_mut().zip(&leaf.distribution) {
                *total += value / weight;
            }
        }

        let tree_count = self.trees.len() as f64;
        Ok(totals.into_iter().map(|total| total / tree_count).collect())
    }
}

impl TryFrom<ForestDocument> for DecisionForest {
    type Error = ForestError;

    fn try_from(document: ForestDocument) -> Result<Self, Self::Error> {
        let ForestDocument {
            n_features,
            classes,
            trees,
        } = document;

        if n_features != FEATURE_COUNT {
            return Err(ForestError::FeatureCount {
                expected: FEATURE_COUNT,
                found: n_features,
            });
        }
        if classes.is_empty() {
            return Err(ForestError::NoClasses);
        }
        let mut seen = BTreeSet::new();
        if let Some(code) = classes.iter().find(|code| !seen.insert(**code)) {
            return Err(ForestError::DuplicateClass { code: *code });
        }
        if trees.is_empty() {
            return Err(ForestError::Empty);
        }

        for (index, tree) in trees.iter().enumerate() {
            check_tree(index, tree, n_features, classes.len())?;
        }

        Ok(Self { classes, trees })
    }
}

impl Classifier for DecisionForest {
    fn predict(&self, features: &EncodedFeatureVector) -> Result<i64, ClassifierError> {
        let probabilities = self.probabilities(features)?;

        // strict comparison keeps the lowest class index on ties
        let mut best: Option<(usize, f64)> = None;
        for (index, probability) in probabilities.into_iter().enumerate() {
            match best {
                Some((_, current)) if probability <= current => {}
                _ => best = Some((index, probability)),
            }
        }

        best.and_then(|(index, _)| self.classes.get(index).copied())
            .ok_or(ClassifierError::NoPrediction)
    }
}

fn route<'a>(tree: &'a TreeNode, sample: &[f64]) -> Result<&'a Leaf, ClassifierError> {
    let mut node = tree;
    loop {
        match node {
            TreeNode::Leaf(leaf) => return Ok(leaf),
            TreeNode::Split(split) => {
                let value = sample
                    .get(split.feature)
                    .copied()
                    .ok_or(ClassifierError::FeatureIndex {
                        feature: split.feature,
                        available: sample.len(),
                    })?;
                node = if value <= split.threshold {
                    split.left.as_ref()
                } else {
                    split.right.as_ref()
                };
            }
        }
    }
}

fn check_tree(
    tree: usize,
    root: &TreeNode,
    n_features: usize,
    n_classes: usize,
) -> Result<(), ForestError> {
    let mut pending = vec![root];
    while let Some(node) = pending.pop() {
        match node {
            TreeNode::Split(split) => {
                if split.feature >= n_features {
                    return Err(ForestError::FeatureIndex {
                        tree,
                        feature: split.feature,
                        n_features,
                    });
                }
                if !split.threshold.is_finite() {
                    return Err(ForestError::Threshold { tree });
                }
                pending.push(&split.left);
                pending.push(&split.right);
            }
            TreeNode::Leaf(leaf) => {
                if leaf.distribution.len() != n_classes {
                    return Err(ForestError::Distribution {
                        tree,
                        expected: n_classes,
                        found: leaf.distribution.len(),
                    });
                }
                let valid = leaf
                    .distribution
                    .iter()
                    .all(|weight| weight.is_finite() && *weight >= 0.0);
                let total: f64 = leaf.distribution.iter().sum();
                if !valid || total <= 0.0 {
                    return Err(ForestError::EmptyLeaf { tree });
                }
            }
        }
    }
    Ok(())
}

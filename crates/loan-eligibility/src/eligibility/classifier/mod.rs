mod forest;

pub use forest::{DecisionForest, ForestDocument, ForestError, Leaf, Split, TreeNode};

use super::encoding::EncodedFeatureVector;

/// Prediction contract for the pre-trained model.
///
/// Implementations return the raw class code exactly as the model emits it;
/// mapping that code to a verdict is the decoder's job.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &EncodedFeatureVector) -> Result<i64, ClassifierError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifierError {
    #[error("split on feature {feature} but the input has {available} features")]
    FeatureIndex { feature: usize, available: usize },
    #[error("classifier produced no class")]
    NoPrediction,
}

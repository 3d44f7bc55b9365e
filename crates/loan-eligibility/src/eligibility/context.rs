use std::fmt;

use super::classifier::{Classifier, ClassifierError};
use super::decoder::{DecodeError, LabelTable, PredictionLabel};
use super::domain::{InputError, RawApplication};
use super::encoding::{self, CategoryTables, EncodedFeatureVector, EncodingError, ScalingParameters};

/// Immutable startup state shared by every prediction.
pub struct EligibilityContext {
    tables: CategoryTables,
    scaling: ScalingParameters,
    labels: LabelTable,
    classifier: Box<dyn Classifier>,
}

impl EligibilityContext {
    pub fn new(
        tables: CategoryTables,
        scaling: ScalingParameters,
        labels: LabelTable,
        classifier: impl Classifier + 'static,
    ) -> Self {
        Self {
            tables,
            scaling,
            labels,
            classifier: Box::new(classifier),
        }
    }

    pub fn tables(&self) -> &CategoryTables {
        &self.tables
    }

    pub fn scaling(&self) -> &ScalingParameters {
        &self.scaling
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    pub fn encode(&self, raw: &RawApplication) -> Result<EncodedFeatureVector, EncodingError> {
        encoding::encode(raw, &self.tables, &self.scaling)
    }

    /// Encode, classify, and decode one application.
    pub fn predict_eligibility(
        &self,
        raw: &RawApplication,
    ) -> Result<PredictionLabel, PredictionError> {
        let features = self.encode(raw)?;
        let code = self.classifier.predict(&features)?;
        let label = self.labels.decode(code)?;
        Ok(label)
    }
}

impl fmt::Debug for EligibilityContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EligibilityContext")
            .field("tables", &self.tables)
            .field("scaling", &self.scaling)
            .field("labels", &self.labels)
            .finish_non_exhaustive()
    }
}

/// Request-level prediction failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    #[error("invalid application: {0}")]
    Input(#[from] InputError),
    #[error("encoding failed: {0}")]
    Encoding(#[from] EncodingError),
    #[error("classifier failed: {0}")]
    Classifier(#[from] ClassifierError),
    #[error("decoding failed: {0}")]
    Decode(#[from] DecodeError),
}

impl PredictionError {
    /// Fatal errors mean the artifacts and this build disagree; retrying cannot help.
    pub fn is_fatal(&self) -> bool {
        match self {
            PredictionError::Input(_) => false,
            PredictionError::Encoding(err) => err.is_fatal(),
            PredictionError::Classifier(_) | PredictionError::Decode(_) => true,
        }
    }
}

//! Loan eligibility pipeline: validated form values are bucketed, encoded with the
//! training-time tables, classified by the pre-trained forest, and decoded back to
//! an approval verdict.

pub mod artifacts;
pub mod classifier;
pub mod context;
pub mod credit;
pub mod decoder;
pub mod domain;
pub mod encoding;
pub mod router;
pub mod schema;
pub mod service;

#[cfg(test)]
mod tests;

pub use artifacts::{load_artifacts, ArtifactKind, ArtifactLoadError, ArtifactPaths, SchemaError};
pub use classifier::{Classifier, ClassifierError, DecisionForest};
pub use context::{EligibilityContext, PredictionError};
pub use credit::{bucket, CreditBand, CreditHistoryFlag};
pub use decoder::{DecodeError, LabelTable, PredictionLabel};
pub use domain::{
    Amount, ApplicationForm, CategoricalField, Category, CreditScore, Dependents, Education, Gender,
    InputError, LoanTerm, Married, PropertyArea, RawApplication, SelfEmployed, ValidationError,
};
pub use encoding::{
    encode, CategoryEncodingTable, CategoryTables, EncodedFeatureVector, EncodingError,
    FeatureColumn, NumericColumn, ScalingParameters,
};
pub use router::eligibility_router;
pub use schema::{form_schema, FormSchema};
pub use service::{EligibilityService, EligibilityVerdict, DISCLAIMER};

//! Conversion of a validated application into the classifier's feature layout.
//!
//! The layout is frozen by the training run: six label-encoded categoricals and
//! five standardized numerics, interleaved in the column order of the training
//! frame. Any drift in order or tables silently invalidates predictions, so the
//! order lives in one place (`FeatureColumn::ORDER`) and every lookup is checked.

mod scaling;
mod tables;

pub use scaling::{NumericColumn, ScalingParameters, Standardization};
pub use tables::{CategoryEncodingTable, CategoryTables};

use serde::Serialize;

use super::domain::{CategoricalField, RawApplication};

pub const FEATURE_COUNT: usize = 11;

/// Training-time feature columns, in model input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FeatureColumn {
    Gender = 0,
    Married = 1,
    Dependents = 2,
    Education = 3,
    SelfEmployed = 4,
    ApplicantIncome = 5,
    CoapplicantIncome = 6,
    LoanAmount = 7,
    LoanAmountTerm = 8,
    CreditHistory = 9,
    PropertyArea = 10,
}

impl FeatureColumn {
    pub const ORDER: [FeatureColumn; FEATURE_COUNT] = [
        FeatureColumn::Gender,
        FeatureColumn::Married,
        FeatureColumn::Dependents,
        FeatureColumn::Education,
        FeatureColumn::SelfEmployed,
        FeatureColumn::ApplicantIncome,
        FeatureColumn::CoapplicantIncome,
        FeatureColumn::LoanAmount,
        FeatureColumn::LoanAmountTerm,
        FeatureColumn::CreditHistory,
        FeatureColumn::PropertyArea,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn column_name(self) -> &'static str {
        match self {
            FeatureColumn::Gender => CategoricalField::Gender.column_name(),
            FeatureColumn::Married => CategoricalField::Married.column_name(),
            FeatureColumn::Dependents => CategoricalField::Dependents.column_name(),
            FeatureColumn::Education => CategoricalField::Education.column_name(),
            FeatureColumn::SelfEmployed => CategoricalField::SelfEmployed.column_name(),
            FeatureColumn::ApplicantIncome => NumericColumn::ApplicantIncome.column_name(),
            FeatureColumn::CoapplicantIncome => NumericColumn::CoapplicantIncome.column_name(),
            FeatureColumn::LoanAmount => NumericColumn::LoanAmount.column_name(),
            FeatureColumn::LoanAmountTerm => NumericColumn::LoanAmountTerm.column_name(),
            FeatureColumn::CreditHistory => NumericColumn::CreditHistory.column_name(),
            FeatureColumn::PropertyArea => CategoricalField::PropertyArea.column_name(),
        }
    }
}

/// Encoded model input; one value per `FeatureColumn`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EncodedFeatureVector([f64; FEATURE_COUNT]);

impl EncodedFeatureVector {
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn get(&self, column: FeatureColumn) -> f64 {
        self.0[column.index()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        FEATURE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Failures while mapping an application onto the trained feature layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    #[error("unknown category '{value}' for column {field}")]
    UnknownCategory {
        field: CategoricalField,
        value: String,
    },
    #[error("no encoding parameters for column {column}")]
    MissingParameter { column: &'static str },
}

impl EncodingError {
    /// A missing parameter means the loaded artifacts disagree with this build.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EncodingError::MissingParameter { .. })
    }
}

/// Encode `raw` with the training-time tables and scaler.
pub fn encode(
    raw: &RawApplication,
    tables: &CategoryTables,
    scaling: &ScalingParameters,
) -> Result<EncodedFeatureVector, EncodingError> {
    let gender = tables.gender.encode(raw.gender)?;
    let married = tables.married.encode(raw.married)?;
    let dependents = tables.dependents.encode(raw.dependents)?;
    let education = tables.education.encode(raw.education)?;
    let self_employed = tables.self_employed.encode(raw.self_employed)?;
    let property_area = tables.property_area.encode(raw.property_area)?;

    // The scaler was fit over all five numeric columns at once, including the
    // binary credit history flag, so the flag is standardized too.
    let applicant_income = scaling.transform(
        NumericColumn::ApplicantIncome,
        raw.applicant_income.value(),
    )?;
    let coapplicant_income = scaling.transform(
        NumericColumn::CoapplicantIncome,
        raw.coapplicant_income.value(),
    )?;
    let loan_amount = scaling.transform(NumericColumn::LoanAmount, raw.loan_amount.value())?;
    let loan_term = scaling.transform(
        NumericColumn::LoanAmountTerm,
        f64::from(raw.loan_term.months()),
    )?;
    let credit_history = scaling.transform(
        NumericColumn::CreditHistory,
        raw.credit_history().as_feature(),
    )?;

    Ok(EncodedFeatureVector([
        gender as f64,
        married as f64,
        dependents as f64,
        education as f64,
        self_employed as f64,
        applicant_income,
        coapplicant_income,
        loan_amount,
        loan_term,
        credit_history,
        property_area as f64,
    ]))
}

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::eligibility::artifacts::SchemaError;

use super::EncodingError;

/// Numeric columns the standard scaler was fit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NumericColumn {
    ApplicantIncome,
    CoapplicantIncome,
    LoanAmount,
    LoanAmountTerm,
    CreditHistory,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 5] = [
        NumericColumn::ApplicantIncome,
        NumericColumn::CoapplicantIncome,
        NumericColumn::LoanAmount,
        NumericColumn::LoanAmountTerm,
        NumericColumn::CreditHistory,
    ];

    pub const fn column_name(self) -> &'static str {
        match self {
            NumericColumn::ApplicantIncome => "ApplicantIncome",
            NumericColumn::CoapplicantIncome => "CoapplicantIncome",
            NumericColumn::LoanAmount => "LoanAmount",
            NumericColumn::LoanAmountTerm => "Loan_Amount_Term",
            NumericColumn::CreditHistory => "Credit_History",
        }
    }

    pub fn from_column_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|column| column.column_name() == name.trim())
    }
}

impl fmt::Display for NumericColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Frozen `(x - mean) / scale` transform for one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Standardization {
    mean: f64,
    scale: f64,
}

impl Standardization {
    /// A zero scale (constant training column) divides by one instead.
    pub fn new(mean: f64, scale: f64) -> Self {
        let scale = if scale == 0.0 { 1.0 } else { scale };
        Self { mean, scale }
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn apply(&self, value: f64) -> f64 {
        (value - self.mean) / self.scale
    }
}

/// Per-column standardization learned at training time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScalingParameters {
    columns: BTreeMap<NumericColumn, Standardization>,
}

impl ScalingParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column(mut self, column: NumericColumn, mean: f64, scale: f64) -> Self {
        self.columns
            .insert(column, Standardization::new(mean, scale));
        self
    }

    /// Build from the scaler's parallel `columns` / `mean` / `scale` arrays.
    pub fn from_columns<S: AsRef<str>>(
        names: &[S],
        means: &[f64],
        scales: &[f64],
    ) -> Result<Self, SchemaError> {
        if names.len() != means.len() || names.len() != scales.len() {
            return Err(SchemaError::LengthMismatch {
                columns: names.len(),
                means: means.len(),
                scales: scales.len(),
            });
        }

        let mut columns = BTreeMap::new();
        for ((name, mean), scale) in names.iter().zip(means).zip(scales) {
            let name = name.as_ref();
            let column = NumericColumn::from_column_name(name).ok_or_else(|| {
                SchemaError::UnexpectedColumn {
                    column: name.to_string(),
                }
            })?;
            if !mean.is_finite() || !scale.is_finite() {
                return Err(SchemaError::NonFinite {
                    column: column.column_name(),
                });
            }
            if *scale < 0.0 {
                return Err(SchemaError::NegativeScale {
                    column: column.column_name(),
                });
            }
            if columns
                .insert(column, Standardization::new(*mean, *scale))
                .is_some()
            {
                return Err(SchemaError::DuplicateClass {
                    column: "scaler",
                    class: name.to_string(),
                });
            }
        }

        let parameters = Self { columns };
        parameters.validate()?;
        Ok(parameters)
    }

    pub fn get(&self, column: NumericColumn) -> Option<&Standardization> {
        self.columns.get(&column)
    }

    pub fn transform(&self, column: NumericColumn, value: f64) -> Result<f64, EncodingError> {
        self.columns
            .get(&column)
            .map(|standardization| standardization.apply(value))
            .ok_or(EncodingError::MissingParameter {
                column: column.column_name(),
            })
    }

    /// Confirm every numeric model column has parameters.
    pub fn validate(&self) -> Result<(), EncodingError> {
        match NumericColumn::ALL
            .into_iter()
            .find(|column| !self.columns.contains_key(column))
        {
            Some(column) => Err(EncodingError::MissingParameter {
                column: column.column_name(),
            }),
            None => Ok(()),
        }
    }
}

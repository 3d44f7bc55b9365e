use std::fmt;

use serde::{Deserialize, Serialize};

use super::credit::{CreditBand, CreditHistoryFlag};
use super::encoding::EncodingError;

/// Categorical input columns, named as they were during training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CategoricalField {
    Gender,
    Married,
    Dependents,
    Education,
    SelfEmployed,
    PropertyArea,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 6] = [
        CategoricalField::Gender,
        CategoricalField::Married,
        CategoricalField::Dependents,
        CategoricalField::Education,
        CategoricalField::SelfEmployed,
        CategoricalField::PropertyArea,
    ];

    pub const fn column_name(self) -> &'static str {
        match self {
            CategoricalField::Gender => "Gender",
            CategoricalField::Married => "Married",
            CategoricalField::Dependents => "Dependents",
            CategoricalField::Education => "Education",
            CategoricalField::SelfEmployed => "Self_Employed",
            CategoricalField::PropertyArea => "Property_Area",
        }
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Closed category domain for one categorical column.
///
/// `label` returns the exact string the label encoder saw at training time, so
/// encoding tables can be keyed by variant while still loading from artifacts
/// that store the training vocabulary.
pub trait Category: Copy + Eq + Ord + fmt::Debug + Send + Sync + 'static {
    const FIELD: CategoricalField;
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    fn from_label(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        Self::ALL.iter().copied().find(|value| value.label() == trimmed)
    }

    /// Parse a form value, reporting the column when it is outside the domain.
    fn parse(raw: &str) -> Result<Self, EncodingError> {
        Self::from_label(raw).ok_or_else(|| EncodingError::UnknownCategory {
            field: Self::FIELD,
            value: raw.to_string(),
        })
    }
}

macro_rules! category {
    (
        $(#[$meta:meta])*
        $name:ident => $field:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl Category for $name {
            const FIELD: CategoricalField = CategoricalField::$field;
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

category! {
    Gender => Gender { Male => "Male", Female => "Female" }
}

category! {
    /// Marital status as captured on the form.
    Married => Married { Yes => "Yes", No => "No" }
}

category! {
    /// Number of dependents; four or more collapse into `3+`.
    Dependents => Dependents {
        Zero => "0",
        One => "1",
        Two => "2",
        ThreePlus => "3+",
    }
}

category! {
    Education => Education { Graduate => "Graduate", NotGraduate => "Not Graduate" }
}

category! {
    SelfEmployed => SelfEmployed { Yes => "Yes", No => "No" }
}

category! {
    PropertyArea => PropertyArea {
        Urban => "Urban",
        Semiurban => "Semiurban",
        Rural => "Rural",
    }
}

/// Numeric domain violations caught before encoding.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be a non-negative finite amount (found {value})")]
    InvalidAmount { field: &'static str, value: f64 },
    #[error("{field} must be within {min}..={max} (found {value})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

/// Non-negative monetary amount.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Amount(f64);

impl Amount {
    pub fn new(field: &'static str, value: f64) -> Result<Self, ValidationError> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(ValidationError::InvalidAmount { field, value })
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// Loan term in months, bounded by the form slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct LoanTerm(u16);

impl LoanTerm {
    pub const MIN_MONTHS: u16 = 12;
    pub const MAX_MONTHS: u16 = 480;

    pub fn new(months: i64) -> Result<Self, ValidationError> {
        bounded("loan_term_months", months, Self::MIN_MONTHS, Self::MAX_MONTHS).map(Self)
    }

    pub fn months(self) -> u16 {
        self.0
    }
}

/// Credit score on the 300-900 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CreditScore(u16);

impl CreditScore {
    pub const MIN: u16 = 300;
    pub const MAX: u16 = 900;

    pub fn new(score: i64) -> Result<Self, ValidationError> {
        bounded("credit_score", score, Self::MIN, Self::MAX).map(Self)
    }

    pub fn value(self) -> u16 {
        self.0
    }

    pub fn history_flag(self) -> CreditHistoryFlag {
        super::credit::bucket(self)
    }

    pub fn band(self) -> CreditBand {
        CreditBand::from_score(self)
    }
}

fn bounded(field: &'static str, value: i64, min: u16, max: u16) -> Result<u16, ValidationError> {
    if (i64::from(min)..=i64::from(max)).contains(&value) {
        // range check above guarantees the narrowing is lossless
        Ok(value as u16)
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value,
            min: i64::from(min),
            max: i64::from(max),
        })
    }
}

/// Validated applicant record, built fresh for every submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawApplication {
    pub gender: Gender,
    pub married: Married,
    pub dependents: Dependents,
    pub education: Education,
    pub self_employed: SelfEmployed,
    pub property_area: PropertyArea,
    pub applicant_income: Amount,
    pub coapplicant_income: Amount,
    pub loan_amount: Amount,
    pub loan_term: LoanTerm,
    pub credit_score: CreditScore,
}

impl RawApplication {
    pub fn credit_history(&self) -> CreditHistoryFlag {
        self.credit_score.history_flag()
    }
}

/// Errors raised while turning submitted form values into a `RawApplication`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error(transparent)]
    Category(#[from] EncodingError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Field values exactly as a front end submits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationForm {
    pub gender: String,
    pub married: String,
    pub dependents: String,
    pub education: String,
    pub self_employed: String,
    pub property_area: String,
    pub applicant_income: f64,
    pub coapplicant_income: f64,
    pub loan_amount: f64,
    pub loan_term_months: i64,
    pub credit_score: i64,
}

impl TryFrom<&ApplicationForm> for RawApplication {
    type Error = InputError;

    fn try_from(form: &ApplicationForm) -> Result<Self, Self::Error> {
        Ok(RawApplication {
            gender: Gender::parse(&form.gender)?,
            married: Married::parse(&form.married)?,
            dependents: Dependents::parse(&form.dependents)?,
            education: Education::parse(&form.education)?,
            self_employed: SelfEmployed::parse(&form.self_employed)?,
            property_area: PropertyArea::parse(&form.property_area)?,
            applicant_income: Amount::new("applicant_income", form.applicant_income)?,
            coapplicant_income: Amount::new("coapplicant_income", form.coapplicant_income)?,
            loan_amount: Amount::new("loan_amount", form.loan_amount)?,
            loan_term: LoanTerm::new(form.loan_term_months)?,
            credit_score: CreditScore::new(form.credit_score)?,
        })
    }
}

impl From<&RawApplication> for ApplicationForm {
    fn from(raw: &RawApplication) -> Self {
        ApplicationForm {
            gender: raw.gender.label().to_string(),
            married: raw.married.label().to_string(),
            dependents: raw.dependents.label().to_string(),
            education: raw.education.label().to_string(),
            self_employed: raw.self_employed.label().to_string(),
            property_area: raw.property_area.label().to_string(),
            applicant_income: raw.applicant_income.value(),
            coapplicant_income: raw.coapplicant_income.value(),
            loan_amount: raw.loan_amount.value(),
            loan_term_months: i64::from(raw.loan_term.months()),
            credit_score: i64::from(raw.credit_score.value()),
        }
    }
}

use serde::Serialize;

use super::domain::{
    ApplicationForm, Category, CreditScore, Dependents, Education, Gender, LoanTerm, Married,
    PropertyArea, SelfEmployed,
};

/// Description of the eleven input fields for rendering a form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSchema {
    pub fields: Vec<FieldSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSchema {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub input: FieldInput,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldInput {
    Select {
        options: Vec<&'static str>,
        default: &'static str,
    },
    Number {
        min: f64,
        step: f64,
        default: f64,
    },
    Slider {
        min: u16,
        max: u16,
        default: u16,
    },
}

impl Default for ApplicationForm {
    fn default() -> Self {
        ApplicationForm {
            gender: Gender::Male.label().to_string(),
            married: Married::Yes.label().to_string(),
            dependents: Dependents::Zero.label().to_string(),
            education: Education::Graduate.label().to_string(),
            self_employed: SelfEmployed::Yes.label().to_string(),
            property_area: PropertyArea::Urban.label().to_string(),
            applicant_income: 5000.0,
            coapplicant_income: 0.0,
            loan_amount: 100_000.0,
            loan_term_months: 360,
            credit_score: 700,
        }
    }
}

fn select<C: Category>(name: &'static str, label: &'static str) -> FieldSchema {
    let options: Vec<&'static str> = C::ALL.iter().map(|value| value.label()).collect();
    FieldSchema {
        name,
        label,
        input: FieldInput::Select {
            default: options.first().copied().unwrap_or_default(),
            options,
        },
    }
}

fn number(name: &'static str, label: &'static str, step: f64, default: f64) -> FieldSchema {
    FieldSchema {
        name,
        label,
        input: FieldInput::Number {
            min: 0.0,
            step,
            default,
        },
    }
}

fn slider(
    name: &'static str,
    label: &'static str,
    min: u16,
    max: u16,
    default: i64,
) -> FieldSchema {
    // clamped into min..=max, so the narrowing is lossless
    let default = default.clamp(i64::from(min), i64::from(max)) as u16;
    FieldSchema {
        name,
        label,
        input: FieldInput::Slider { min, max, default },
    }
}

pub fn form_schema() -> FormSchema {
    let defaults = ApplicationForm::default();

    FormSchema {
        fields: vec![
            select::<Gender>("gender", "Gender"),
            select::<Married>("married", "Marital Status"),
            select::<Dependents>("dependents", "Number of Dependents"),
            select::<Education>("education", "Education"),
            select::<SelfEmployed>("self_employed", "Self Employed"),
            select::<PropertyArea>("property_area", "Property Area"),
            number(
                "applicant_income",
                "Applicant Income (₹)",
                1000.0,
                defaults.applicant_income,
            ),
            number(
                "coapplicant_income",
                "Coapplicant Income (₹)",
                1000.0,
                defaults.coapplicant_income,
            ),
            number(
                "loan_amount",
                "Loan Amount (₹)",
                10_000.0,
                defaults.loan_amount,
            ),
            slider(
                "loan_term_months",
                "Loan Term (months)",
                LoanTerm::MIN_MONTHS,
                LoanTerm::MAX_MONTHS,
                defaults.loan_term_months,
            ),
            slider(
                "credit_score",
                "Credit Score",
                CreditScore::MIN,
                CreditScore::MAX,
                defaults.credit_score,
            ),
        ],
    }
}

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use super::context::{EligibilityContext, PredictionError};
use super::credit::CreditBand;
use super::decoder::PredictionLabel;
use super::domain::{ApplicationForm, CreditScore, RawApplication};

pub const DISCLAIMER: &str =
    "This is only a prediction. Final decisions are made by banks based on additional checks.";

/// Verdict plus the echoed credit score, ready for a front end to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EligibilityVerdict {
    #[serde(rename = "verdict")]
    pub label: PredictionLabel,
    pub approved: bool,
    pub credit_score: u16,
    pub credit_band: CreditBand,
    pub headline: &'static str,
    pub detail: &'static str,
}

impl EligibilityVerdict {
    pub fn new(label: PredictionLabel, credit_score: CreditScore) -> Self {
        let (headline, detail) = match label {
            PredictionLabel::Approved => (
                "Loan Likely Approved",
                "Your loan application is likely to be approved.",
            ),
            PredictionLabel::Rejected => (
                "Loan Application Likely Rejected",
                "Your loan application may not be approved at this time.",
            ),
        };

        Self {
            label,
            approved: label.is_approved(),
            credit_score: credit_score.value(),
            credit_band: credit_score.band(),
            headline,
            detail,
        }
    }
}

/// Facade used by the HTTP router and the CLI.
#[derive(Debug, Clone)]
pub struct EligibilityService {
    context: Arc<EligibilityContext>,
}

impl EligibilityService {
    pub fn new(context: Arc<EligibilityContext>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &EligibilityContext {
        &self.context
    }

    /// Validate submitted form values and assess them.
    pub fn assess(&self, form: &ApplicationForm) -> Result<EligibilityVerdict, PredictionError> {
        let raw = RawApplication::try_from(form).map_err(|err| {
            warn!(error = %err, "rejected application form");
            PredictionError::from(err)
        })?;
        self.assess_application(&raw)
    }

    pub fn assess_application(
        &self,
        raw: &RawApplication,
    ) -> Result<EligibilityVerdict, PredictionError> {
        match self.context.predict_eligibility(raw) {
            Ok(label) => {
                let verdict = EligibilityVerdict::new(label, raw.credit_score);
                info!(
                    verdict = %label,
                    credit_score = verdict.credit_score,
                    credit_band = ?verdict.credit_band,
                    "assessed loan eligibility"
                );
                Ok(verdict)
            }
            Err(err) if err.is_fatal() => {
                error!(error = %err, "model artifacts disagree with the encoder contract");
                Err(err)
            }
            Err(err) => {
                warn!(error = %err, "application could not be encoded");
                Err(err)
            }
        }
    }
}

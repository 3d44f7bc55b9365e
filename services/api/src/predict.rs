use crate::infra::{load_service, with_model_dir};
use clap::Args;
use loan_eligibility::config::AppConfig;
use loan_eligibility::eligibility::{ApplicationForm, EligibilityVerdict, DISCLAIMER};
use loan_eligibility::error::AppError;
use std::path::PathBuf;

/// Applicant values; anything omitted falls back to the form defaults.
#[derive(Args, Debug, Default)]
pub(crate) struct PredictArgs {
    #[arg(long)]
    pub(crate) gender: Option<String>,
    #[arg(long)]
    pub(crate) married: Option<String>,
    #[arg(long)]
    pub(crate) dependents: Option<String>,
    #[arg(long)]
    pub(crate) education: Option<String>,
    #[arg(long)]
    pub(crate) self_employed: Option<String>,
    #[arg(long)]
    pub(crate) property_area: Option<String>,
    #[arg(long)]
    pub(crate) applicant_income: Option<f64>,
    #[arg(long)]
    pub(crate) coapplicant_income: Option<f64>,
    #[arg(long)]
    pub(crate) loan_amount: Option<f64>,
    /// Loan term in months (12-480)
    #[arg(long)]
    pub(crate) loan_term: Option<i64>,
    /// Credit score (300-900)
    #[arg(long)]
    pub(crate) credit_score: Option<i64>,
    /// Directory holding the four model artifacts
    #[arg(long)]
    pub(crate) model_dir: Option<PathBuf>,
    /// Print the verdict as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

impl PredictArgs {
    pub(crate) fn form(&self) -> ApplicationForm {
        let defaults = ApplicationForm::default();
        ApplicationForm {
            gender: self.gender.clone().unwrap_or(defaults.gender),
            married: self.married.clone().unwrap_or(defaults.married),
            dependents: self.dependents.clone().unwrap_or(defaults.dependents),
            education: self.education.clone().unwrap_or(defaults.education),
            self_employed: self.self_employed.clone().unwrap_or(defaults.self_employed),
            property_area: self.property_area.clone().unwrap_or(defaults.property_area),
            applicant_income: self.applicant_income.unwrap_or(defaults.applicant_income),
            coapplicant_income: self
                .coapplicant_income
                .unwrap_or(defaults.coapplicant_income),
            loan_amount: self.loan_amount.unwrap_or(defaults.loan_amount),
            loan_term_months: self.loan_term.unwrap_or(defaults.loan_term_months),
            credit_score: self.credit_score.unwrap_or(defaults.credit_score),
        }
    }
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let artifacts = with_model_dir(config.artifacts, args.model_dir.clone());
    let service = load_service(&artifacts)?;

    let verdict = service.assess(&args.form())?;

    if args.json {
        match serde_json::to_string_pretty(&verdict) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("verdict payload unavailable: {err}"),
        }
    } else {
        println!("{}", render_verdict(&verdict));
    }
    Ok(())
}

pub(crate) fn render_verdict(verdict: &EligibilityVerdict) -> String {
    format!(
        "{}\n{}\nCredit score: {} ({})\n\n{}",
        verdict.headline, verdict.detail, verdict.credit_score, verdict.credit_band, DISCLAIMER
    )
}

use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::eligibility::classifier::{Classifier, ClassifierError};
use crate::eligibility::decoder::{LabelTable, PredictionLabel};
use crate::eligibility::domain::{
    Amount, ApplicationForm, CreditScore, Dependents, Education, Gender, LoanTerm, Married,
    PropertyArea, RawApplication, SelfEmployed,
};
use crate::eligibility::encoding::{
    CategoryEncodingTable, CategoryTables, EncodedFeatureVector, NumericColumn, ScalingParameters,
};
use crate::eligibility::{EligibilityContext, EligibilityService};

pub(super) const INCOME_MEAN: f64 = 5403.46;
pub(super) const INCOME_SCALE: f64 = 6109.04;
pub(super) const COAPPLICANT_MEAN: f64 = 1621.25;
pub(super) const COAPPLICANT_SCALE: f64 = 2926.25;
pub(super) const LOAN_MEAN: f64 = 146.41;
pub(super) const LOAN_SCALE: f64 = 85.52;
pub(super) const TERM_MEAN: f64 = 342.0;
pub(super) const TERM_SCALE: f64 = 65.12;
pub(super) const HISTORY_MEAN: f64 = 0.8422;
pub(super) const HISTORY_SCALE: f64 = 0.3646;

pub(super) fn category_tables() -> CategoryTables {
    CategoryTables {
        gender: CategoryEncodingTable::from_classes(&["Female", "Male"]).expect("gender"),
        married: CategoryEncodingTable::from_classes(&["No", "Yes"]).expect("married"),
        dependents: CategoryEncodingTable::from_classes(&["0", "1", "2", "3+"])
            .expect("dependents"),
        education: CategoryEncodingTable::from_classes(&["Graduate", "Not Graduate"])
            .expect("education"),
        self_employed: CategoryEncodingTable::from_classes(&["No", "Yes"]).expect("self employed"),
        property_area: CategoryEncodingTable::from_classes(&["Rural", "Semiurban", "Urban"])
            .expect("property area"),
    }
}

pub(super) fn scaling_parameters() -> ScalingParameters {
    ScalingParameters::new()
        .with_column(NumericColumn::ApplicantIncome, INCOME_MEAN, INCOME_SCALE)
        .with_column(
            NumericColumn::CoapplicantIncome,
            COAPPLICANT_MEAN,
            COAPPLICANT_SCALE,
        )
        .with_column(NumericColumn::LoanAmount, LOAN_MEAN, LOAN_SCALE)
        .with_column(NumericColumn::LoanAmountTerm, TERM_MEAN, TERM_SCALE)
        .with_column(NumericColumn::CreditHistory, HISTORY_MEAN, HISTORY_SCALE)
}

pub(super) fn label_table() -> LabelTable {
    LabelTable::from_classes(&["N", "Y"]).expect("status classes")
}

pub(super) fn code_for(label: PredictionLabel) -> i64 {
    label_table().code_for(label)
}

/// Always answers with the same raw class code.
pub(super) struct FixedClassifier(pub(super) i64);

impl Classifier for FixedClassifier {
    fn predict(&self, _features: &EncodedFeatureVector) -> Result<i64, ClassifierError> {
        Ok(self.0)
    }
}

/// Records every feature vector it is asked to classify.
#[derive(Clone, Default)]
pub(super) struct RecordingClassifier {
    pub(super) code: i64,
    seen: Arc<Mutex<Vec<EncodedFeatureVector>>>,
}

impl RecordingClassifier {
    pub(super) fn answering(code: i64) -> Self {
        Self {
            code,
            seen: Arc::default(),
        }
    }

    pub(super) fn seen(&self) -> Vec<EncodedFeatureVector> {
        self.seen.lock().expect("classifier mutex poisoned").clone()
    }
}

impl Classifier for RecordingClassifier {
    fn predict(&self, features: &EncodedFeatureVector) -> Result<i64, ClassifierError> {
        self.seen
            .lock()
            .expect("classifier mutex poisoned")
            .push(*features);
        Ok(self.code)
    }
}

pub(super) fn context_with(classifier: impl Classifier + 'static) -> EligibilityContext {
    EligibilityContext::new(
        category_tables(),
        scaling_parameters(),
        label_table(),
        classifier,
    )
}

pub(super) fn service_with(classifier: impl Classifier + 'static) -> Arc<EligibilityService> {
    Arc::new(EligibilityService::new(Arc::new(context_with(classifier))))
}

/// Applicant from the reference round-trip scenario.
pub(super) fn application() -> RawApplication {
    RawApplication {
        gender: Gender::Male,
        married: Married::Yes,
        dependents: Dependents::Zero,
        education: Education::Graduate,
        self_employed: SelfEmployed::No,
        property_area: PropertyArea::Urban,
        applicant_income: Amount::new("applicant_income", 5000.0).expect("valid"),
        coapplicant_income: Amount::new("coapplicant_income", 0.0).expect("valid"),
        loan_amount: Amount::new("loan_amount", 100_000.0).expect("valid"),
        loan_term: LoanTerm::new(360).expect("valid"),
        credit_score: CreditScore::new(700).expect("valid"),
    }
}

pub(super) fn form() -> ApplicationForm {
    ApplicationForm::from(&application())
}

pub(super) fn low_credit_form() -> ApplicationForm {
    let mut form = form();
    form.credit_score = 540;
    form.married = "No".to_string();
    form.property_area = "Rural".to_string();
    form
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

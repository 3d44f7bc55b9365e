use super::common::*;

use crate::eligibility::context::PredictionError;
use crate::eligibility::credit::CreditBand;
use crate::eligibility::decoder::{DecodeError, PredictionLabel};
use crate::eligibility::domain::{CreditScore, InputError, ValidationError};
use crate::eligibility::encoding::EncodingError;
use crate::eligibility::CategoricalField;

#[test]
fn rejected_code_decodes_to_rejected_for_any_input() {
    let context = context_with(FixedClassifier(code_for(PredictionLabel::Rejected)));

    let mut raw = application();
    for score in [300, 599, 600, 750, 900] {
        raw.credit_score = CreditScore::new(score).expect("valid");
        let label = context.predict_eligibility(&raw).expect("prediction");
        assert_eq!(label, PredictionLabel::Rejected, "score {score}");
    }
}

#[test]
fn approved_code_decodes_to_approved() {
    let context = context_with(FixedClassifier(code_for(PredictionLabel::Approved)));

    let label = context.predict_eligibility(&application()).expect("prediction");

    assert_eq!(label, PredictionLabel::Approved);
    assert!(label.is_approved());
}

#[test]
fn classifier_receives_the_encoded_vector() {
    let classifier = RecordingClassifier::answering(code_for(PredictionLabel::Approved));
    let context = context_with(classifier.clone());
    let raw = application();

    context.predict_eligibility(&raw).expect("prediction");

    let expected = context.encode(&raw).expect("encodes");
    assert_eq!(classifier.seen(), vec![expected]);
}

#[test]
fn unassigned_label_code_is_fatal() {
    let context = context_with(FixedClassifier(7));

    let err = context
        .predict_eligibility(&application())
        .expect_err("code 7 has no label");

    assert_eq!(
        err,
        PredictionError::Decode(DecodeError::UnknownLabelCode { code: 7 })
    );
    assert!(err.is_fatal());
}

#[test]
fn repeated_predictions_agree() {
    let classifier = RecordingClassifier::answering(code_for(PredictionLabel::Rejected));
    let context = context_with(classifier.clone());
    let raw = application();

    let first = context.predict_eligibility(&raw).expect("prediction");
    let second = context.predict_eligibility(&raw).expect("prediction");

    assert_eq!(first, second);
    let seen = classifier.seen();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], seen[1]);
}

#[test]
fn service_echoes_score_and_band() {
    let service = service_with(FixedClassifier(code_for(PredictionLabel::Approved)));

    let verdict = service.assess(&form()).expect("assessment");

    assert_eq!(verdict.label, PredictionLabel::Approved);
    assert!(verdict.approved);
    assert_eq!(verdict.credit_score, 700);
    assert_eq!(verdict.credit_band, CreditBand::Good);
    assert_eq!(verdict.headline, "Loan Likely Approved");
}

#[test]
fn low_credit_rejection_reports_poor_band() {
    let service = service_with(FixedClassifier(code_for(PredictionLabel::Rejected)));

    let verdict = service.assess(&low_credit_form()).expect("assessment");

    assert_eq!(verdict.label, PredictionLabel::Rejected);
    assert!(!verdict.approved);
    assert_eq!(verdict.credit_band, CreditBand::Poor);
    assert_eq!(verdict.headline, "Loan Application Likely Rejected");
}

#[test]
fn invalid_form_never_reaches_the_classifier() {
    let classifier = RecordingClassifier::answering(code_for(PredictionLabel::Approved));
    let service = service_with(classifier.clone());

    let mut out_of_range = form();
    out_of_range.credit_score = 950;
    let err = service.assess(&out_of_range).expect_err("score out of range");
    assert_eq!(
        err,
        PredictionError::Input(InputError::Validation(ValidationError::OutOfRange {
            field: "credit_score",
            value: 950,
            min: 300,
            max: 900,
        }))
    );
    assert!(!err.is_fatal());

    let mut unknown = form();
    unknown.dependents = "5".to_string();
    let err = service.assess(&unknown).expect_err("dependents outside vocabulary");
    assert_eq!(
        err,
        PredictionError::Input(InputError::Category(EncodingError::UnknownCategory {
            field: CategoricalField::Dependents,
            value: "5".to_string(),
        }))
    );
    assert!(!err.is_fatal());

    assert!(classifier.seen().is_empty());
}

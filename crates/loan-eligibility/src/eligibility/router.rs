use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::context::PredictionError;
use super::domain::ApplicationForm;
use super::schema::form_schema;
use super::service::{EligibilityService, DISCLAIMER};

/// Router exposing eligibility assessment and the input form description.
pub fn eligibility_router(service: Arc<EligibilityService>) -> Router {
    Router::new()
        .route("/api/v1/loan/eligibility", post(assess_handler))
        .route("/api/v1/loan/form", get(form_handler))
        .with_state(service)
}

pub(crate) async fn assess_handler(
    State(service): State<Arc<EligibilityService>>,
    Json(form): Json<ApplicationForm>,
) -> Response {
    match service.assess(&form) {
        Ok(verdict) => {
            let payload = json!({
                "verdict": verdict.label,
                "approved": verdict.approved,
                "credit_score": verdict.credit_score,
                "credit_band": verdict.credit_band,
                "headline": verdict.headline,
                "detail": verdict.detail,
                "disclaimer": DISCLAIMER,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => prediction_error_response(&error),
    }
}

pub(crate) async fn form_handler() -> Response {
    (StatusCode::OK, Json(form_schema())).into_response()
}

fn prediction_error_response(error: &PredictionError) -> Response {
    let status = if error.is_fatal() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}

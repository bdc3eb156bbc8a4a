use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::criteria::{CriteriaConfig, DepartmentCategory, RoleTier};
use super::domain::{EvaluationKey, ManagerSubmission, Period};
use super::repository::EvaluationRepository;
use super::scoring::AdjustmentField;
use super::service::{ReviewService, ReviewServiceError};

/// Router builder exposing HTTP endpoints for scoring, normalization, and publication.
pub fn review_router<R>(service: Arc<ReviewService<R>>) -> Router
where
    R: EvaluationRepository + 'static,
{
    Router::new()
        .route("/api/v1/evaluations", post(submit_handler::<R>))
        .route(
            "/api/v1/evaluations/:employee_id/:year/:term",
            get(evaluation_handler::<R>),
        )
        .route(
            "/api/v1/evaluations/:employee_id/:year/:term/adjustments",
            put(adjustment_handler::<R>),
        )
        .route(
            "/api/v1/evaluations/:employee_id/:year/:term/publish",
            post(publish_handler::<R>),
        )
        .route("/api/v1/periods/:year/:term", get(progress_handler::<R>))
        .route(
            "/api/v1/periods/:year/:term/normalize",
            post(normalize_handler::<R>),
        )
        .route(
            "/api/v1/criteria/:category/:tier",
            get(criteria_handler::<R>),
        )
        .with_state(service)
}

/// Body of an adjustment edit. The field stays a string so an unknown name maps to 422 rather
/// than a generic extractor rejection.
#[derive(Debug, Deserialize)]
pub struct AdjustmentRequest {
    pub field: String,
    pub value: i32,
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<ReviewService<R>>>,
    Json(submission): Json<ManagerSubmission>,
) -> Response
where
    R: EvaluationRepository + 'static,
{
    match service.submit(submission) {
        Ok(evaluation) => (StatusCode::ACCEPTED, Json(evaluation)).into_response(),
        Err(err) => service_error(err),
    }
}

pub(crate) async fn evaluation_handler<R>(
    State(service): State<Arc<ReviewService<R>>>,
    Path((employee_id, year, term)): Path<(String, String, String)>,
) -> Response
where
    R: EvaluationRepository + 'static,
{
    let key = match evaluation_key(employee_id, &year, &term) {
        Ok(key) => key,
        Err(response) => return response,
    };

    match service.get(&key) {
        Ok(evaluation) => (StatusCode::OK, Json(evaluation)).into_response(),
        Err(err) => service_error(err),
    }
}

pub(crate) async fn adjustment_handler<R>(
    State(service): State<Arc<ReviewService<R>>>,
    Path((employee_id, year, term)): Path<(String, String, String)>,
    Json(request): Json<AdjustmentRequest>,
) -> Response
where
    R: EvaluationRepository + 'static,
{
    let key = match evaluation_key(employee_id, &year, &term) {
        Ok(key) => key,
        Err(response) => return response,
    };

    let field = match request.field.parse::<AdjustmentField>() {
        Ok(field) => field,
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
    };

    match service.adjust(&key, field, request.value) {
        Ok(evaluation) => (StatusCode::OK, Json(evaluation)).into_response(),
        Err(err) => service_error(err),
    }
}

pub(crate) async fn publish_handler<R>(
    State(service): State<Arc<ReviewService<R>>>,
    Path((employee_id, year, term)): Path<(String, String, String)>,
) -> Response
where
    R: EvaluationRepository + 'static,
{
    let key = match evaluation_key(employee_id, &year, &term) {
        Ok(key) => key,
        Err(response) => return response,
    };

    match service.publish(&key) {
        Ok(evaluation) => (StatusCode::OK, Json(evaluation)).into_response(),
        Err(err) => service_error(err),
    }
}

pub(crate) async fn progress_handler<R>(
    State(service): State<Arc<ReviewService<R>>>,
    Path((year, term)): Path<(String, String)>,
) -> Response
where
    R: EvaluationRepository + 'static,
{
    let period = match period_from_path(&year, &term) {
        Ok(period) => period,
        Err(response) => return response,
    };

    match service.period_progress(&period) {
        Ok(progress) => (StatusCode::OK, Json(progress)).into_response(),
        Err(err) => service_error(err),
    }
}

pub(crate) async fn normalize_handler<R>(
    State(service): State<Arc<ReviewService<R>>>,
    Path((year, term)): Path<(String, String)>,
) -> Response
where
    R: EvaluationRepository + 'static,
{
    let period = match period_from_path(&year, &term) {
        Ok(period) => period,
        Err(response) => return response,
    };

    match service.normalize_period(&period) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => service_error(err),
    }
}

pub(crate) async fn criteria_handler<R>(
    State(service): State<Arc<ReviewService<R>>>,
    Path((category, tier)): Path<(String, String)>,
) -> Response
where
    R: EvaluationRepository + 'static,
{
    let lookup = category
        .parse::<DepartmentCategory>()
        .and_then(|category| tier.parse::<RoleTier>().map(|tier| (category, tier)));
    let (category, tier) = match lookup {
        Ok(pair) => pair,
        Err(message) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
        }
    };

    match service.metric_set(category, tier) {
        Some(set) => (StatusCode::OK, Json(set)).into_response(),
        None => {
            let key = CriteriaConfig::set_key(category, tier);
            let payload = json!({ "error": format!("no metric set for {key}") });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
    }
}

fn period_from_path(year: &str, term: &str) -> Result<Period, Response> {
    Period::parse(year, term).map_err(|err| {
        let payload = json!({ "error": err.to_string() });
        (StatusCode::BAD_REQUEST, Json(payload)).into_response()
    })
}

fn evaluation_key(employee_id: String, year: &str, term: &str) -> Result<EvaluationKey, Response> {
    let period = period_from_path(year, term)?;
    Ok(EvaluationKey::new(employee_id, period))
}

fn service_error(err: ReviewServiceError) -> Response {
    let status = match err {
        ReviewServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ReviewServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}

use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::review::router::{normalize_handler, submit_handler};
use crate::review::{CriteriaConfig, ReviewService};

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

#[tokio::test]
async fn submit_handler_accepts_scores() {
    let (service, _) = build_service();

    let response = submit_handler::<MemoryRepository>(
        State(Arc::new(service)),
        axum::Json(submission_for("E1", "M1", 72.0)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = read_json_body(response).await;
    assert_eq!(body["rawTotal"], json!(72.0));
    assert_eq!(body["isManagerComplete"], json!(true));
    assert_eq!(body["isHRComplete"], json!(false));
}

#[tokio::test]
async fn submit_handler_returns_internal_error_on_repository_failure() {
    let service = Arc::new(ReviewService::new(
        Arc::new(UnavailableRepository),
        CriteriaConfig::standard(),
    ));

    let response = submit_handler::<UnavailableRepository>(
        State(service),
        axum::Json(submission_for("E1", "M1", 72.0)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn normalize_handler_rejects_unknown_terms() {
    let (service, _) = build_service();

    let response = normalize_handler::<MemoryRepository>(
        State(Arc::new(service)),
        Path(("2024".to_string(), "Q5".to_string())),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert!(body["error"].as_str().unwrap_or_default().contains("Q5"));
}

#[tokio::test]
async fn normalize_route_returns_statistics() {
    let (service, _) = seeded_service();
    let router = review_router_with_service(service);

    let response = router
        .oneshot(empty_request("POST", "/api/v1/periods/2024/yearly/normalize"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["statistics"]["company"]["count"], json!(5));
    assert_eq!(body["statistics"]["company"]["mean"], json!(80.0));
    assert_eq!(body["evaluations"][4]["grade"], json!("A"));
    assert_eq!(body["evaluations"][4]["zScoreAdjusted"], json!(91.18));
}

#[tokio::test]
async fn adjustment_route_recomposites_total() {
    let (service, _) = seeded_service();
    let router = review_router_with_service(service);

    let response = router
        .oneshot(json_request(
            "PUT",
            "/api/v1/evaluations/E2/2024/Yearly/adjustments",
            json!({ "field": "overallAdjustment", "value": -15 }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["overallAdjustment"], json!(-15));
    assert_eq!(body["totalScore"], json!(75.0));
    assert_eq!(body["grade"], json!("C"));
}

#[tokio::test]
async fn adjustment_route_rejects_unknown_fields() {
    let (service, _) = seeded_service();
    let router = review_router_with_service(service);

    let response = router
        .oneshot(json_request(
            "PUT",
            "/api/v1/evaluations/E2/2024/Yearly/adjustments",
            json!({ "field": "loyaltyBonus", "value": 3 }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn publish_route_returns_not_found_for_missing_evaluation() {
    let (service, _) = build_service();
    let router = review_router_with_service(service);

    let response = router
        .oneshot(empty_request("POST", "/api/v1/evaluations/E404/2024/Q1/publish"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn evaluation_route_returns_stored_record() {
    let (service, _) = seeded_service();
    let router = review_router_with_service(service);

    let response = router
        .oneshot(empty_request("GET", "/api/v1/evaluations/E4/2024/Yearly"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["employeeId"], json!("E4"));
    assert_eq!(body["managerId"], json!("M2"));
    assert_eq!(body["term"], json!("Yearly"));
}

#[tokio::test]
async fn progress_route_reports_counts() {
    let (service, _) = seeded_service();
    let router = review_router_with_service(service);

    let response = router
        .oneshot(empty_request("GET", "/api/v1/periods/2024/Yearly"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["total"], json!(5));
    assert_eq!(body["normalized"], json!(0));
    assert_eq!(body["pending"], json!(5));
}

#[tokio::test]
async fn criteria_route_serves_metric_sets() {
    let (service, _) = build_service();
    let router = review_router_with_service(service);

    let response = router
        .clone()
        .oneshot(empty_request("GET", "/api/v1/criteria/sales/staff"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body[0]["key"], json!("achievementRate"));
    assert_eq!(body[0]["max"], json!(35.0));

    let response = router
        .oneshot(empty_request("GET", "/api/v1/criteria/marketing/staff"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

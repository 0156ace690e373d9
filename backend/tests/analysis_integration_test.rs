//! Integration tests for analysis endpoints

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{desk_worker_form, TestApp};
use serde_json::{json, Value};
use tower::ServiceExt;

// ============================================================================
// Full Analysis
// ============================================================================

#[tokio::test]
async fn test_analysis_with_model() {
    let app = TestApp::new().await;

    let (status, body) = app.post("/api/v1/analysis", &desk_worker_form()).await;

    assert_eq!(status, StatusCode::OK, "body: {}", body);
    let json: Value = serde_json::from_str(&body).unwrap();

    assert_eq!(json["targets"]["bmi_value"], 22.86);
    assert_eq!(json["targets"]["bmi_category"], "normal");
    assert_eq!(json["scores"]["occupational"]["score"], 14.0);
    assert_eq!(json["scores"]["occupational"]["band"], "high");

    let health = json["scores"]["overall_health_score"].as_u64().unwrap();
    assert!(health <= 100);
    let composite = json["scores"]["composite_index"].as_u64().unwrap();
    assert!(composite <= 100);

    let risk = &json["risk"];
    assert!(risk.is_object(), "risk missing: {}", body);
    let total: f64 = risk["probabilities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p.as_f64().unwrap())
        .sum();
    assert!((total - 1.0).abs() < 1e-6);
    assert!(json.get("risk_error").is_none());

    let actions = json["corrective_actions"].as_array().unwrap();
    assert!(actions.iter().any(|a| a.as_str().unwrap().contains("20-20-20")));
    assert!(actions.iter().any(|a| a.as_str().unwrap().contains("lumbar")));
}

#[tokio::test]
async fn test_analysis_without_optional_model() {
    let app = TestApp::without_model(false).await;

    let (status, body) = app.post("/api/v1/analysis", &desk_worker_form()).await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert!(json["risk"].is_null());
    assert!(json["risk_error"]
        .as_str()
        .unwrap()
        .contains("Risk model unavailable"));
    assert_eq!(json["scores"]["occupational"]["score"], 14.0);
}

#[tokio::test]
async fn test_analysis_fails_when_model_required() {
    let app = TestApp::without_model(true).await;

    let (status, body) = app.post("/api/v1/analysis", &desk_worker_form()).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body.contains("MODEL_UNAVAILABLE"));
}

// ============================================================================
// Input Rejection
// ============================================================================

#[tokio::test]
async fn test_out_of_range_height_names_field() {
    let app = TestApp::without_model(false).await;
    let mut form = desk_worker_form();
    form["height_cm"] = json!(90.0);

    let (status, body) = app.post("/api/v1/analysis", &form).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"]["field"], "height_cm");
    assert!(json["error"]["message"].as_str().unwrap().starts_with("Height"));
}

#[tokio::test]
async fn test_missing_field_rejected() {
    let app = TestApp::without_model(false).await;
    let mut form = desk_worker_form();
    form.as_object_mut().unwrap().remove("sleep_hours");

    let (status, body) = app.post("/api/v1/analysis", &form).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"]["field"], "sleep_hours");
}

#[rstest::rstest]
#[case("age_years", json!(28.5))]
#[case("age_years", json!(-3))]
#[case("weight_kg", json!("seventy"))]
#[case("pain_areas", json!("neck"))]
#[tokio::test]
async fn test_wrongly_typed_field_names_field(#[case] field: &str, #[case] value: Value) {
    let app = TestApp::without_model(false).await;
    let mut form = desk_worker_form();
    form[field] = value;

    let (status, body) = app.post("/api/v1/analysis", &form).await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"]["field"], field);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::without_model(false).await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/analysis")
        .header("Content-Type", "application/json")
        .body(Body::from("{\"height_cm\": 175.0,"))
        .unwrap();

    let response = app.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
    assert!(json["error"]["field"].is_null());
}

#[tokio::test]
async fn test_unknown_lifestyle_rejected() {
    let app = TestApp::without_model(false).await;
    let mut form = desk_worker_form();
    form["lifestyle"] = json!("Astronaut");

    let (status, body) = app.post("/api/v1/analysis", &form).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"]["code"], "UNRECOGNIZED_CATEGORY");
    assert_eq!(json["error"]["field"], "lifestyle");
}

#[tokio::test]
async fn test_duplicate_pain_area_rejected() {
    let app = TestApp::without_model(false).await;
    let mut form = desk_worker_form();
    form["pain_areas"] = json!(["neck", "Neck"]);

    let (status, body) = app.post("/api/v1/analysis", &form).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("pain_areas"));
}

// ============================================================================
// Report Download
// ============================================================================

#[tokio::test]
async fn test_report_is_text_attachment() {
    let app = TestApp::new().await;

    let (status, headers, body) = app
        .post_with_headers("/api/v1/analysis/report", &desk_worker_form())
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert!(headers[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("attachment"));

    assert!(body.starts_with("LifeMode AI Health Report"));
    assert!(body.contains("Occupational risk: 14.0 (High Occupational Risk)"));
    assert!(body.contains("Predicted risk level:"));
    assert!(body.contains("- Neck & spine compression"));
}

#[tokio::test]
async fn test_report_rejects_invalid_input() {
    let app = TestApp::without_model(false).await;
    let mut form = desk_worker_form();
    form["mood"] = json!("ecstatic");

    let (status, _, body) = app.post_with_headers("/api/v1/analysis/report", &form).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("mood"));
}

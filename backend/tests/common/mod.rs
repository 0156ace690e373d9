//! Common test utilities for integration tests
//!
//! Each [`TestApp`] owns a temporary directory holding its daily log and,
//! when requested, a freshly trained risk model artifact.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use lifemode_backend::{
    config::AppConfig,
    routes,
    state::AppState,
    training::{save_artifact, train, TrainingOptions},
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub dir: TempDir,
}

impl TestApp {
    /// Create a test application with a trained risk model
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = test_config(&dir, false);

        let options = TrainingOptions {
            samples: 400,
            epochs: 300,
            ..TrainingOptions::default()
        };
        let outcome = train(&options).expect("Failed to train test model");
        save_artifact(&outcome.artifact, &config.risk_model.path).expect("Failed to save model");

        Self::from_config(dir, config)
    }

    /// Create a test application whose model artifact does not exist
    pub async fn without_model(required: bool) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = test_config(&dir, required);
        Self::from_config(dir, config)
    }

    fn from_config(dir: TempDir, config: AppConfig) -> Self {
        let state = AppState::new(config);
        let app = routes::create_router(state.clone());
        Self { app, state, dir }
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let (status, _, body) = self.send(request).await;
        (status, body)
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &Value) -> (StatusCode, String) {
        let (status, _, body) = self.post_with_headers(path, body).await;
        (status, body)
    }

    /// Make a POST request with JSON body, keeping the response headers
    pub async fn post_with_headers(&self, path: &str, body: &Value) -> (StatusCode, HeaderMap, String) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, headers, body_str)
    }
}

fn test_config(dir: &TempDir, required: bool) -> AppConfig {
    let mut config = AppConfig::default();
    config.server.port = 0;
    config.storage.daily_log_path = dir.path().join("daily_log.csv");
    config.risk_model.path = dir.path().join("risk_model.json");
    config.risk_model.required = required;
    config
}

/// A complete, valid analysis form: 28 year old desk worker with neck and
/// lower back pain, 10 h workdays and 7 h of screen time
pub fn desk_worker_form() -> Value {
    json!({
        "height_cm": 175.0,
        "weight_kg": 70.0,
        "age_years": 28,
        "lifestyle": "desk_office",
        "work_posture": "Mostly Sitting",
        "work_hours_per_day": 10.0,
        "screen_time_hours": 7.0,
        "pain_areas": ["neck", "lower_back"],
        "mental_fatigue": 6.0,
        "motivation": 5.0,
        "mood": "neutral",
        "breaks_per_day": 3.0,
        "sleep_hours": 7.0,
        "water_liters": 2.5,
        "protein_grams": 70.0,
        "calories_kcal": 2000.0
    })
}

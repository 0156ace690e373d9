//! Analysis API routes

use crate::error::ApiError;
use crate::services::analysis::AnalysisService;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::Local;
use lifemode_shared::types::{AnalysisResponse, AnalyzeRequest};

/// Create analysis routes
pub fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(analyze))
        .route("/report", post(download_report))
}

/// POST /api/v1/analysis - Run a full analysis
async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let Json(req) = payload?;
    let response = AnalysisService::analyze_with_actions(&state, req)?;
    Ok(Json(response))
}

/// POST /api/v1/analysis/report - Download the analysis as a text report
async fn download_report(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let today = Local::now().date_naive();
    let report = AnalysisService::report(&state, req, today)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"LifeMode_AI_Report.txt\""),
    );

    Ok((headers, report))
}

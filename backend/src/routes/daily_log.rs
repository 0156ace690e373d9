//! Daily log API routes

use crate::error::ApiError;
use crate::services::daily_log::DailyLogService;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lifemode_shared::types::{DailyLogSummary, LogEntryRequest, SummaryQuery};
use lifemode_shared::DailyLogEntry;

/// Create daily log routes
pub fn daily_log_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(record_entry).get(get_history))
        .route("/summary", get(get_summary))
}

/// POST /api/v1/daily-log - Record today's snapshot
async fn record_entry(
    State(state): State<AppState>,
    payload: Result<Json<LogEntryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DailyLogEntry>), ApiError> {
    let Json(req) = payload?;
    let entry = DailyLogService::record(&state, req).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/v1/daily-log - All logged rows, oldest first
async fn get_history(State(state): State<AppState>) -> Result<Json<Vec<DailyLogEntry>>, ApiError> {
    let entries = DailyLogService::history(&state).await?;
    Ok(Json(entries))
}

/// GET /api/v1/daily-log/summary - Moving averages and latest entry
async fn get_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<DailyLogSummary>, ApiError> {
    let summary = DailyLogService::summary(&state, query.window).await?;
    Ok(Json(summary))
}

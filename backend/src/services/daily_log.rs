//! Daily log service
//!
//! Records analysis snapshots and summarizes the log for the dashboard.

use crate::error::ApiResult;
use crate::services::analysis::AnalysisService;
use crate::state::AppState;
use chrono::Local;
use lifemode_shared::types::{DailyLogSummary, LogAverages, LogEntryRequest};
use lifemode_shared::DailyLogEntry;
use tracing::info;

/// Entries averaged by the weekly tracker when no window is given
pub const DEFAULT_SUMMARY_WINDOW: usize = 7;

/// Daily log service for business logic
pub struct DailyLogService;

impl DailyLogService {
    /// Analyze the submitted inputs and append the resulting snapshot
    ///
    /// The date defaults to today in local time.
    pub async fn record(state: &AppState, req: LogEntryRequest) -> ApiResult<DailyLogEntry> {
        let date = req.date.unwrap_or_else(|| Local::now().date_naive());
        let analysis = AnalysisService::analyze(state, req.inputs)?;

        let entry = DailyLogEntry {
            date,
            sleep: analysis.intake.sleep_hours,
            water: analysis.intake.water_liters,
            protein: analysis.intake.protein_grams,
            calories: analysis.intake.calories_kcal,
            health_score: analysis.scores.overall_health_score,
            occupational_risk: analysis.scores.occupational.score,
            screen_time: analysis.profile.screen_time_hours,
            work_hours: analysis.profile.work_hours_per_day,
        };

        state.daily_log.append(entry.clone()).await?;
        info!(date = %entry.date, health_score = entry.health_score, "Daily log entry recorded");
        Ok(entry)
    }

    /// Every logged row, oldest first
    pub async fn history(state: &AppState) -> ApiResult<Vec<DailyLogEntry>> {
        Ok(state.daily_log.load_all().await?)
    }

    pub async fn summary(state: &AppState, window: Option<usize>) -> ApiResult<DailyLogSummary> {
        let entries = state.daily_log.load_all().await?;
        Ok(Self::summarize(&entries, window.unwrap_or(DEFAULT_SUMMARY_WINDOW)))
    }

    /// Summarize log rows over the most recent `window` entries
    pub fn summarize(entries: &[DailyLogEntry], window: usize) -> DailyLogSummary {
        DailyLogSummary {
            entries_count: entries.len(),
            window: window.min(entries.len()),
            moving_average: Self::averages(entries, window),
            latest: entries.last().cloned(),
        }
    }

    fn averages(entries: &[DailyLogEntry], window: usize) -> Option<LogAverages> {
        let column = |f: fn(&DailyLogEntry) -> f64| -> Option<f64> {
            let values: Vec<f64> = entries.iter().map(f).collect();
            Self::calculate_moving_average(&values, window)
        };

        Some(LogAverages {
            sleep: column(|e| e.sleep)?,
            water: column(|e| e.water)?,
            protein: column(|e| e.protein)?,
            calories: column(|e| e.calories)?,
            health_score: column(|e| f64::from(e.health_score))?,
            occupational_risk: column(|e| e.occupational_risk)?,
            screen_time: column(|e| e.screen_time)?,
            work_hours: column(|e| e.work_hours)?,
        })
    }

    /// Calculate an N-entry moving average
    ///
    /// Returns the arithmetic mean of the N most recent values, where the
    /// most recent value is last.
    pub fn calculate_moving_average(values: &[f64], n: usize) -> Option<f64> {
        if values.is_empty() || n == 0 {
            return None;
        }

        let count = values.len().min(n);
        let sum: f64 = values.iter().rev().take(count).sum();
        Some(sum / count as f64)
    }
}

//! API request and response types

use crate::engine::Analysis;
use crate::errors::{HealthError, HealthResult};
use crate::models::{
    parse_category, BiologicalSex, DailyLogEntry, IntakeRecord, Lifestyle, Mood, PainArea,
    UserProfile, WorkPosture,
};
use crate::validation::require;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// Analysis Types
// ============================================================================

/// Raw form submission for one analysis
///
/// Every field is optional on the wire so that an omitted value is reported
/// as a validation error naming the field. Categories arrive as strings and
/// are parsed against their closed sets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub age_years: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biological_sex: Option<String>,
    pub lifestyle: Option<String>,
    pub work_posture: Option<String>,
    pub work_hours_per_day: Option<f64>,
    pub screen_time_hours: Option<f64>,
    #[serde(default)]
    pub pain_areas: Vec<String>,
    pub mental_fatigue: Option<f64>,
    pub motivation: Option<f64>,
    pub mood: Option<String>,
    pub breaks_per_day: Option<f64>,

    pub sleep_hours: Option<f64>,
    pub water_liters: Option<f64>,
    pub protein_grams: Option<f64>,
    pub calories_kcal: Option<f64>,
}

impl AnalyzeRequest {
    /// Convert into typed engine inputs
    ///
    /// Range checks happen later in the engine; this step only resolves
    /// presence, categories and duplicate pain areas.
    pub fn into_inputs(self) -> HealthResult<(UserProfile, IntakeRecord)> {
        let biological_sex = self
            .biological_sex
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(parse_category::<BiologicalSex>)
            .transpose()?;

        let profile = UserProfile {
            height_cm: require("height_cm", self.height_cm)?,
            weight_kg: require("weight_kg", self.weight_kg)?,
            age_years: require("age_years", self.age_years)?,
            biological_sex,
            lifestyle: parse_category::<Lifestyle>(&require("lifestyle", self.lifestyle)?)?,
            work_posture: parse_category::<WorkPosture>(&require(
                "work_posture",
                self.work_posture,
            )?)?,
            work_hours_per_day: require("work_hours_per_day", self.work_hours_per_day)?,
            screen_time_hours: require("screen_time_hours", self.screen_time_hours)?,
            pain_areas: parse_pain_areas(&self.pain_areas)?,
            mental_fatigue: require("mental_fatigue", self.mental_fatigue)?,
            motivation: require("motivation", self.motivation)?,
            mood: parse_category::<Mood>(&require("mood", self.mood)?)?,
            breaks_per_day: require("breaks_per_day", self.breaks_per_day)?,
        };

        let intake = IntakeRecord {
            sleep_hours: require("sleep_hours", self.sleep_hours)?,
            water_liters: require("water_liters", self.water_liters)?,
            protein_grams: require("protein_grams", self.protein_grams)?,
            calories_kcal: require("calories_kcal", self.calories_kcal)?,
        };

        Ok((profile, intake))
    }
}

/// Parse pain areas, rejecting any area listed twice
pub fn parse_pain_areas(values: &[String]) -> HealthResult<BTreeSet<PainArea>> {
    let mut areas = BTreeSet::new();
    for value in values {
        let area = parse_category::<PainArea>(value)?;
        if !areas.insert(area) {
            return Err(HealthError::validation(
                "pain_areas",
                format!("'{}' is listed more than once", value.trim()),
            ));
        }
    }
    Ok(areas)
}

/// Analysis response with rendered guidance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(flatten)]
    pub analysis: Analysis,
    pub corrective_actions: Vec<String>,
}

// ============================================================================
// Daily Log Types
// ============================================================================

/// Request to record today's (or a given day's) snapshot
///
/// The stored health score and occupational risk are computed from the
/// submitted inputs, never taken from the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(flatten)]
    pub inputs: AnalyzeRequest,
}

/// Daily log summary query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryQuery {
    pub window: Option<usize>,
}

/// Mean of each numeric log column over a window of entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogAverages {
    pub sleep: f64,
    pub water: f64,
    pub protein: f64,
    pub calories: f64,
    pub health_score: f64,
    pub occupational_risk: f64,
    pub screen_time: f64,
    pub work_hours: f64,
}

/// Dashboard summary of the daily log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLogSummary {
    pub entries_count: usize,
    /// Number of most recent entries averaged
    pub window: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moving_average: Option<LogAverages>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<DailyLogEntry>,
}

//! Input validation functions
//!
//! Range limits live on the input records as `validator` attributes. The
//! functions here add the checks the derive cannot express (finite values)
//! and translate violations into [`HealthError::Validation`] naming the
//! first offending field.

use crate::errors::{HealthError, HealthResult};
use crate::models::{IntakeRecord, UserProfile};
use validator::{Validate, ValidationErrors};

/// Reject NaN and infinite values before range checks
///
/// Range comparisons against NaN are always false, so a NaN would
/// otherwise slip through every declared bound.
pub fn validate_finite(field: &str, value: f64) -> HealthResult<()> {
    if value.is_nan() || value.is_infinite() {
        return Err(HealthError::validation(field, "must be a valid number"));
    }
    Ok(())
}

/// Validate a profile against its declared ranges
pub fn validate_profile(profile: &UserProfile) -> HealthResult<()> {
    for (field, value) in [
        ("height_cm", profile.height_cm),
        ("weight_kg", profile.weight_kg),
        ("work_hours_per_day", profile.work_hours_per_day),
        ("screen_time_hours", profile.screen_time_hours),
        ("mental_fatigue", profile.mental_fatigue),
        ("motivation", profile.motivation),
        ("breaks_per_day", profile.breaks_per_day),
    ] {
        validate_finite(field, value)?;
    }
    profile.validate().map_err(|e| first_violation(&e))
}

/// Validate an intake record against its declared ranges
pub fn validate_intake(intake: &IntakeRecord) -> HealthResult<()> {
    for (field, value) in [
        ("sleep_hours", intake.sleep_hours),
        ("water_liters", intake.water_liters),
        ("protein_grams", intake.protein_grams),
        ("calories_kcal", intake.calories_kcal),
    ] {
        validate_finite(field, value)?;
    }
    intake.validate().map_err(|e| first_violation(&e))
}

/// Pick a deterministic field out of a set of violations
fn first_violation(errors: &ValidationErrors) -> HealthError {
    let mut violations: Vec<(String, String)> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let message = errs
                .first()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .unwrap_or_else(|| "is invalid".to_string());
            (field.to_string(), message)
        })
        .collect();
    violations.sort();

    match violations.into_iter().next() {
        Some((field, message)) => HealthError::Validation { field, message },
        None => HealthError::validation("input", "is invalid"),
    }
}

/// Require a field that the caller may have omitted
pub fn require<T>(field: &str, value: Option<T>) -> HealthResult<T> {
    value.ok_or_else(|| HealthError::validation(field, "is required"))
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "height_cm" => "Height",
        "weight_kg" => "Weight",
        "age_years" => "Age",
        "biological_sex" => "Biological Sex",
        "lifestyle" => "Working Lifestyle",
        "work_posture" => "Work Posture",
        "work_hours_per_day" => "Working Hours per Day",
        "screen_time_hours" => "Daily Screen Time",
        "pain_areas" => "Pain Areas",
        "mental_fatigue" => "Mental Fatigue",
        "motivation" => "Motivation",
        "mood" => "Mood",
        "breaks_per_day" => "Breaks per Day",
        "sleep_hours" => "Sleep",
        "water_liters" => "Water Intake",
        "protein_grams" => "Protein Intake",
        "calories_kcal" => "Calorie Intake",
        _ => field_name,
    }
}

/// Format an error for display to the end user
pub fn user_message(error: &HealthError) -> String {
    match error {
        HealthError::Validation { field, message } => {
            format!("{}: {}", get_field_display_label(field), message)
        }
        HealthError::UnrecognizedCategory { field, value } => {
            format!("{}: '{}' is not a recognized option", get_field_display_label(field), value)
        }
        other => other.to_string(),
    }
}

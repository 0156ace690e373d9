//! Health metrics calculations module
//!
//! Derives biological targets (ideal sleep, water, protein and calories)
//! and the BMI classification from a user profile.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: All calculations are pure, no side effects
//! 2. **Table-Driven**: Lookup constants come from [`ReferenceTables`]
//! 3. **Fail Closed**: Zero denominators and unknown categories are errors

use crate::errors::{HealthError, HealthResult};
use crate::models::UserProfile;
use crate::tables::ReferenceTables;
use serde::{Deserialize, Serialize};

/// Daily water need per kg of body weight, in liters
pub const WATER_LITERS_PER_KG: f64 = 0.035;

/// Protein band per kg of body weight, in grams
pub const PROTEIN_MIN_G_PER_KG: f64 = 0.8;
pub const PROTEIN_MAX_G_PER_KG: f64 = 1.2;

/// Baseline energy need per kg of body weight per day, in kcal
pub const CALORIES_PER_KG: f64 = 24.0;

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// ============================================================================
// Age Groups
// ============================================================================

/// Life stage used to pick the ideal sleep duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    Adolescent,
    YoungAdult,
    Adult,
    OlderAdult,
}

impl AgeGroup {
    pub fn description(&self) -> &'static str {
        match self {
            AgeGroup::Adolescent => "Adolescent",
            AgeGroup::YoungAdult => "Young Adult",
            AgeGroup::Adult => "Adult",
            AgeGroup::OlderAdult => "Older Adult",
        }
    }
}

// ============================================================================
// BMI Calculations
// ============================================================================

/// BMI category classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Every category in ascending BMI order
    pub const ALL: [BmiCategory; 4] = [
        BmiCategory::Underweight,
        BmiCategory::Normal,
        BmiCategory::Overweight,
        BmiCategory::Obese,
    ];

    /// Get the BMI range for this category, lower bound inclusive
    pub fn range(&self) -> (f64, f64) {
        match self {
            BmiCategory::Underweight => (0.0, 18.5),
            BmiCategory::Normal => (18.5, 25.0),
            BmiCategory::Overweight => (25.0, 30.0),
            BmiCategory::Obese => (30.0, f64::INFINITY),
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

/// Calculate BMI from weight and height, rounded to 2 decimals
///
/// Formula: BMI = weight(kg) / height(m)²
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> HealthResult<f64> {
    if !(height_cm.is_finite() && height_cm > 0.0) {
        return Err(HealthError::DivisionByZero(
            "height must be greater than 0 cm to compute BMI".to_string(),
        ));
    }
    let height_m = height_cm / 100.0;
    Ok(round_to(weight_kg / (height_m * height_m), 2))
}

/// Classify BMI into category
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    BmiCategory::ALL
        .iter()
        .copied()
        .find(|category| bmi < category.range().1)
        .unwrap_or(BmiCategory::Obese)
}

// ============================================================================
// Ideal Targets
// ============================================================================

/// Targets derived from a profile, recomputed on every analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedTargets {
    pub age_group: AgeGroup,
    pub ideal_sleep_hours: f64,
    pub lifestyle_factor: f64,
    pub ideal_water_liters: f64,
    pub ideal_protein_min_g: u32,
    pub ideal_protein_max_g: u32,
    pub ideal_calories_kcal: u32,
    pub bmi_value: f64,
    pub bmi_category: BmiCategory,
}

/// Ideal daily water intake in liters (2 decimals)
pub fn ideal_water_liters(weight_kg: f64, lifestyle_factor: f64) -> f64 {
    round_to(weight_kg * WATER_LITERS_PER_KG * lifestyle_factor, 2)
}

/// Ideal protein band in grams, each end rounded to the nearest gram (halves to even)
pub fn ideal_protein_band_g(weight_kg: f64) -> (u32, u32) {
    let min = (weight_kg * PROTEIN_MIN_G_PER_KG).round_ties_even().max(0.0) as u32;
    let max = (weight_kg * PROTEIN_MAX_G_PER_KG).round_ties_even().max(0.0) as u32;
    (min, max)
}

/// Ideal daily calories, rounded to the nearest kcal (halves to even)
pub fn ideal_calories_kcal(weight_kg: f64, lifestyle_factor: f64) -> u32 {
    (CALORIES_PER_KG * weight_kg * lifestyle_factor).round_ties_even().max(0.0) as u32
}

/// Derive all biological targets for a profile
pub fn derive_targets(profile: &UserProfile, tables: &ReferenceTables) -> HealthResult<DerivedTargets> {
    let bmi_value = calculate_bmi(profile.weight_kg, profile.height_cm)?;
    let band = tables.sleep_band(profile.age_years)?;
    let factor = tables.lifestyle_factor(profile.lifestyle)?;
    let (protein_min, protein_max) = ideal_protein_band_g(profile.weight_kg);

    Ok(DerivedTargets {
        age_group: band.group,
        ideal_sleep_hours: band.ideal_hours,
        lifestyle_factor: factor,
        ideal_water_liters: ideal_water_liters(profile.weight_kg, factor),
        ideal_protein_min_g: protein_min,
        ideal_protein_max_g: protein_max,
        ideal_calories_kcal: ideal_calories_kcal(profile.weight_kg, factor),
        bmi_value,
        bmi_category: classify_bmi(bmi_value),
    })
}

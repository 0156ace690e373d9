//! Scoring engine
//!
//! Maps intake, profile and derived targets to normalized sub-scores, the
//! overall health score, the occupational-strain and burnout heuristics,
//! and the composite index.
//!
//! None of these scores is clinically validated. The occupational and
//! burnout scores are additive heuristics and the composite index is a
//! fixed weighted blend.

use crate::errors::{HealthError, HealthResult};
use crate::health_metrics::{round_to, BmiCategory, DerivedTargets};
use crate::models::{IntakeRecord, Mood, UserProfile, WorkPosture};
use crate::tables::{BurnoutBands, CompositeWeights, OccupationalBands, ReferenceTables};
use serde::{Deserialize, Serialize};

/// Points per reported pain area
pub const POINTS_PER_PAIN_AREA: f64 = 1.5;

/// Points added by lifestyle or workload strain factors
pub const LIFESTYLE_STRAIN_POINTS: f64 = 3.0;

/// Points added by a one-sided work posture
pub const POSTURE_STRAIN_POINTS: f64 = 2.0;

/// Working hours at or above which long-duration fatigue applies
pub const LONG_WORKDAY_HOURS: f64 = 9.0;

/// Screen time at or above which digital eye strain applies
pub const HIGH_SCREEN_TIME_HOURS: f64 = 6.0;

// ============================================================================
// Intake Sub-Scores
// ============================================================================

/// Five normalized sub-scores, each in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub sleep: f64,
    pub water: f64,
    pub protein: f64,
    pub calorie: f64,
    pub bmi: f64,
}

impl SubScores {
    pub fn as_array(&self) -> [f64; 5] {
        [self.sleep, self.water, self.protein, self.calorie, self.bmi]
    }
}

/// Share of each ideal target met by actual intake, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fulfillment {
    pub sleep: f64,
    pub water: f64,
    pub protein: f64,
    pub calories: f64,
}

/// Sub-score for one intake target: min(actual / ideal × 100, 100)
///
/// An ideal of zero has no meaningful ratio and is rejected.
pub fn intake_sub_score(target: &str, actual: f64, ideal: f64) -> HealthResult<f64> {
    if !(ideal.is_finite() && ideal > 0.0) {
        return Err(HealthError::DivisionByZero(format!(
            "ideal {} target must be greater than 0",
            target
        )));
    }
    Ok((actual / ideal * 100.0).clamp(0.0, 100.0))
}

/// Step-function score for a BMI category
pub fn bmi_sub_score(category: BmiCategory) -> f64 {
    match category {
        BmiCategory::Normal => 100.0,
        BmiCategory::Underweight | BmiCategory::Overweight => 70.0,
        BmiCategory::Obese => 40.0,
    }
}

/// Compute all five sub-scores
///
/// Protein is measured against the top of the ideal band.
pub fn sub_scores(intake: &IntakeRecord, targets: &DerivedTargets) -> HealthResult<SubScores> {
    Ok(SubScores {
        sleep: intake_sub_score("sleep", intake.sleep_hours, targets.ideal_sleep_hours)?,
        water: intake_sub_score("water", intake.water_liters, targets.ideal_water_liters)?,
        protein: intake_sub_score(
            "protein",
            intake.protein_grams,
            f64::from(targets.ideal_protein_max_g),
        )?,
        calorie: intake_sub_score(
            "calories",
            intake.calories_kcal,
            f64::from(targets.ideal_calories_kcal),
        )?,
        bmi: bmi_sub_score(targets.bmi_category),
    })
}

/// Overall health score: mean of the five sub-scores, exact halves to even
pub fn overall_health_score(scores: &SubScores) -> u32 {
    let values = scores.as_array();
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    mean.round_ties_even().clamp(0.0, 100.0) as u32
}

impl From<&SubScores> for Fulfillment {
    fn from(scores: &SubScores) -> Self {
        Self {
            sleep: scores.sleep / 100.0,
            water: scores.water / 100.0,
            protein: scores.protein / 100.0,
            calories: scores.calorie / 100.0,
        }
    }
}

// ============================================================================
// Occupational Strain
// ============================================================================

/// Occupational risk band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupationalBand {
    Low,
    Moderate,
    High,
    Severe,
}

impl OccupationalBand {
    pub fn description(&self) -> &'static str {
        match self {
            OccupationalBand::Low => "Low Occupational Risk",
            OccupationalBand::Moderate => "Moderate Occupational Risk",
            OccupationalBand::High => "High Occupational Risk",
            OccupationalBand::Severe => "Severe Occupational Risk",
        }
    }
}

/// A detected contributor to occupational strain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrainFactor {
    SedentaryStrain,
    ProlongedStanding,
    JointOveruse,
    LongDurationFatigue,
    DigitalEyeStrain,
    SpineCompression,
    LowerLimbStress,
}

impl StrainFactor {
    pub fn description(&self) -> &'static str {
        match self {
            StrainFactor::SedentaryStrain => "Sedentary strain risk",
            StrainFactor::ProlongedStanding => "Prolonged standing strain",
            StrainFactor::JointOveruse => "Joint overuse risk",
            StrainFactor::LongDurationFatigue => "Long-duration fatigue",
            StrainFactor::DigitalEyeStrain => "Digital eye strain",
            StrainFactor::SpineCompression => "Neck & spine compression",
            StrainFactor::LowerLimbStress => "Knee, hip & foot stress",
        }
    }

    pub fn points(&self) -> f64 {
        match self {
            StrainFactor::SpineCompression | StrainFactor::LowerLimbStress => POSTURE_STRAIN_POINTS,
            _ => LIFESTYLE_STRAIN_POINTS,
        }
    }
}

/// Occupational strain score with its band and contributors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupationalAssessment {
    /// Non-negative, unbounded above, 1 decimal
    pub score: f64,
    pub band: OccupationalBand,
    pub strain_factors: Vec<StrainFactor>,
}

/// Detect the strain factors present in a profile, in scoring order
pub fn strain_factors(profile: &UserProfile) -> Vec<StrainFactor> {
    use crate::models::Lifestyle;

    let mut factors = Vec::new();
    if profile.lifestyle.is_sedentary() {
        factors.push(StrainFactor::SedentaryStrain);
    }
    if profile.lifestyle == Lifestyle::RestaurantRetail {
        factors.push(StrainFactor::ProlongedStanding);
    }
    if profile.lifestyle == Lifestyle::PhysicallyActive {
        factors.push(StrainFactor::JointOveruse);
    }
    if profile.work_hours_per_day >= LONG_WORKDAY_HOURS {
        factors.push(StrainFactor::LongDurationFatigue);
    }
    if profile.screen_time_hours >= HIGH_SCREEN_TIME_HOURS {
        factors.push(StrainFactor::DigitalEyeStrain);
    }
    match profile.work_posture {
        WorkPosture::MostlySitting => factors.push(StrainFactor::SpineCompression),
        WorkPosture::MostlyStanding => factors.push(StrainFactor::LowerLimbStress),
        WorkPosture::Mixed | WorkPosture::PhysicalMoving => {}
    }
    factors
}

/// Band an occupational score
pub fn classify_occupational(score: f64, bands: &OccupationalBands) -> OccupationalBand {
    if score <= bands.low_max {
        OccupationalBand::Low
    } else if score <= bands.moderate_max {
        OccupationalBand::Moderate
    } else if score <= bands.high_max {
        OccupationalBand::High
    } else {
        OccupationalBand::Severe
    }
}

/// Score occupational strain from pain areas, lifestyle, workload and posture
pub fn assess_occupational(profile: &UserProfile, bands: &OccupationalBands) -> OccupationalAssessment {
    let factors = strain_factors(profile);
    let raw = POINTS_PER_PAIN_AREA * profile.pain_areas.len() as f64
        + factors.iter().map(StrainFactor::points).sum::<f64>();
    let score = round_to(raw, 1);

    OccupationalAssessment {
        score,
        band: classify_occupational(score, bands),
        strain_factors: factors,
    }
}

// ============================================================================
// Burnout
// ============================================================================

/// Burnout band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BurnoutBand {
    Low,
    Moderate,
    High,
}

impl BurnoutBand {
    pub fn description(&self) -> &'static str {
        match self {
            BurnoutBand::Low => "Low Burnout Risk",
            BurnoutBand::Moderate => "Moderate Burnout Risk",
            BurnoutBand::High => "High Burnout Risk",
        }
    }
}

/// Burnout score with its band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurnoutAssessment {
    /// Non-negative, 1 decimal
    pub score: f64,
    pub band: BurnoutBand,
}

/// Band a burnout score
pub fn classify_burnout(score: f64, bands: &BurnoutBands) -> BurnoutBand {
    if score < bands.low_below {
        BurnoutBand::Low
    } else if score < bands.moderate_below {
        BurnoutBand::Moderate
    } else {
        BurnoutBand::High
    }
}

/// Burnout = (fatigue×10 + (10−motivation)×10 + (10−breaks)×5 + low-mood 5) / 3
pub fn assess_burnout(profile: &UserProfile, bands: &BurnoutBands) -> BurnoutAssessment {
    let mood_penalty = if profile.mood == Mood::Low { 5.0 } else { 0.0 };
    let raw = (profile.mental_fatigue * 10.0
        + (10.0 - profile.motivation) * 10.0
        + (10.0 - profile.breaks_per_day) * 5.0
        + mood_penalty)
        / 3.0;
    let score = round_to(raw.max(0.0), 1);

    BurnoutAssessment {
        score,
        band: classify_burnout(score, bands),
    }
}

// ============================================================================
// Composite Index
// ============================================================================

/// Weighted blend of health score with the complements of burnout and strain
pub fn composite_index(
    overall_health_score: u32,
    burnout_score: f64,
    occupational_score: f64,
    weights: &CompositeWeights,
) -> u32 {
    let burnout_part = (100.0 - burnout_score).max(0.0);
    let occupational_part = (100.0 - occupational_score * weights.occupational_scale).max(0.0);
    let blended = f64::from(overall_health_score) * weights.health
        + burnout_part * weights.burnout
        + occupational_part * weights.occupational;
    blended.round_ties_even().max(0.0) as u32
}

// ============================================================================
// Score Bundle
// ============================================================================

/// Every score produced for one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBundle {
    pub sub_scores: SubScores,
    pub overall_health_score: u32,
    pub fulfillment: Fulfillment,
    pub occupational: OccupationalAssessment,
    pub burnout: BurnoutAssessment,
    pub composite_index: u32,
}

/// Score one analysis
pub fn score(
    profile: &UserProfile,
    intake: &IntakeRecord,
    targets: &DerivedTargets,
    tables: &ReferenceTables,
) -> HealthResult<ScoreBundle> {
    let sub_scores = sub_scores(intake, targets)?;
    let overall = overall_health_score(&sub_scores);
    let occupational = assess_occupational(profile, &tables.occupational_bands);
    let burnout = assess_burnout(profile, &tables.burnout_bands);
    let composite = composite_index(
        overall,
        burnout.score,
        occupational.score,
        &tables.composite_weights,
    );

    Ok(ScoreBundle {
        fulfillment: Fulfillment::from(&sub_scores),
        sub_scores,
        overall_health_score: overall,
        occupational,
        burnout,
        composite_index: composite,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health_metrics::{derive_targets, AgeGroup};
    use crate::models::{Lifestyle, PainArea};
    use proptest::prelude::*;
    use rstest::rstest;
    use std::collections::BTreeSet;

    fn profile() -> UserProfile {
        UserProfile {
            height_cm: 175.0,
            weight_kg: 70.0,
            age_years: 30,
            biological_sex: None,
            lifestyle: Lifestyle::StudentPartTime,
            work_posture: WorkPosture::Mixed,
            work_hours_per_day: 6.0,
            screen_time_hours: 3.0,
            pain_areas: BTreeSet::new(),
            mental_fatigue: 0.0,
            motivation: 10.0,
            mood: Mood::Good,
            breaks_per_day: 10.0,
        }
    }

    fn targets() -> DerivedTargets {
        DerivedTargets {
            age_group: AgeGroup::YoungAdult,
            ideal_sleep_hours: 8.0,
            lifestyle_factor: 1.2,
            ideal_water_liters: 2.94,
            ideal_protein_min_g: 56,
            ideal_protein_max_g: 84,
            ideal_calories_kcal: 2016,
            bmi_value: 22.86,
            bmi_category: BmiCategory::Normal,
        }
    }

    // =========================================================================
    // Sub-Score Tests
    // =========================================================================

    #[test]
    fn test_sub_scores_against_ideals() {
        let intake = IntakeRecord {
            sleep_hours: 6.0,
            water_liters: 2.94,
            protein_grams: 42.0,
            calories_kcal: 1008.0,
        };
        let scores = sub_scores(&intake, &targets()).unwrap();
        assert!((scores.sleep - 75.0).abs() < 1e-9);
        assert!((scores.water - 100.0).abs() < 1e-9);
        assert!((scores.protein - 50.0).abs() < 1e-9);
        assert!((scores.calorie - 50.0).abs() < 1e-9);
        assert_eq!(scores.bmi, 100.0);
        // (75 + 100 + 50 + 50 + 100) / 5 = 75
        assert_eq!(overall_health_score(&scores), 75);
    }

    #[test]
    fn test_zero_ideal_is_division_error() {
        let err = intake_sub_score("water", 2.0, 0.0).unwrap_err();
        assert!(matches!(err, HealthError::DivisionByZero(_)));

        let mut t = targets();
        t.ideal_calories_kcal = 0;
        let intake = IntakeRecord {
            sleep_hours: 8.0,
            water_liters: 2.0,
            protein_grams: 80.0,
            calories_kcal: 2000.0,
        };
        assert!(sub_scores(&intake, &t).is_err());
    }

    #[rstest]
    #[case(BmiCategory::Normal, 100.0)]
    #[case(BmiCategory::Underweight, 70.0)]
    #[case(BmiCategory::Overweight, 70.0)]
    #[case(BmiCategory::Obese, 40.0)]
    fn test_bmi_sub_score_steps(#[case] category: BmiCategory, #[case] expected: f64) {
        assert_eq!(bmi_sub_score(category), expected);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: sub-scores are clamped to [0, 100] for any excess
        #[test]
        fn prop_sub_score_clamped(actual in 0.0f64..1.0e6, ideal in 0.01f64..5000.0) {
            let s = intake_sub_score("any", actual, ideal).unwrap();
            prop_assert!((0.0..=100.0).contains(&s));
        }

        /// Property: fulfillment ratios stay within [0, 1]
        #[test]
        fn prop_fulfillment_bounded(
            sleep in 0.0f64..=24.0,
            water in 0.0f64..=10.0,
            protein in 0.0f64..=300.0,
            calories in 0.0f64..=5000.0
        ) {
            let intake = IntakeRecord {
                sleep_hours: sleep,
                water_liters: water,
                protein_grams: protein,
                calories_kcal: calories,
            };
            let scores = sub_scores(&intake, &targets()).unwrap();
            let f = Fulfillment::from(&scores);
            for v in [f.sleep, f.water, f.protein, f.calories] {
                prop_assert!((0.0..=1.0).contains(&v));
            }
            prop_assert!(overall_health_score(&scores) <= 100);
        }

        /// Property: shifting one sub-score by δ shifts the overall by about δ/5
        #[test]
        fn prop_overall_tracks_single_sub_score(
            base in prop::array::uniform5(0.0f64..=80.0),
            delta in 0.0f64..=20.0
        ) {
            let before = SubScores { sleep: base[0], water: base[1], protein: base[2], calorie: base[3], bmi: base[4] };
            let after = SubScores { sleep: base[0] + delta, ..before };
            let shift = overall_health_score(&after) as f64 - overall_health_score(&before) as f64;
            prop_assert!((shift - delta / 5.0).abs() <= 1.0);
        }
    }

    // =========================================================================
    // Occupational Tests
    // =========================================================================

    #[test]
    fn test_desk_worker_occupational_scenario() {
        let mut p = profile();
        p.lifestyle = Lifestyle::DeskOffice;
        p.pain_areas = BTreeSet::from([PainArea::Neck, PainArea::LowerBack]);
        p.work_hours_per_day = 10.0;
        p.screen_time_hours = 7.0;
        p.work_posture = WorkPosture::MostlySitting;

        let tables = ReferenceTables::default();
        let occ = assess_occupational(&p, &tables.occupational_bands);
        // 1.5×2 + 3 (sedentary) + 3 (hours) + 3 (screen) + 2 (sitting)
        assert_eq!(occ.score, 14.0);
        assert_eq!(occ.band, OccupationalBand::High);
        assert_eq!(
            occ.strain_factors,
            vec![
                StrainFactor::SedentaryStrain,
                StrainFactor::LongDurationFatigue,
                StrainFactor::DigitalEyeStrain,
                StrainFactor::SpineCompression,
            ]
        );
    }

    #[test]
    fn test_no_strain_scores_zero() {
        let tables = ReferenceTables::default();
        let occ = assess_occupational(&profile(), &tables.occupational_bands);
        assert_eq!(occ.score, 0.0);
        assert_eq!(occ.band, OccupationalBand::Low);
        assert!(occ.strain_factors.is_empty());
    }

    #[test]
    fn test_standing_retail_worker() {
        let mut p = profile();
        p.lifestyle = Lifestyle::RestaurantRetail;
        p.work_posture = WorkPosture::MostlyStanding;
        p.pain_areas = BTreeSet::from([PainArea::Knees, PainArea::Feet, PainArea::Hips]);
        let tables = ReferenceTables::default();
        let occ = assess_occupational(&p, &tables.occupational_bands);
        // 4.5 + 3 + 2
        assert_eq!(occ.score, 9.5);
        assert_eq!(occ.band, OccupationalBand::Moderate);
    }

    #[test]
    fn test_occupational_score_is_unbounded_above() {
        let mut p = profile();
        p.lifestyle = Lifestyle::GamerStreamer;
        p.work_posture = WorkPosture::MostlySitting;
        p.work_hours_per_day = 16.0;
        p.screen_time_hours = 16.0;
        p.pain_areas = <PainArea as crate::models::Category>::all().iter().copied().collect();
        let tables = ReferenceTables::default();
        let occ = assess_occupational(&p, &tables.occupational_bands);
        assert_eq!(occ.score, 26.0);
        assert_eq!(occ.band, OccupationalBand::Severe);
    }

    #[rstest]
    #[case(5.0, OccupationalBand::Low)]
    #[case(5.1, OccupationalBand::Moderate)]
    #[case(10.0, OccupationalBand::Moderate)]
    #[case(10.1, OccupationalBand::High)]
    #[case(15.0, OccupationalBand::High)]
    #[case(15.1, OccupationalBand::Severe)]
    fn test_occupational_band_boundaries(#[case] score: f64, #[case] expected: OccupationalBand) {
        let tables = ReferenceTables::default();
        assert_eq!(classify_occupational(score, &tables.occupational_bands), expected);
    }

    // =========================================================================
    // Burnout Tests
    // =========================================================================

    #[rstest]
    #[case(29.9, BurnoutBand::Low)]
    #[case(30.0, BurnoutBand::Moderate)]
    #[case(59.9, BurnoutBand::Moderate)]
    #[case(60.0, BurnoutBand::High)]
    fn test_burnout_band_boundaries(#[case] score: f64, #[case] expected: BurnoutBand) {
        let tables = ReferenceTables::default();
        assert_eq!(classify_burnout(score, &tables.burnout_bands), expected);
    }

    #[test]
    fn test_burnout_formula() {
        let tables = ReferenceTables::default();
        let mut p = profile();
        p.mental_fatigue = 7.0;
        p.motivation = 4.0;
        p.breaks_per_day = 2.0;
        p.mood = Mood::Low;
        // (70 + 60 + 40 + 5) / 3 = 58.33 -> 58.3
        let burnout = assess_burnout(&p, &tables.burnout_bands);
        assert_eq!(burnout.score, 58.3);
        assert_eq!(burnout.band, BurnoutBand::Moderate);

        p.mood = Mood::Neutral;
        // (70 + 60 + 40) / 3 = 56.67 -> 56.7
        assert_eq!(assess_burnout(&p, &tables.burnout_bands).score, 56.7);
    }

    #[test]
    fn test_burnout_extremes() {
        let tables = ReferenceTables::default();
        assert_eq!(assess_burnout(&profile(), &tables.burnout_bands).score, 0.0);

        let mut p = profile();
        p.mental_fatigue = 10.0;
        p.motivation = 0.0;
        p.breaks_per_day = 0.0;
        p.mood = Mood::Low;
        // (100 + 100 + 50 + 5) / 3 = 85
        let burnout = assess_burnout(&p, &tables.burnout_bands);
        assert_eq!(burnout.score, 85.0);
        assert_eq!(burnout.band, BurnoutBand::High);
    }

    // =========================================================================
    // Composite Tests
    // =========================================================================

    #[test]
    fn test_composite_index() {
        let weights = ReferenceTables::default().composite_weights;
        // 80×0.45 + 60×0.30 + (100 − 60)×0.25 = 36 + 18 + 10
        assert_eq!(composite_index(80, 40.0, 10.0, &weights), 64);
        // complements are floored at zero
        assert_eq!(composite_index(100, 150.0, 30.0, &weights), 45);
        assert_eq!(composite_index(100, 0.0, 0.0, &weights), 100);
        // 90×0.45 = 40.5 with both complements at zero
        assert_eq!(composite_index(90, 100.0, 20.0, &weights), 40);
    }

    #[rstest]
    #[case(62.5, 86)]
    #[case(67.5, 88)]
    #[case(65.0, 87)]
    fn test_overall_score_halves_round_to_even(#[case] calorie: f64, #[case] expected: u32) {
        let scores = SubScores {
            sleep: 100.0,
            water: 100.0,
            protein: 100.0,
            calorie,
            bmi: 70.0,
        };
        assert_eq!(overall_health_score(&scores), expected);
    }

    #[test]
    fn test_full_score_bundle() {
        let tables = ReferenceTables::default();
        let p = UserProfile {
            lifestyle: Lifestyle::DeskOffice,
            ..profile()
        };
        let targets = derive_targets(&p, &tables).unwrap();
        let intake = IntakeRecord {
            sleep_hours: 8.0,
            water_liters: 2.94,
            protein_grams: 84.0,
            calories_kcal: 2016.0,
        };
        let bundle = score(&p, &intake, &targets, &tables).unwrap();
        assert_eq!(bundle.overall_health_score, 100);
        assert_eq!(bundle.occupational.score, 3.0);
        assert_eq!(bundle.burnout.score, 0.0);
        // 45 + 30 + (100 − 18)×0.25 = 95.5 -> 96
        assert_eq!(bundle.composite_index, 96);
        assert_eq!(bundle.fulfillment.sleep, 1.0);
    }
}

//! Report composition
//!
//! Turns an [`Analysis`] into user-facing guidance and a plain-text
//! report. No new numbers are computed here.

use crate::engine::Analysis;
use crate::models::{Category, PainArea, UserProfile};
use crate::scoring::HIGH_SCREEN_TIME_HOURS;
use chrono::NaiveDate;
use std::fmt;

/// Corrective and preventive actions for a profile's pain areas and habits
pub fn corrective_actions(profile: &UserProfile) -> Vec<&'static str> {
    let has = |area: PainArea| profile.pain_areas.contains(&area);
    let mut actions = Vec::new();

    if has(PainArea::Neck) || has(PainArea::Shoulders) {
        actions.push("Do neck retraction and shoulder roll exercises every 60-90 minutes.");
        actions.push("Keep the screen at eye level and avoid forward head posture.");
    }
    if has(PainArea::LowerBack) || has(PainArea::UpperBack) {
        actions.push("Add lumbar support and avoid slouching.");
        actions.push("Try cobra stretch, cat-cow, and seated spinal extensions.");
    }
    if has(PainArea::WristHand) {
        actions.push("Use a wrist-neutral posture and avoid resting wrists on hard edges.");
        actions.push("Perform wrist flexor and extensor stretches.");
    }
    if has(PainArea::Knees) || has(PainArea::Feet) {
        actions.push("Use cushioned footwear and anti-fatigue mats.");
        actions.push("Avoid locking your knees while standing.");
    }
    if profile.screen_time_hours >= HIGH_SCREEN_TIME_HOURS {
        actions.push("Follow the 20-20-20 rule: every 20 minutes, look 20 feet away for 20 seconds.");
    }

    actions.push("Take a 3-5 minute mobility break every hour.");
    actions.push("Weekly stretching and posture strengthening is strongly advised.");
    actions
}

/// Plain-text rendering of an analysis
///
/// Use `to_string()` to obtain the downloadable report body.
pub struct TextReport<'a> {
    analysis: &'a Analysis,
    generated_on: NaiveDate,
}

impl<'a> TextReport<'a> {
    pub fn new(analysis: &'a Analysis, generated_on: NaiveDate) -> Self {
        Self {
            analysis,
            generated_on,
        }
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = self.analysis;
        let p = &a.profile;
        let t = &a.targets;
        let s = &a.scores;

        writeln!(f, "LifeMode AI Health Report")?;
        writeln!(f, "Generated: {}", self.generated_on.format("%Y-%m-%d"))?;
        writeln!(f, "Reference tables: {}", a.tables_version)?;
        writeln!(f)?;

        writeln!(f, "== Profile ==")?;
        writeln!(f, "Age: {} ({})", p.age_years, t.age_group.description())?;
        writeln!(f, "Height: {:.0} cm, Weight: {:.1} kg", p.height_cm, p.weight_kg)?;
        writeln!(f, "Lifestyle: {}", p.lifestyle.label())?;
        writeln!(f, "Work posture: {}", p.work_posture.label())?;
        writeln!(
            f,
            "Work hours: {:.1} h/day, Screen time: {:.1} h/day",
            p.work_hours_per_day, p.screen_time_hours
        )?;
        writeln!(f)?;

        writeln!(f, "== Biological Targets ==")?;
        writeln!(f, "BMI: {:.2} ({})", t.bmi_value, t.bmi_category.description())?;
        writeln!(
            f,
            "Sleep: {:.1} h (ideal {:.1} h)",
            a.intake.sleep_hours, t.ideal_sleep_hours
        )?;
        writeln!(
            f,
            "Water: {:.2} L (ideal {:.2} L)",
            a.intake.water_liters, t.ideal_water_liters
        )?;
        writeln!(
            f,
            "Protein: {:.0} g (ideal {}-{} g)",
            a.intake.protein_grams, t.ideal_protein_min_g, t.ideal_protein_max_g
        )?;
        writeln!(
            f,
            "Calories: {:.0} kcal (ideal {} kcal)",
            a.intake.calories_kcal, t.ideal_calories_kcal
        )?;
        writeln!(f)?;

        writeln!(f, "== Scores ==")?;
        writeln!(f, "Overall health score: {} / 100", s.overall_health_score)?;
        writeln!(
            f,
            "Sub-scores: sleep {:.0}, water {:.0}, protein {:.0}, calories {:.0}, BMI {:.0}",
            s.sub_scores.sleep, s.sub_scores.water, s.sub_scores.protein, s.sub_scores.calorie, s.sub_scores.bmi
        )?;
        writeln!(
            f,
            "Occupational risk: {:.1} ({})",
            s.occupational.score,
            s.occupational.band.description()
        )?;
        writeln!(f, "Burnout: {:.1} ({})", s.burnout.score, s.burnout.band.description())?;
        writeln!(f, "Composite index: {} / 100", s.composite_index)?;
        writeln!(f)?;

        writeln!(f, "== Risk Assessment ==")?;
        match (&a.risk, &a.risk_error) {
            (Some(risk), _) => {
                writeln!(f, "Predicted risk level: {}", risk.level.description())?;
                writeln!(f, "{}", risk.message)?;
                let [low, moderate, high, critical] = risk.probabilities;
                writeln!(
                    f,
                    "Confidence: low {:.0}%, moderate {:.0}%, high {:.0}%, critical {:.0}%",
                    low * 100.0,
                    moderate * 100.0,
                    high * 100.0,
                    critical * 100.0
                )?;
            }
            (None, Some(reason)) => writeln!(f, "Not available: {}", reason)?,
            (None, None) => writeln!(f, "Not available")?,
        }
        writeln!(f)?;

        if !s.occupational.strain_factors.is_empty() {
            writeln!(f, "== Detected Strain Factors ==")?;
            for factor in &s.occupational.strain_factors {
                writeln!(f, "- {}", factor.description())?;
            }
            writeln!(f)?;
        }

        if !p.pain_areas.is_empty() {
            let areas: Vec<&str> = p.pain_areas.iter().map(|a| a.label()).collect();
            writeln!(f, "Reported pain areas: {}", areas.join(", "))?;
            writeln!(f)?;
        }

        writeln!(f, "== Corrective & Preventive Actions ==")?;
        for action in corrective_actions(p) {
            writeln!(f, "- {}", action)?;
        }

        Ok(())
    }
}

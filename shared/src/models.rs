//! Data models for the LifeMode health engine

use crate::errors::{HealthError, HealthResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use validator::Validate;

// ============================================================================
// Categorical Inputs
// ============================================================================

/// A closed set of categorical values accepted from user input
///
/// Each variant has a machine key (`snake_case`, used in JSON) and the
/// human label shown on the form. Parsing accepts either, ignoring case.
pub trait Category: Copy + Sized + 'static {
    /// Input field this category is read from
    const FIELD: &'static str;

    /// Every variant, in canonical order
    fn all() -> &'static [Self];

    fn key(&self) -> &'static str;

    fn label(&self) -> &'static str;
}

/// Parse a category from its key or label, failing closed on anything else
pub fn parse_category<T: Category>(value: &str) -> HealthResult<T> {
    let needle = value.trim();
    T::all()
        .iter()
        .copied()
        .find(|c| c.key().eq_ignore_ascii_case(needle) || c.label().eq_ignore_ascii_case(needle))
        .ok_or_else(|| HealthError::unrecognized(T::FIELD, value))
}

/// Working lifestyle archetype
///
/// The order of [`Lifestyle::ALL`] is the `lifestyle_index` feature the risk
/// classifier was trained on. It must never be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifestyle {
    DeskOffice,
    StudentPartTime,
    GamerStreamer,
    RestaurantRetail,
    PhysicallyActive,
}

impl Lifestyle {
    pub const ALL: [Lifestyle; 5] = [
        Lifestyle::DeskOffice,
        Lifestyle::StudentPartTime,
        Lifestyle::GamerStreamer,
        Lifestyle::RestaurantRetail,
        Lifestyle::PhysicallyActive,
    ];

    /// Position in the trained category list
    pub fn index(&self) -> usize {
        match self {
            Lifestyle::DeskOffice => 0,
            Lifestyle::StudentPartTime => 1,
            Lifestyle::GamerStreamer => 2,
            Lifestyle::RestaurantRetail => 3,
            Lifestyle::PhysicallyActive => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Desk-bound archetypes that accumulate sedentary strain
    pub fn is_sedentary(&self) -> bool {
        matches!(self, Lifestyle::DeskOffice | Lifestyle::GamerStreamer)
    }
}

impl Category for Lifestyle {
    const FIELD: &'static str = "lifestyle";

    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn key(&self) -> &'static str {
        match self {
            Lifestyle::DeskOffice => "desk_office",
            Lifestyle::StudentPartTime => "student_part_time",
            Lifestyle::GamerStreamer => "gamer_streamer",
            Lifestyle::RestaurantRetail => "restaurant_retail",
            Lifestyle::PhysicallyActive => "physically_active",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Lifestyle::DeskOffice => "Desk / Office Worker",
            Lifestyle::StudentPartTime => "Student / Part-time Worker",
            Lifestyle::GamerStreamer => "Gamer / Streamer",
            Lifestyle::RestaurantRetail => "Restaurant / Retail Worker",
            Lifestyle::PhysicallyActive => "Physically Active Worker",
        }
    }
}

/// Main posture held during work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkPosture {
    MostlySitting,
    MostlyStanding,
    Mixed,
    PhysicalMoving,
}

impl Category for WorkPosture {
    const FIELD: &'static str = "work_posture";

    fn all() -> &'static [Self] {
        &[
            WorkPosture::MostlySitting,
            WorkPosture::MostlyStanding,
            WorkPosture::Mixed,
            WorkPosture::PhysicalMoving,
        ]
    }

    fn key(&self) -> &'static str {
        match self {
            WorkPosture::MostlySitting => "mostly_sitting",
            WorkPosture::MostlyStanding => "mostly_standing",
            WorkPosture::Mixed => "mixed",
            WorkPosture::PhysicalMoving => "physical_moving",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            WorkPosture::MostlySitting => "Mostly sitting",
            WorkPosture::MostlyStanding => "Mostly standing",
            WorkPosture::Mixed => "Mixed (sit + stand)",
            WorkPosture::PhysicalMoving => "Physical / moving a lot",
        }
    }
}

/// Self-reported mood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Good,
    Neutral,
    Low,
}

impl Category for Mood {
    const FIELD: &'static str = "mood";

    fn all() -> &'static [Self] {
        &[Mood::Good, Mood::Neutral, Mood::Low]
    }

    fn key(&self) -> &'static str {
        match self {
            Mood::Good => "good",
            Mood::Neutral => "neutral",
            Mood::Low => "low",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Mood::Good => "Good",
            Mood::Neutral => "Neutral",
            Mood::Low => "Low",
        }
    }
}

/// Body region with reported pain or discomfort
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PainArea {
    Neck,
    Shoulders,
    UpperBack,
    LowerBack,
    WristHand,
    Hips,
    Knees,
    Feet,
    Eyestrain,
    Headache,
}

impl Category for PainArea {
    const FIELD: &'static str = "pain_areas";

    fn all() -> &'static [Self] {
        &[
            PainArea::Neck,
            PainArea::Shoulders,
            PainArea::UpperBack,
            PainArea::LowerBack,
            PainArea::WristHand,
            PainArea::Hips,
            PainArea::Knees,
            PainArea::Feet,
            PainArea::Eyestrain,
            PainArea::Headache,
        ]
    }

    fn key(&self) -> &'static str {
        match self {
            PainArea::Neck => "neck",
            PainArea::Shoulders => "shoulders",
            PainArea::UpperBack => "upper_back",
            PainArea::LowerBack => "lower_back",
            PainArea::WristHand => "wrist_hand",
            PainArea::Hips => "hips",
            PainArea::Knees => "knees",
            PainArea::Feet => "feet",
            PainArea::Eyestrain => "eyestrain",
            PainArea::Headache => "headache",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            PainArea::Neck => "Neck",
            PainArea::Shoulders => "Shoulders",
            PainArea::UpperBack => "Upper back",
            PainArea::LowerBack => "Lower back",
            PainArea::WristHand => "Wrist/Hand",
            PainArea::Hips => "Hips",
            PainArea::Knees => "Knees",
            PainArea::Feet => "Feet",
            PainArea::Eyestrain => "Eyestrain",
            PainArea::Headache => "Headache",
        }
    }
}

/// Biological sex (informational only, never used in calculations)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiologicalSex {
    PreferNotToSay,
    Male,
    Female,
}

impl Category for BiologicalSex {
    const FIELD: &'static str = "biological_sex";

    fn all() -> &'static [Self] {
        &[
            BiologicalSex::PreferNotToSay,
            BiologicalSex::Male,
            BiologicalSex::Female,
        ]
    }

    fn key(&self) -> &'static str {
        match self {
            BiologicalSex::PreferNotToSay => "prefer_not_to_say",
            BiologicalSex::Male => "male",
            BiologicalSex::Female => "female",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            BiologicalSex::PreferNotToSay => "Prefer not to say",
            BiologicalSex::Male => "Male",
            BiologicalSex::Female => "Female",
        }
    }
}

impl FromStr for Lifestyle {
    type Err = HealthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_category(s)
    }
}

impl FromStr for WorkPosture {
    type Err = HealthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_category(s)
    }
}

impl FromStr for Mood {
    type Err = HealthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_category(s)
    }
}

impl FromStr for PainArea {
    type Err = HealthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_category(s)
    }
}

impl FromStr for BiologicalSex {
    type Err = HealthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_category(s)
    }
}

// ============================================================================
// Input Records
// ============================================================================

/// Anthropometric, occupational and psychological inputs for one analysis
///
/// Range limits are declared here and checked by
/// [`crate::validation::validate_profile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct UserProfile {
    #[validate(range(min = 100.0, max = 250.0, message = "must be between 100 and 250 cm"))]
    pub height_cm: f64,
    #[validate(range(min = 30.0, max = 200.0, message = "must be between 30 and 200 kg"))]
    pub weight_kg: f64,
    #[validate(range(min = 1, max = 120, message = "must be between 1 and 120 years"))]
    pub age_years: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biological_sex: Option<BiologicalSex>,
    pub lifestyle: Lifestyle,
    pub work_posture: WorkPosture,
    #[validate(range(min = 0.0, max = 16.0, message = "must be between 0 and 16 hours"))]
    pub work_hours_per_day: f64,
    #[validate(range(min = 0.0, max = 16.0, message = "must be between 0 and 16 hours"))]
    pub screen_time_hours: f64,
    #[serde(default)]
    pub pain_areas: BTreeSet<PainArea>,
    #[validate(range(min = 0.0, max = 10.0, message = "must be between 0 and 10"))]
    pub mental_fatigue: f64,
    #[validate(range(min = 0.0, max = 10.0, message = "must be between 0 and 10"))]
    pub motivation: f64,
    pub mood: Mood,
    #[validate(range(min = 0.0, max = 10.0, message = "must be between 0 and 10"))]
    pub breaks_per_day: f64,
}

/// Daily intake values for one analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct IntakeRecord {
    #[validate(range(min = 0.0, max = 24.0, message = "must be between 0 and 24 hours"))]
    pub sleep_hours: f64,
    #[validate(range(min = 0.0, max = 10.0, message = "must be between 0 and 10 liters"))]
    pub water_liters: f64,
    #[validate(range(min = 0.0, max = 300.0, message = "must be between 0 and 300 g"))]
    pub protein_grams: f64,
    #[validate(range(min = 0.0, max = 5000.0, message = "must be between 0 and 5000 kcal"))]
    pub calories_kcal: f64,
}

// ============================================================================
// Daily Log
// ============================================================================

/// Column order of the daily log file
pub const DAILY_LOG_HEADER: [&str; 9] = [
    "date",
    "sleep",
    "water",
    "protein",
    "calories",
    "health_score",
    "occupational_risk",
    "screen_time",
    "work_hours",
];

/// One snapshot row of the daily log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLogEntry {
    pub date: NaiveDate,
    pub sleep: f64,
    pub water: f64,
    pub protein: f64,
    pub calories: f64,
    pub health_score: u32,
    pub occupational_risk: f64,
    pub screen_time: f64,
    pub work_hours: f64,
}

//! Reference tables for the derivation and scoring engines
//!
//! All lookup constants sit in one immutable, versioned value so that a
//! table change is visible in every analysis it produced.

use crate::errors::{HealthError, HealthResult};
use crate::health_metrics::AgeGroup;
use crate::models::{Category, Lifestyle};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Version tag of the canonical tables
pub const TABLES_VERSION: &str = "2026.1";

/// One row of the age → ideal sleep table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepBand {
    /// Inclusive upper age bound; `None` for the open-ended last band
    pub max_age: Option<u32>,
    pub group: AgeGroup,
    pub ideal_hours: f64,
}

/// Upper bounds (inclusive) of the Low, Moderate and High occupational bands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OccupationalBands {
    pub low_max: f64,
    pub moderate_max: f64,
    pub high_max: f64,
}

/// Exclusive upper bounds of the Low and Moderate burnout bands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurnoutBands {
    pub low_below: f64,
    pub moderate_below: f64,
}

/// Weights of the composite index blend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositeWeights {
    pub health: f64,
    pub burnout: f64,
    pub occupational: f64,
    /// Occupational points are multiplied by this before being subtracted from 100
    pub occupational_scale: f64,
}

/// Immutable lookup tables consumed by [`crate::engine::HealthEngine`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTables {
    pub version: String,
    pub lifestyle_factors: BTreeMap<Lifestyle, f64>,
    /// Ordered by ascending `max_age`
    pub sleep_bands: Vec<SleepBand>,
    pub occupational_bands: OccupationalBands,
    pub burnout_bands: BurnoutBands,
    pub composite_weights: CompositeWeights,
}

impl Default for ReferenceTables {
    fn default() -> Self {
        let lifestyle_factors = BTreeMap::from([
            (Lifestyle::DeskOffice, 1.20),
            (Lifestyle::StudentPartTime, 1.35),
            (Lifestyle::GamerStreamer, 1.25),
            (Lifestyle::RestaurantRetail, 1.55),
            (Lifestyle::PhysicallyActive, 1.75),
        ]);

        // The Adult and Older Adult bands share 7.5h on purpose.
        let sleep_bands = vec![
            SleepBand { max_age: Some(17), group: AgeGroup::Adolescent, ideal_hours: 8.5 },
            SleepBand { max_age: Some(30), group: AgeGroup::YoungAdult, ideal_hours: 8.0 },
            SleepBand { max_age: Some(50), group: AgeGroup::Adult, ideal_hours: 7.5 },
            SleepBand { max_age: None, group: AgeGroup::OlderAdult, ideal_hours: 7.5 },
        ];

        Self {
            version: TABLES_VERSION.to_string(),
            lifestyle_factors,
            sleep_bands,
            occupational_bands: OccupationalBands {
                low_max: 5.0,
                moderate_max: 10.0,
                high_max: 15.0,
            },
            burnout_bands: BurnoutBands {
                low_below: 30.0,
                moderate_below: 60.0,
            },
            composite_weights: CompositeWeights {
                health: 0.45,
                burnout: 0.30,
                occupational: 0.25,
                occupational_scale: 6.0,
            },
        }
    }
}

impl ReferenceTables {
    /// Activity factor for a lifestyle
    ///
    /// A lifestyle missing from the table is an error, never a default.
    pub fn lifestyle_factor(&self, lifestyle: Lifestyle) -> HealthResult<f64> {
        self.lifestyle_factors
            .get(&lifestyle)
            .copied()
            .ok_or_else(|| HealthError::unrecognized("lifestyle", lifestyle.label()))
    }

    /// Age group and ideal sleep hours for an age
    pub fn sleep_band(&self, age_years: u32) -> HealthResult<&SleepBand> {
        self.sleep_bands
            .iter()
            .find(|band| band.max_age.map_or(true, |max| age_years <= max))
            .ok_or_else(|| {
                HealthError::validation("age_years", "no sleep band covers this age")
            })
    }

    /// Check internal consistency of a table set
    pub fn check(&self) -> HealthResult<()> {
        for lifestyle in Lifestyle::ALL {
            let factor = self.lifestyle_factor(lifestyle)?;
            if !(factor.is_finite() && factor > 0.0) {
                return Err(HealthError::validation(
                    "lifestyle_factors",
                    format!("factor for {} must be positive", lifestyle.label()),
                ));
            }
        }

        let ascending = self.sleep_bands.windows(2).all(|pair| match (pair[0].max_age, pair[1].max_age) {
            (Some(a), Some(b)) => a < b,
            (Some(_), None) => true,
            (None, _) => false,
        });
        let open_ended = self.sleep_bands.last().map_or(false, |band| band.max_age.is_none());
        if !ascending || !open_ended {
            return Err(HealthError::validation(
                "sleep_bands",
                "bands must ascend by age and end with an open band",
            ));
        }

        let occ = &self.occupational_bands;
        if !(occ.low_max < occ.moderate_max && occ.moderate_max < occ.high_max) {
            return Err(HealthError::validation(
                "occupational_bands",
                "thresholds must be strictly increasing",
            ));
        }

        if self.burnout_bands.low_below >= self.burnout_bands.moderate_below {
            return Err(HealthError::validation(
                "burnout_bands",
                "thresholds must be strictly increasing",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_are_consistent() {
        let tables = ReferenceTables::default();
        assert!(tables.check().is_ok());
        assert_eq!(tables.version, TABLES_VERSION);
    }

    #[test]
    fn test_lifestyle_factors() {
        let tables = ReferenceTables::default();
        assert_eq!(tables.lifestyle_factor(Lifestyle::DeskOffice).unwrap(), 1.20);
        assert_eq!(tables.lifestyle_factor(Lifestyle::StudentPartTime).unwrap(), 1.35);
        assert_eq!(tables.lifestyle_factor(Lifestyle::GamerStreamer).unwrap(), 1.25);
        assert_eq!(tables.lifestyle_factor(Lifestyle::RestaurantRetail).unwrap(), 1.55);
        assert_eq!(tables.lifestyle_factor(Lifestyle::PhysicallyActive).unwrap(), 1.75);
    }

    #[test]
    fn test_missing_lifestyle_fails_closed() {
        let mut tables = ReferenceTables::default();
        tables.lifestyle_factors.remove(&Lifestyle::GamerStreamer);
        let err = tables.lifestyle_factor(Lifestyle::GamerStreamer).unwrap_err();
        assert_eq!(err, HealthError::unrecognized("lifestyle", "Gamer / Streamer"));
        assert!(tables.check().is_err());
    }

    #[test]
    fn test_sleep_bands() {
        let tables = ReferenceTables::default();
        assert_eq!(tables.sleep_band(17).unwrap().ideal_hours, 8.5);
        assert_eq!(tables.sleep_band(18).unwrap().ideal_hours, 8.0);
        assert_eq!(tables.sleep_band(30).unwrap().ideal_hours, 8.0);
        assert_eq!(tables.sleep_band(31).unwrap().group, AgeGroup::Adult);
        assert_eq!(tables.sleep_band(50).unwrap().ideal_hours, 7.5);
        assert_eq!(tables.sleep_band(51).unwrap().group, AgeGroup::OlderAdult);
        assert_eq!(tables.sleep_band(120).unwrap().ideal_hours, 7.5);
    }

    #[test]
    fn test_check_rejects_unordered_bands() {
        let mut tables = ReferenceTables::default();
        tables.sleep_bands.swap(0, 1);
        assert!(tables.check().is_err());

        let mut tables = ReferenceTables::default();
        tables.occupational_bands.moderate_max = 4.0;
        assert!(tables.check().is_err());

        let mut tables = ReferenceTables::default();
        tables.burnout_bands.low_below = 60.0;
        assert!(tables.check().is_err());
    }
}

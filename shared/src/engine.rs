//! Analysis pipeline
//!
//! Runs one analysis end to end: validate → derive → score → classify.
//! Every step is a pure function of its input snapshot.

use crate::errors::{HealthError, HealthResult};
use crate::health_metrics::{derive_targets, DerivedTargets};
use crate::models::{IntakeRecord, UserProfile};
use crate::risk::{FeatureVector, RiskModel, RiskPrediction};
use crate::scoring::{score, ScoreBundle};
use crate::tables::ReferenceTables;
use crate::validation::{validate_intake, validate_profile};
use serde::{Deserialize, Serialize};

/// What to do when the risk classifier cannot produce a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskPolicy {
    /// Return the analysis without a risk prediction
    #[default]
    Optional,
    /// Fail the whole analysis
    Required,
}

/// Complete result of one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub profile: UserProfile,
    pub intake: IntakeRecord,
    pub targets: DerivedTargets,
    pub scores: ScoreBundle,
    pub risk: Option<RiskPrediction>,
    /// Why `risk` is absent, when it is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_error: Option<String>,
    pub tables_version: String,
}

/// Derivation and scoring engine bound to one set of reference tables
#[derive(Debug, Clone)]
pub struct HealthEngine {
    tables: ReferenceTables,
}

impl Default for HealthEngine {
    fn default() -> Self {
        Self {
            tables: ReferenceTables::default(),
        }
    }
}

impl HealthEngine {
    /// Create an engine, rejecting inconsistent tables
    pub fn new(tables: ReferenceTables) -> HealthResult<Self> {
        tables.check()?;
        Ok(Self { tables })
    }

    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    /// Derive biological targets for a profile
    pub fn derive(&self, profile: &UserProfile) -> HealthResult<DerivedTargets> {
        derive_targets(profile, &self.tables)
    }

    /// Score intake and profile against derived targets
    pub fn score(
        &self,
        profile: &UserProfile,
        intake: &IntakeRecord,
        targets: &DerivedTargets,
    ) -> HealthResult<ScoreBundle> {
        score(profile, intake, targets, &self.tables)
    }

    /// Run a full analysis
    ///
    /// With [`RiskPolicy::Optional`], a missing model or a model failure
    /// leaves `risk` empty and records the reason in `risk_error`.
    pub fn analyze(
        &self,
        profile: UserProfile,
        intake: IntakeRecord,
        model: Option<&dyn RiskModel>,
        policy: RiskPolicy,
    ) -> HealthResult<Analysis> {
        validate_profile(&profile)?;
        validate_intake(&intake)?;

        let targets = self.derive(&profile)?;
        let scores = self.score(&profile, &intake, &targets)?;

        let outcome = match model {
            Some(model) => model.predict(&FeatureVector::from_inputs(&profile, &intake, &targets)),
            None => Err(HealthError::ModelUnavailable(
                "no risk model is loaded".to_string(),
            )),
        };

        let (risk, risk_error) = match (outcome, policy) {
            (Ok(prediction), _) => (Some(prediction), None),
            (Err(e), RiskPolicy::Required) => return Err(e),
            (Err(e), RiskPolicy::Optional) => (None, Some(e.to_string())),
        };

        Ok(Analysis {
            profile,
            intake,
            targets,
            scores,
            risk,
            risk_error,
            tables_version: self.tables.version.clone(),
        })
    }
}

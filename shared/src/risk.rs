//! Risk classifier adapter
//!
//! Feeds the fixed 7-feature vector to a trained model and maps its output
//! to one of four risk levels. The model sits behind [`RiskModel`], so any
//! classifier trained on the same schema can be substituted.
//!
//! The bundled [`SoftmaxRiskModel`] reads a JSON artifact that records the
//! feature order and lifestyle category list it was trained with. Loading
//! refuses an artifact whose schema differs from the compiled one.

use crate::errors::{HealthError, HealthResult};
use crate::health_metrics::DerivedTargets;
use crate::models::{Category, IntakeRecord, Lifestyle, UserProfile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Feature order the classifier is trained on
pub const FEATURE_NAMES: [&str; 7] = [
    "age", "bmi", "sleep", "water", "protein", "calories", "lifestyle",
];

/// Number of risk classes
pub const RISK_CLASS_COUNT: usize = 4;

/// Artifact schema version understood by this build
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Model type tag written by the training tool
pub const SOFTMAX_MODEL_TYPE: &str = "softmax_regression";

/// Allowed drift of a probability vector's sum from 1
const PROBABILITY_SUM_TOLERANCE: f64 = 1e-6;

// ============================================================================
// Risk Levels
// ============================================================================

/// Four-level lifestyle risk label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; RISK_CLASS_COUNT] = [
        RiskLevel::Low,
        RiskLevel::Moderate,
        RiskLevel::High,
        RiskLevel::Critical,
    ];

    pub fn from_class_id(class_id: usize) -> Option<Self> {
        Self::ALL.get(class_id).copied()
    }

    pub fn class_id(&self) -> usize {
        match self {
            RiskLevel::Low => 0,
            RiskLevel::Moderate => 1,
            RiskLevel::High => 2,
            RiskLevel::Critical => 3,
        }
    }

    /// Class name stored in model artifacts
    pub fn key(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Moderate => "Moderate Risk",
            RiskLevel::High => "High Risk",
            RiskLevel::Critical => "Critical Risk",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Your lifestyle shows good biological balance.",
            RiskLevel::Moderate => "Some health factors need improvement.",
            RiskLevel::High => "Your current lifestyle may lead to health problems.",
            RiskLevel::Critical => "Serious lifestyle health risks detected.",
        }
    }
}

// ============================================================================
// Features and Predictions
// ============================================================================

/// The 7 classifier inputs in training order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub values: [f64; 7],
}

impl FeatureVector {
    pub fn new(
        age: f64,
        bmi: f64,
        sleep: f64,
        water: f64,
        protein: f64,
        calories: f64,
        lifestyle: Lifestyle,
    ) -> Self {
        Self {
            values: [age, bmi, sleep, water, protein, calories, lifestyle.index() as f64],
        }
    }

    /// Build the feature vector for one analysis
    pub fn from_inputs(profile: &UserProfile, intake: &IntakeRecord, targets: &DerivedTargets) -> Self {
        Self::new(
            f64::from(profile.age_years),
            targets.bmi_value,
            intake.sleep_hours,
            intake.water_liters,
            intake.protein_grams,
            intake.calories_kcal,
            profile.lifestyle,
        )
    }
}

/// Classifier output: class, level and probability per class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPrediction {
    pub class_id: usize,
    pub level: RiskLevel,
    /// Indexed by class id; each in [0, 1], summing to 1
    pub probabilities: [f64; RISK_CLASS_COUNT],
    pub message: String,
}

impl RiskPrediction {
    /// Build a prediction from a probability distribution, taking the argmax
    pub fn from_probabilities(probabilities: [f64; RISK_CLASS_COUNT]) -> HealthResult<Self> {
        if probabilities
            .iter()
            .any(|p| !p.is_finite() || *p < 0.0 || *p > 1.0)
        {
            return Err(HealthError::ModelUnavailable(
                "model produced probabilities outside [0, 1]".to_string(),
            ));
        }
        let sum: f64 = probabilities.iter().sum();
        if (sum - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
            return Err(HealthError::ModelUnavailable(format!(
                "model probabilities sum to {sum}, expected 1"
            )));
        }

        let class_id = probabilities
            .iter()
            .enumerate()
            .fold(0, |best, (i, p)| if *p > probabilities[best] { i } else { best });
        let level = RiskLevel::from_class_id(class_id).unwrap_or(RiskLevel::Critical);

        Ok(Self {
            class_id,
            level,
            probabilities,
            message: level.message().to_string(),
        })
    }
}

/// A trained classifier over [`FEATURE_NAMES`]
pub trait RiskModel: Send + Sync {
    /// Predict class probabilities for one feature vector
    fn predict(&self, features: &FeatureVector) -> HealthResult<RiskPrediction>;

    /// Identifier shown in logs and reports
    fn name(&self) -> &str;
}

/// Classify from raw feature values
///
/// `lifestyle_index` must be a position in [`Lifestyle::ALL`].
#[allow(clippy::too_many_arguments)]
pub fn classify(
    model: &dyn RiskModel,
    age: f64,
    bmi: f64,
    sleep: f64,
    water: f64,
    protein: f64,
    calories: f64,
    lifestyle_index: usize,
) -> HealthResult<RiskPrediction> {
    let lifestyle = Lifestyle::from_index(lifestyle_index)
        .ok_or_else(|| HealthError::unrecognized("lifestyle", lifestyle_index.to_string()))?;
    model.predict(&FeatureVector::new(age, bmi, sleep, water, protein, calories, lifestyle))
}

// ============================================================================
// Model Artifact
// ============================================================================

/// Serialized softmax regression model with its training schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub model_type: String,
    pub feature_names: Vec<String>,
    pub lifestyle_categories: Vec<String>,
    pub classes: Vec<String>,
    /// Per-feature standardization
    pub means: Vec<f64>,
    pub scales: Vec<f64>,
    /// One row of feature weights per class
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trained_at: Option<String>,
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
}

impl ModelArtifact {
    /// Feature names in the compiled order
    pub fn expected_feature_names() -> Vec<String> {
        FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
    }

    /// Lifestyle labels in the compiled index order
    pub fn expected_lifestyle_categories() -> Vec<String> {
        Lifestyle::ALL.iter().map(|l| l.label().to_string()).collect()
    }

    pub fn expected_classes() -> Vec<String> {
        RiskLevel::ALL.iter().map(|l| l.key().to_string()).collect()
    }

    /// Reject an artifact whose schema differs from this build
    pub fn check_schema(&self) -> HealthResult<()> {
        let unavailable = |reason: String| Err(HealthError::ModelUnavailable(reason));

        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return unavailable(format!(
                "artifact format {} is not supported (expected {})",
                self.format_version, ARTIFACT_FORMAT_VERSION
            ));
        }
        if self.model_type != SOFTMAX_MODEL_TYPE {
            return unavailable(format!("unsupported model type '{}'", self.model_type));
        }
        if self.feature_names != Self::expected_feature_names() {
            return unavailable(format!(
                "feature order {:?} does not match {:?}",
                self.feature_names, FEATURE_NAMES
            ));
        }
        if self.lifestyle_categories != Self::expected_lifestyle_categories() {
            return unavailable(
                "lifestyle category list differs from the one the model was trained with"
                    .to_string(),
            );
        }
        if self.classes != Self::expected_classes() {
            return unavailable(format!("class list {:?} is not the 4 risk levels", self.classes));
        }

        let n = FEATURE_NAMES.len();
        let dims_ok = self.means.len() == n
            && self.scales.len() == n
            && self.weights.len() == RISK_CLASS_COUNT
            && self.weights.iter().all(|row| row.len() == n)
            && self.biases.len() == RISK_CLASS_COUNT;
        if !dims_ok {
            return unavailable("artifact parameter dimensions do not match the schema".to_string());
        }

        let finite = self
            .means
            .iter()
            .chain(&self.biases)
            .chain(self.weights.iter().flatten())
            .all(|v| v.is_finite());
        let scales_ok = self.scales.iter().all(|s| s.is_finite() && *s > 0.0);
        if !finite || !scales_ok {
            return unavailable("artifact contains non-finite parameters".to_string());
        }

        Ok(())
    }

    /// Read and schema-check an artifact from disk
    pub fn load(path: &Path) -> HealthResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            HealthError::ModelUnavailable(format!("cannot read {}: {}", path.display(), e))
        })?;
        let artifact: ModelArtifact = serde_json::from_str(&contents).map_err(|e| {
            HealthError::ModelUnavailable(format!("cannot parse {}: {}", path.display(), e))
        })?;
        artifact.check_schema()?;
        Ok(artifact)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// ============================================================================
// Softmax Regression Model
// ============================================================================

/// Multinomial logistic regression over standardized features
#[derive(Debug, Clone)]
pub struct SoftmaxRiskModel {
    name: String,
    artifact: ModelArtifact,
}

impl SoftmaxRiskModel {
    pub fn from_artifact(name: impl Into<String>, artifact: ModelArtifact) -> HealthResult<Self> {
        artifact.check_schema()?;
        Ok(Self {
            name: name.into(),
            artifact,
        })
    }

    /// Load a model artifact from a JSON file
    pub fn load(path: &Path) -> HealthResult<Self> {
        let artifact = ModelArtifact::load(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| SOFTMAX_MODEL_TYPE.to_string());
        Ok(Self { name, artifact })
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Class logits for one feature vector
    fn logits(&self, features: &FeatureVector) -> [f64; RISK_CLASS_COUNT] {
        let a = &self.artifact;
        let standardized: Vec<f64> = features
            .values
            .iter()
            .zip(a.means.iter().zip(&a.scales))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect();

        let mut logits = [0.0; RISK_CLASS_COUNT];
        for (k, logit) in logits.iter_mut().enumerate() {
            *logit = a.biases[k]
                + a.weights[k]
                    .iter()
                    .zip(&standardized)
                    .map(|(w, z)| w * z)
                    .sum::<f64>();
        }
        logits
    }
}

/// Numerically stable softmax
pub fn softmax(logits: &[f64; RISK_CLASS_COUNT]) -> [f64; RISK_CLASS_COUNT] {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut out = [0.0; RISK_CLASS_COUNT];
    let mut total = 0.0;
    for (o, l) in out.iter_mut().zip(logits) {
        *o = (l - max).exp();
        total += *o;
    }
    for o in out.iter_mut() {
        *o /= total;
    }
    out
}

impl RiskModel for SoftmaxRiskModel {
    fn predict(&self, features: &FeatureVector) -> HealthResult<RiskPrediction> {
        if features.values.iter().any(|v| !v.is_finite()) {
            return Err(HealthError::validation("features", "must be finite numbers"));
        }
        RiskPrediction::from_probabilities(softmax(&self.logits(features)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

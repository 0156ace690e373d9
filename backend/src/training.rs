//! Risk classifier training
//!
//! Synthesizes a labelled dataset from the clinical rule of thumb, fits a
//! softmax regression by full-batch gradient descent and produces the
//! artifact the service loads at startup.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use lifemode_shared::risk::{
    softmax, FeatureVector, ModelArtifact, ARTIFACT_FORMAT_VERSION, FEATURE_NAMES,
    RISK_CLASS_COUNT, SOFTMAX_MODEL_TYPE,
};
use lifemode_shared::{Lifestyle, RiskModel, SoftmaxRiskModel};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

const FEATURES: usize = FEATURE_NAMES.len();

/// Training run parameters
#[derive(Debug, Clone)]
pub struct TrainingOptions {
    pub samples: usize,
    pub seed: u64,
    pub epochs: usize,
    pub learning_rate: f64,
    /// Share of samples held out for the test split
    pub test_fraction: f64,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            samples: 1200,
            seed: 42,
            epochs: 1500,
            learning_rate: 0.5,
            test_fraction: 0.2,
        }
    }
}

/// One labelled training row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub features: [f64; FEATURES],
    pub label: usize,
}

/// Trained artifact plus its split accuracies
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub artifact: ModelArtifact,
    pub train_accuracy: f64,
    pub test_accuracy: f64,
}

// ============================================================================
// Synthetic Dataset
// ============================================================================

/// Number of risk conditions met by a feature row
pub fn rule_score(features: &[f64; FEATURES]) -> u32 {
    let [_age, bmi, sleep, water, protein, calories, _lifestyle] = *features;
    [
        sleep < 6.0,
        water < 2.0,
        protein < 50.0,
        !(1500.0..=3200.0).contains(&calories),
        !(18.5..=30.0).contains(&bmi),
    ]
    .iter()
    .filter(|hit| **hit)
    .count() as u32
}

/// Map a rule score onto the four risk classes
pub fn label_for(score: u32) -> usize {
    match score {
        0 | 1 => 0,
        2 => 1,
        3 => 2,
        _ => 3,
    }
}

/// Generate `count` labelled rows from a seeded generator
pub fn synthesize(count: usize, rng: &mut impl Rng) -> Vec<Sample> {
    (0..count)
        .map(|_| {
            let features = [
                f64::from(rng.gen_range(16u32..65)),
                rng.gen_range(16.0..35.0),
                rng.gen_range(3.0..9.0),
                rng.gen_range(0.5..4.5),
                rng.gen_range(20.0..160.0),
                rng.gen_range(900.0..3800.0),
                rng.gen_range(0..Lifestyle::ALL.len()) as f64,
            ];
            Sample {
                features,
                label: label_for(rule_score(&features)),
            }
        })
        .collect()
}

// ============================================================================
// Softmax Regression
// ============================================================================

/// Per-feature mean and standard deviation
fn fit_standardizer(samples: &[Sample]) -> (Vec<f64>, Vec<f64>) {
    let n = samples.len() as f64;
    let mut means = vec![0.0; FEATURES];
    for s in samples {
        for (m, x) in means.iter_mut().zip(&s.features) {
            *m += x / n;
        }
    }

    let mut scales = vec![0.0; FEATURES];
    for s in samples {
        for ((v, x), m) in scales.iter_mut().zip(&s.features).zip(&means) {
            *v += (x - m).powi(2) / n;
        }
    }
    for v in scales.iter_mut() {
        *v = v.sqrt();
        // constant column
        if !v.is_finite() || *v < 1e-12 {
            *v = 1.0;
        }
    }
    (means, scales)
}

fn gradient_descent(
    samples: &[Sample],
    means: &[f64],
    scales: &[f64],
    options: &TrainingOptions,
) -> (Vec<Vec<f64>>, Vec<f64>) {
    let standardized: Vec<[f64; FEATURES]> = samples
        .iter()
        .map(|s| {
            let mut z = [0.0; FEATURES];
            for (j, zj) in z.iter_mut().enumerate() {
                *zj = (s.features[j] - means[j]) / scales[j];
            }
            z
        })
        .collect();

    let n = samples.len() as f64;
    let mut weights = vec![vec![0.0; FEATURES]; RISK_CLASS_COUNT];
    let mut biases = vec![0.0; RISK_CLASS_COUNT];

    for epoch in 0..options.epochs {
        let mut grad_w = vec![vec![0.0; FEATURES]; RISK_CLASS_COUNT];
        let mut grad_b = vec![0.0; RISK_CLASS_COUNT];
        let mut loss = 0.0;

        for (z, sample) in standardized.iter().zip(samples) {
            let mut logits = [0.0; RISK_CLASS_COUNT];
            for (k, logit) in logits.iter_mut().enumerate() {
                *logit = biases[k] + weights[k].iter().zip(z).map(|(w, x)| w * x).sum::<f64>();
            }
            let probs = softmax(&logits);
            loss -= probs[sample.label].max(1e-12).ln();

            for k in 0..RISK_CLASS_COUNT {
                let err = probs[k] - if k == sample.label { 1.0 } else { 0.0 };
                grad_b[k] += err;
                for (g, x) in grad_w[k].iter_mut().zip(z) {
                    *g += err * x;
                }
            }
        }

        for k in 0..RISK_CLASS_COUNT {
            biases[k] -= options.learning_rate * grad_b[k] / n;
            for (w, g) in weights[k].iter_mut().zip(&grad_w[k]) {
                *w -= options.learning_rate * g / n;
            }
        }

        if epoch % 250 == 0 {
            debug!(epoch, loss = loss / n, "Training progress");
        }
    }

    (weights, biases)
}

/// Share of samples whose predicted class matches the label
pub fn accuracy(model: &dyn RiskModel, samples: &[Sample]) -> Result<f64> {
    if samples.is_empty() {
        return Ok(0.0);
    }
    let mut correct = 0usize;
    for s in samples {
        let prediction = model.predict(&FeatureVector { values: s.features })?;
        if prediction.class_id == s.label {
            correct += 1;
        }
    }
    Ok(correct as f64 / samples.len() as f64)
}

/// Synthesize, split, fit and evaluate one model
pub fn train(options: &TrainingOptions) -> Result<TrainingOutcome> {
    if options.samples < 10 {
        bail!("need at least 10 samples, got {}", options.samples);
    }
    if !(0.0..1.0).contains(&options.test_fraction) {
        bail!("test fraction must be in [0, 1), got {}", options.test_fraction);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(options.seed);
    let mut samples = synthesize(options.samples, &mut rng);
    samples.shuffle(&mut rng);

    let test_len = (options.samples as f64 * options.test_fraction).round() as usize;
    let (test, train) = samples.split_at(test_len);
    info!(train = train.len(), test = test.len(), seed = options.seed, "Dataset synthesized");

    let (means, scales) = fit_standardizer(train);
    let (weights, biases) = gradient_descent(train, &means, &scales, options);

    let mut artifact = ModelArtifact {
        format_version: ARTIFACT_FORMAT_VERSION,
        model_type: SOFTMAX_MODEL_TYPE.to_string(),
        feature_names: ModelArtifact::expected_feature_names(),
        lifestyle_categories: ModelArtifact::expected_lifestyle_categories(),
        classes: ModelArtifact::expected_classes(),
        means,
        scales,
        weights,
        biases,
        trained_at: Some(Utc::now().to_rfc3339()),
        metrics: BTreeMap::new(),
    };

    let model = SoftmaxRiskModel::from_artifact(SOFTMAX_MODEL_TYPE, artifact.clone())?;
    let train_accuracy = accuracy(&model, train)?;
    let test_accuracy = accuracy(&model, test)?;
    info!(train_accuracy, test_accuracy, "Model trained");

    artifact.metrics.insert("train_accuracy".to_string(), train_accuracy);
    artifact.metrics.insert("test_accuracy".to_string(), test_accuracy);
    artifact.metrics.insert("samples".to_string(), options.samples as f64);

    Ok(TrainingOutcome {
        artifact,
        train_accuracy,
        test_accuracy,
    })
}

/// Write an artifact as pretty JSON, creating parent directories
pub fn save_artifact(artifact: &ModelArtifact, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }
    let json = artifact.to_json().context("cannot serialize model artifact")?;
    std::fs::write(path, json).with_context(|| format!("cannot write {}", path.display()))?;
    info!(path = %path.display(), "Model artifact written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn row(bmi: f64, sleep: f64, water: f64, protein: f64, calories: f64) -> [f64; FEATURES] {
        [30.0, bmi, sleep, water, protein, calories, 0.0]
    }

    #[rstest]
    #[case(row(22.0, 8.0, 3.0, 90.0, 2200.0), 0, 0)]
    #[case(row(22.0, 5.0, 3.0, 90.0, 2200.0), 1, 0)]
    #[case(row(22.0, 5.0, 1.0, 90.0, 2200.0), 2, 1)]
    #[case(row(32.0, 5.0, 1.0, 90.0, 2200.0), 3, 2)]
    #[case(row(32.0, 5.0, 1.0, 40.0, 3500.0), 5, 3)]
    #[case(row(18.5, 6.0, 2.0, 50.0, 1500.0), 0, 0)]
    fn test_rule_labels(#[case] features: [f64; FEATURES], #[case] score: u32, #[case] label: usize) {
        assert_eq!(rule_score(&features), score);
        assert_eq!(label_for(score), label);
    }

    #[test]
    fn test_synthesis_is_deterministic_and_in_range() {
        let a = synthesize(200, &mut ChaCha8Rng::seed_from_u64(42));
        let b = synthesize(200, &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);

        for s in &a {
            let [age, bmi, sleep, water, protein, calories, lifestyle] = s.features;
            assert!((16.0..65.0).contains(&age) && age.fract() == 0.0);
            assert!((16.0..35.0).contains(&bmi));
            assert!((3.0..9.0).contains(&sleep));
            assert!((0.5..4.5).contains(&water));
            assert!((20.0..160.0).contains(&protein));
            assert!((900.0..3800.0).contains(&calories));
            assert!((0.0..5.0).contains(&lifestyle) && lifestyle.fract() == 0.0);
            assert!(s.label < RISK_CLASS_COUNT);
        }
    }

    #[test]
    fn test_trained_model_ranks_profiles() {
        let outcome = train(&TrainingOptions::default()).unwrap();
        assert!(outcome.artifact.check_schema().is_ok());
        assert!(outcome.test_accuracy > 0.45, "accuracy {}", outcome.test_accuracy);

        let model = SoftmaxRiskModel::from_artifact("test", outcome.artifact).unwrap();
        let healthy = FeatureVector { values: row(22.0, 8.5, 4.0, 150.0, 2500.0) };
        let poor = FeatureVector { values: row(34.0, 3.5, 0.6, 25.0, 3700.0) };
        let healthy = model.predict(&healthy).unwrap();
        let poor = model.predict(&poor).unwrap();
        assert!(poor.class_id > healthy.class_id);
    }

    #[test]
    fn test_same_seed_same_artifact() {
        let options = TrainingOptions {
            samples: 200,
            epochs: 50,
            ..TrainingOptions::default()
        };
        let a = train(&options).unwrap();
        let b = train(&options).unwrap();
        assert_eq!(a.artifact.weights, b.artifact.weights);
        assert_eq!(a.test_accuracy, b.test_accuracy);
    }

    #[test]
    fn test_too_few_samples_rejected() {
        let options = TrainingOptions {
            samples: 3,
            ..TrainingOptions::default()
        };
        assert!(train(&options).is_err());
    }

    #[test]
    fn test_saved_artifact_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models").join("risk_model.json");
        let options = TrainingOptions {
            samples: 100,
            epochs: 20,
            ..TrainingOptions::default()
        };
        save_artifact(&train(&options).unwrap().artifact, &path).unwrap();

        let model = SoftmaxRiskModel::load(&path).unwrap();
        assert_eq!(model.name(), "risk_model");
    }
}

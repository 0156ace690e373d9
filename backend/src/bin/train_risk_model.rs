//! Risk model trainer for the LifeMode backend.
//!
//! Synthesizes a labelled dataset, fits the softmax risk classifier and
//! writes the artifact the service loads at startup.
//!
//! Usage:
//! ```bash
//! # Train with the defaults (1200 samples, seed 42)
//! cargo run --bin train-risk-model
//!
//! # Custom run
//! cargo run --bin train-risk-model -- --samples 5000 --seed 7 --out models/risk_model.json
//! ```

use anyhow::Result;
use clap::Parser;
use lifemode_backend::training::{save_artifact, train, TrainingOptions};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "train-risk-model",
    about = "LifeMode risk classifier trainer",
    long_about = "Train the softmax lifestyle risk classifier on synthetic data and write its JSON artifact"
)]
struct TrainArgs {
    /// Number of synthetic samples
    #[arg(long, default_value_t = 1200)]
    samples: usize,

    /// Seed for the data generator
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Gradient descent epochs
    #[arg(long, default_value_t = 1500)]
    epochs: usize,

    /// Artifact output path
    #[arg(long, default_value = "models/risk_model.json")]
    out: PathBuf,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = TrainArgs::parse();

    let level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("lifemode_backend={level},train_risk_model={level}").into()),
        )
        .init();

    let options = TrainingOptions {
        samples: args.samples,
        seed: args.seed,
        epochs: args.epochs,
        ..TrainingOptions::default()
    };

    let outcome = train(&options)?;
    save_artifact(&outcome.artifact, &args.out)?;

    info!(
        train_accuracy = outcome.train_accuracy,
        test_accuracy = outcome.test_accuracy,
        out = %args.out.display(),
        "Training complete"
    );
    Ok(())
}

//! LifeMode Shared Library
//!
//! Health derivation, scoring and risk classification used by the backend
//! service and the training tool. Everything here is synchronous and free
//! of I/O apart from loading a model artifact.

pub mod engine;
pub mod errors;
pub mod health_metrics;
pub mod models;
pub mod report;
pub mod risk;
pub mod scoring;
pub mod tables;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use engine::{Analysis, HealthEngine, RiskPolicy};
pub use errors::{HealthError, HealthResult};
pub use health_metrics::{BmiCategory, DerivedTargets};
pub use models::{
    BiologicalSex, Category, DailyLogEntry, IntakeRecord, Lifestyle, Mood, PainArea, UserProfile,
    WorkPosture,
};
pub use risk::{RiskLevel, RiskModel, RiskPrediction, SoftmaxRiskModel};
pub use scoring::ScoreBundle;
pub use tables::ReferenceTables;

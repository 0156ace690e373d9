//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction. Everything is
//! immutable after startup except the daily log file.

use crate::config::AppConfig;
use crate::repositories::DailyLogRepository;
use lifemode_shared::{HealthEngine, RiskModel, RiskPolicy, SoftmaxRiskModel};
use std::sync::Arc;
use tracing::{info, warn};

/// Shared application state
///
/// All fields are cheap to clone across async tasks.
#[derive(Clone)]
pub struct AppState {
    /// Derivation and scoring engine
    pub engine: Arc<HealthEngine>,
    /// Risk classifier, absent when the artifact failed to load
    pub risk_model: Option<Arc<dyn RiskModel>>,
    /// Why the classifier is absent
    pub model_error: Option<String>,
    pub daily_log: DailyLogRepository,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create the application state, loading the risk model artifact once
    ///
    /// A missing or incompatible artifact is logged and recorded; whether it
    /// fails analyses is decided per request by the configured policy.
    pub fn new(config: AppConfig) -> Self {
        let path = &config.risk_model.path;
        match SoftmaxRiskModel::load(path) {
            Ok(model) => {
                info!(path = %path.display(), model = model.name(), "Risk model loaded");
                Self::with_model(config, Some(Arc::new(model)))
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Risk model not loaded");
                let mut state = Self::with_model(config, None);
                state.model_error = Some(e.to_string());
                state
            }
        }
    }

    /// Create the application state around an already constructed model
    pub fn with_model(config: AppConfig, risk_model: Option<Arc<dyn RiskModel>>) -> Self {
        let daily_log = DailyLogRepository::new(config.storage.daily_log_path.clone());
        Self {
            engine: Arc::new(HealthEngine::default()),
            risk_model,
            model_error: None,
            daily_log,
            config: Arc::new(config),
        }
    }

    #[inline]
    pub fn engine(&self) -> &HealthEngine {
        &self.engine
    }

    #[inline]
    pub fn risk_model(&self) -> Option<&dyn RiskModel> {
        self.risk_model.as_deref()
    }

    #[inline]
    pub fn risk_policy(&self) -> RiskPolicy {
        self.config.risk_model.policy()
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

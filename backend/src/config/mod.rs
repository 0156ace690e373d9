//! Configuration management for the LifeMode backend
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: LM__)

use anyhow::Result;
use lifemode_shared::RiskPolicy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub risk_model: RiskModelConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Daily log storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub daily_log_path: PathBuf,
}

/// Risk classifier artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskModelConfig {
    pub path: PathBuf,
    /// Fail analyses when the model cannot produce a prediction
    #[serde(default)]
    pub required: bool,
}

impl RiskModelConfig {
    pub fn policy(&self) -> RiskPolicy {
        if self.required {
            RiskPolicy::Required
        } else {
            RiskPolicy::Optional
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            storage: StorageConfig {
                daily_log_path: PathBuf::from("data/daily_log.csv"),
            },
            risk_model: RiskModelConfig {
                path: PathBuf::from("models/risk_model.json"),
                required: false,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with LM__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Load from environment-specific config file
            .add_source(config::File::with_name(&config_file).required(false))
            // Override with environment variables (LM__ prefix)
            // e.g., LM__RISK_MODEL__REQUIRED=true sets risk_model.required
            .add_source(
                config::Environment::with_prefix("LM")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }
}

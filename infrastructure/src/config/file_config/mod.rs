//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod experiment;
mod logging;
mod server;
mod upstream;

pub use experiment::FileExperimentConfig;
pub use logging::FileLoggingConfig;
pub use server::FileServerConfig;
pub use upstream::FileUpstreamConfig;

use relay_application::{ExperimentParams, RelayParams};
use relay_domain::{ModelTierConfig, Pricing};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("{0} cannot be 0")]
    InvalidTimeout(&'static str),

    #[error("{0}: model name cannot be empty")]
    EmptyModelName(String),

    #[error("upstream.api_key_env cannot be empty")]
    EmptyApiKeyEnv,

    #[error("at least one [[tiers]] entry is required")]
    NoTiers,

    #[error("{0}")]
    InvalidTier(String),

    #[error("{0}")]
    InvalidBudget(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// HTTP listener
    pub server: FileServerConfig,
    /// Upstream API endpoint, model and temperatures
    pub upstream: FileUpstreamConfig,
    /// Per-million-token prices for the fan-out metrics
    pub pricing: Pricing,
    /// Fan-out tiers, in emission order
    pub tiers: Vec<ModelTierConfig>,
    pub experiment: FileExperimentConfig,
    pub logging: FileLoggingConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            server: FileServerConfig::default(),
            upstream: FileUpstreamConfig::default(),
            pricing: Pricing::default(),
            tiers: ModelTierConfig::default_tiers(),
            experiment: FileExperimentConfig::default(),
            logging: FileLoggingConfig::default(),
        }
    }
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if self.upstream.request_timeout_seconds == 0 {
            issues.push(ConfigValidationError::InvalidTimeout(
                "upstream.request_timeout_seconds",
            ));
        }
        if self.upstream.connect_timeout_seconds == 0 {
            issues.push(ConfigValidationError::InvalidTimeout(
                "upstream.connect_timeout_seconds",
            ));
        }
        if self.upstream.model.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyModelName(
                "upstream.model".to_string(),
            ));
        }
        if self.upstream.api_key_env.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyApiKeyEnv);
        }

        if self.tiers.is_empty() {
            issues.push(ConfigValidationError::NoTiers);
        }
        for tier in &self.tiers {
            if let Err(e) = tier.validate() {
                issues.push(ConfigValidationError::InvalidTier(e.to_string()));
            }
        }

        if let Err(e) = self.experiment.token_budget() {
            issues.push(ConfigValidationError::InvalidBudget(e.to_string()));
        }

        issues
    }

    /// Parameters for the relay, fan-out and analysis paths.
    pub fn relay_params(&self) -> RelayParams {
        let mut params = RelayParams::default()
            .with_model(&self.upstream.model)
            .with_tiers(self.tiers.clone())
            .with_pricing(self.pricing)
            .with_compare_temperature(self.upstream.compare_temperature);
        params.analysis_temperature = self.upstream.analysis_temperature;
        params
    }

    /// Orchestrator parameters.
    ///
    /// Fails when the token thresholds are inconsistent.
    pub fn experiment_params(&self) -> Result<ExperimentParams, ConfigValidationError> {
        let budget = self
            .experiment
            .token_budget()
            .map_err(|e| ConfigValidationError::InvalidBudget(e.to_string()))?;
        Ok(ExperimentParams::default()
            .with_budget(budget)
            .with_step_delay(self.experiment.step_delay()))
    }
}

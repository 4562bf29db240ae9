//! Relay parameters — model selection for the request-handling paths.

use relay_domain::{ModelTierConfig, Pricing};

/// Default model for single completions and analysis prompts.
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Temperature used by every tier of the fan-out.
pub const DEFAULT_COMPARE_TEMPERATURE: f64 = 0.7;

/// Temperature of the analysis prompts.
pub const DEFAULT_ANALYSIS_TEMPERATURE: f64 = 0.0;

/// Parameters shared by the relay, the fan-out and the analysis use cases.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayParams {
    /// Model used by the single-model relay and analysis prompts.
    pub model: String,
    /// Tiers queried by the fan-out, in emission order.
    pub tiers: Vec<ModelTierConfig>,
    pub pricing: Pricing,
    pub compare_temperature: f64,
    pub analysis_temperature: f64,
}

impl Default for RelayParams {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            tiers: ModelTierConfig::default_tiers(),
            pricing: Pricing::default(),
            compare_temperature: DEFAULT_COMPARE_TEMPERATURE,
            analysis_temperature: DEFAULT_ANALYSIS_TEMPERATURE,
        }
    }
}

impl RelayParams {
    // ==================== Builder Methods ====================

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_tiers(mut self, tiers: Vec<ModelTierConfig>) -> Self {
        self.tiers = tiers;
        self
    }

    pub fn with_pricing(mut self, pricing: Pricing) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn with_compare_temperature(mut self, temperature: f64) -> Self {
        self.compare_temperature = temperature;
        self
    }
}

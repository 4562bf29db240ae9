//! Upstream API configuration from TOML (`[upstream]` section)

use relay_application::config::relay_params::{
    DEFAULT_ANALYSIS_TEMPERATURE, DEFAULT_COMPARE_TEMPERATURE, DEFAULT_MODEL,
};
use relay_application::use_cases::chat_agent::DEFAULT_AGENT_TEMPERATURE;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw upstream configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileUpstreamConfig {
    /// Base URL of the OpenAI-compatible API (without `/chat/completions`)
    pub base_url: String,
    /// Model for single completions, analysis prompts and experiments
    pub model: String,
    /// Name of the environment variable holding the bearer token
    pub api_key_env: String,
    /// Whole-request timeout, covering streamed bodies
    pub request_timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
    /// Temperature of every fan-out tier
    pub compare_temperature: f64,
    /// Temperature of the analysis prompts
    pub analysis_temperature: f64,
    /// Temperature of experiment chat calls
    pub experiment_temperature: f64,
}

impl Default for FileUpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.deepseek.com".to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: "DEEPSEEK_API_KEY".to_string(),
            request_timeout_seconds: 300,
            connect_timeout_seconds: 10,
            compare_temperature: DEFAULT_COMPARE_TEMPERATURE,
            analysis_temperature: DEFAULT_ANALYSIS_TEMPERATURE,
            experiment_temperature: DEFAULT_AGENT_TEMPERATURE,
        }
    }
}

impl FileUpstreamConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

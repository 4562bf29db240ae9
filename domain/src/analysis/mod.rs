//! Analysis vocabulary
//!
//! Inputs and outputs of the "ask the model to compare its own answers"
//! endpoints. Clients collect the answers (from the fan-out stream or from
//! several single completions) and send them back for a verdict.

use serde::{Deserialize, Serialize};

/// One tier's answer, as collected by a client from the fan-out stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierAnswer {
    pub model_label: String,
    pub content: String,
    pub response_time_ms: u64,
    pub total_tokens: u64,
    pub estimated_cost: f64,
}

/// Model verdict over several tier answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelComparison {
    pub comparison: String,
}

/// One completion produced at a given temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSample {
    pub temperature: f64,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureRecommendation {
    pub temperature: f64,
    pub best_for: String,
}

/// Model verdict over answers sampled at different temperatures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureAnalysis {
    pub comparison: String,
    #[serde(default)]
    pub recommendations: Vec<TemperatureRecommendation>,
}

impl TemperatureAnalysis {
    /// Analysis carrying only a failure message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            comparison: message.into(),
            recommendations: Vec::new(),
        }
    }
}

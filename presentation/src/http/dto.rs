//! Request and response bodies of the HTTP endpoints.

use relay_domain::{TemperatureSample, TierAnswer};
use serde::{Deserialize, Serialize};

/// Body of `/stream/single` and `/completion`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TemperatureRequest {
    pub prompt: String,
    pub temperature: f64,
}

/// Body of `/completion` responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureResponse {
    pub temperature: f64,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of `/stream/compare`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompareRequest {
    pub prompt: String,
}

/// Body of `/compare/analyze`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompareAnalyzeRequest {
    pub results: Vec<TierAnswer>,
}

/// Body of `/completion/analyze`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TemperatureAnalyzeRequest {
    pub results: Vec<TemperatureSample>,
}

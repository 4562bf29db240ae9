//! Analyze use case
//!
//! Asks the model to judge answers a client has already collected, and
//! parses the JSON verdict it is instructed to return.

use crate::ports::llm_gateway::{CompletionGateway, CompletionRequest, GatewayError};
use relay_domain::{
    ModelComparison, PromptTemplate, TemperatureAnalysis, TemperatureSample, TierAnswer,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while analyzing
#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("model did not return the expected JSON: {0}")]
    InvalidVerdict(String),
}

/// Use case for the analysis endpoints
pub struct AnalyzeUseCase<G: CompletionGateway + ?Sized + 'static> {
    gateway: Arc<G>,
    model: String,
    temperature: f64,
}

impl<G: CompletionGateway + ?Sized + 'static> AnalyzeUseCase<G> {
    pub fn new(gateway: Arc<G>, model: impl Into<String>, temperature: f64) -> Self {
        Self {
            gateway,
            model: model.into(),
            temperature,
        }
    }

    /// Compare the answers of several model tiers.
    pub async fn compare_models(
        &self,
        answers: &[TierAnswer],
    ) -> Result<ModelComparison, AnalyzeError> {
        self.verdict(PromptTemplate::model_comparison(answers)).await
    }

    /// Compare answers sampled at different temperatures.
    pub async fn compare_temperatures(
        &self,
        samples: &[TemperatureSample],
    ) -> Result<TemperatureAnalysis, AnalyzeError> {
        self.verdict(PromptTemplate::temperature_analysis(samples))
            .await
    }

    async fn verdict<T: DeserializeOwned>(&self, prompt: String) -> Result<T, AnalyzeError> {
        let request =
            CompletionRequest::prompt(&self.model, prompt).with_temperature(self.temperature);
        let completion = self.gateway.complete(&request).await?;
        debug!("Analysis reply: {} chars", completion.content.len());

        serde_json::from_str(strip_code_fence(&completion.content)).map_err(|e| {
            warn!("Analysis reply was not valid JSON: {}", e);
            AnalyzeError::InvalidVerdict(e.to_string())
        })
    }
}

/// Remove a surrounding Markdown code fence, if any.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

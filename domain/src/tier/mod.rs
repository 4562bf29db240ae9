//! Model tiers compared side by side, and the price table used to estimate
//! what each call cost.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// One model/parameter profile in the comparison fan-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelTierConfig {
    /// Upstream model id (e.g. `deepseek-chat`).
    pub id: String,
    /// Human-readable label shown to clients and embedded in tier errors.
    pub label: String,
    /// Completion token cap, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ModelTierConfig {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            max_tokens: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// The weak / medium / strong profiles.
    pub fn default_tiers() -> Vec<Self> {
        vec![
            Self::new("deepseek-chat", "Weak (chat, 100 tokens)").with_max_tokens(100),
            Self::new("deepseek-chat", "Medium (chat, full)"),
            Self::new("deepseek-reasoner", "Strong (reasoner)"),
        ]
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.trim().is_empty() {
            return Err(DomainError::InvalidTier(format!(
                "tier '{}' has an empty model id",
                self.label
            )));
        }
        if self.max_tokens == Some(0) {
            return Err(DomainError::InvalidTier(format!(
                "tier '{}' has max_tokens = 0",
                self.label
            )));
        }
        Ok(())
    }
}

/// Per-million-token prices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            input_per_million: 0.28,
            output_per_million: 0.42,
        }
    }
}

impl Pricing {
    pub fn new(input_per_million: f64, output_per_million: f64) -> Self {
        Self {
            input_per_million,
            output_per_million,
        }
    }

    /// `(prompt * input + completion * output) / 1_000_000`
    pub fn estimate_cost(&self, prompt_tokens: u64, completion_tokens: u64) -> f64 {
        (prompt_tokens as f64 * self.input_per_million
            + completion_tokens as f64 * self.output_per_million)
            / 1_000_000.0
    }
}

//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid token budget: {0}")]
    InvalidBudget(String),

    #[error("Invalid model tier: {0}")]
    InvalidTier(String),

    #[error("Test case '{0}' has no steps")]
    EmptyTestCase(String),
}

impl DomainError {
    /// Check if this error comes from a misconfigured budget or tier list
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidBudget(_) | DomainError::InvalidTier(_)
        )
    }
}

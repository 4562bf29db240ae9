//! Fixture source port
//!
//! Supplies the raw text of named experiment fixtures (`case_1_short`,
//! `case_2_long`, ...). Parsing stays in the domain layer.

use thiserror::Error;

/// Errors raised while loading a fixture
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Fixture not found: {0}")]
    NotFound(String),

    #[error("Failed to read fixture {name}: {message}")]
    Io { name: String, message: String },
}

/// Source of raw fixture text, keyed by case name.
pub trait FixtureSource: Send + Sync {
    fn load(&self, name: &str) -> Result<String, FixtureError>;
}

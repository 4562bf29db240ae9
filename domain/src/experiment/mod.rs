//! Long-context experiment model.
//!
//! - [`step`] — fixture steps and test cases
//! - [`parser`] — `=== HEADER ===` fixture parsing
//! - [`phase`] — orchestrator phases and the token budget
//! - [`result`] — per-step records and the persisted snapshot
//! - [`builder`] — single-owner conversation state for one run

pub mod builder;
pub mod parser;
pub mod phase;
pub mod result;
pub mod step;

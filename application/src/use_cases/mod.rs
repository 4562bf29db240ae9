//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod analyze;
pub mod chat_agent;
pub mod compare_models;
pub mod relay_stream;
pub mod run_experiment;
pub mod run_suite;

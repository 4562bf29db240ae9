//! Presentation layer for llm-relay
//!
//! This crate contains the HTTP surface, CLI definitions,
//! and console output for experiment runs.

pub mod cli;
pub mod http;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, RunArgs};
pub use http::{AppState, router};
pub use output::console::ConsoleFormatter;
pub use output::experiment_logger::ConsoleExperimentLogger;

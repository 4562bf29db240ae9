//! Terminal output
//!
//! - [`console::ConsoleFormatter`] - colored summaries of fixtures and results
//! - [`experiment_logger::ConsoleExperimentLogger`] - live experiment events via `tracing`

pub mod console;
pub mod experiment_logger;

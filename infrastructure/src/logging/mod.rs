//! Logging infrastructure — structured experiment logging.
//!
//! Provides [`JsonlExperimentLogger`], a JSONL file writer that implements
//! the [`ExperimentLogger`](relay_application::ExperimentLogger) port.

mod jsonl_experiment_logger;

pub use jsonl_experiment_logger::JsonlExperimentLogger;

//! Application layer for llm-relay
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ExperimentParams, RelayParams};
pub use ports::{
    chat_agent::ChatAgent,
    experiment_logger::{CompositeExperimentLogger, ExperimentLogger, NoExperimentLogger},
    fixture_source::{FixtureError, FixtureSource},
    llm_gateway::{Completion, CompletionGateway, CompletionRequest, DeltaStream, GatewayError},
};
pub use use_cases::analyze::{AnalyzeError, AnalyzeUseCase};
pub use use_cases::chat_agent::GatewayChatAgent;
pub use use_cases::compare_models::CompareModelsUseCase;
pub use use_cases::relay_stream::{RelayInput, RelayStreamUseCase};
pub use use_cases::run_experiment::RunExperimentUseCase;
pub use use_cases::run_suite::{ExperimentError, RunExperimentSuiteUseCase};

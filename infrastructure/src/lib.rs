//! Infrastructure layer for llm-relay
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod deepseek;
pub mod fixtures;
pub mod logging;
pub mod results;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileExperimentConfig, FileLoggingConfig,
    FileServerConfig, FileUpstreamConfig,
};
pub use deepseek::DeepSeekGateway;
pub use fixtures::DirectoryFixtureSource;
pub use logging::JsonlExperimentLogger;
pub use results::{JsonResultWriter, ResultWriteError};

//! Configuration file loading for llm-relay
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables prefixed `LLM_RELAY_` (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./llm-relay.toml` or `./.llm-relay.toml`
//! 4. Global: `~/.config/llm-relay/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileExperimentConfig, FileLoggingConfig,
    FileServerConfig, FileUpstreamConfig,
};
pub use loader::ConfigLoader;

//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod chat_agent;
pub mod experiment_logger;
pub mod fixture_source;
pub mod llm_gateway;

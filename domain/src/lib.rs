//! Domain layer for llm-relay
//!
//! This crate contains the core vocabulary of the relay and the experiment
//! engine. It has no dependencies on transport, storage, or presentation.
//!
//! # Core Concepts
//!
//! ## Streaming
//!
//! - **SSE codec**: `data: <json>\n\n` framing shared by every stream path
//! - **Relay chunks**: incremental tokens of a single upstream completion
//! - **Stream events**: the fan-out vocabulary used when three model tiers
//!   answer the same prompt concurrently
//!
//! ## Experiments
//!
//! - **Test cases**: fixture-defined conversations (messages, checkpoints,
//!   verifications) parsed from `=== HEADER ===` text
//! - **Phases**: the orchestrator grows one conversation until it reaches a
//!   token budget, then verifies recall at peak context
//! - **Results**: per-step records and the persisted experiment snapshot
//!
//! ## Analysis
//!
//! - **Prompt templates** asking the model to compare answers collected by
//!   clients, with the JSON shapes those answers come back in

pub mod analysis;
pub mod chat;
pub mod core;
pub mod experiment;
pub mod prompt;
pub mod sse;
pub mod stream;
pub mod tier;
pub mod util;

// Re-export commonly used types
pub use analysis::{
    ModelComparison, TemperatureAnalysis, TemperatureRecommendation, TemperatureSample, TierAnswer,
};
pub use chat::{AgentReply, ConversationMessage, Role, TokenUsage};
pub use core::error::DomainError;
pub use experiment::{
    builder::ConversationBuilder,
    parser::parse_test_case,
    phase::{ExperimentPhase, TokenBudget},
    result::{ConversationEntry, ExperimentResult, FullExperimentResult, StepResult},
    step::{StepType, TestCase, TestStep},
};
pub use prompt::PromptTemplate;
pub use sse::{SseData, decode, encode, encode_done};
pub use stream::{ModelMetrics, RelayChunk, StreamEvent};
pub use tier::{ModelTierConfig, Pricing};

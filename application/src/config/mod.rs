//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`ExperimentParams`] — token budget and pacing of experiment runs
//! - [`RelayParams`] — model, tiers, pricing and temperatures of the relay paths

pub mod experiment_params;
pub mod relay_params;

pub use experiment_params::ExperimentParams;
pub use relay_params::RelayParams;

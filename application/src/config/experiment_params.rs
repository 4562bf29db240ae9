//! Experiment parameters — orchestrator loop control.
//!
//! [`ExperimentParams`] groups the static parameters that control the
//! orchestrator in [`RunExperimentUseCase`](crate::use_cases::run_experiment::RunExperimentUseCase).

use relay_domain::TokenBudget;
use std::time::Duration;

/// Default pause after every step.
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_secs(1);

/// Orchestrator loop control parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentParams {
    /// Token thresholds and round limits.
    pub budget: TokenBudget,
    /// Pause inserted after every step, in every phase.
    pub step_delay: Duration,
}

impl Default for ExperimentParams {
    fn default() -> Self {
        Self {
            budget: TokenBudget::default(),
            step_delay: DEFAULT_STEP_DELAY,
        }
    }
}

impl ExperimentParams {
    // ==================== Builder Methods ====================

    pub fn with_budget(mut self, budget: TokenBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }
}

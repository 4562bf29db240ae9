//! Orchestrator phases and token budget.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Default context size the repeat phase tries to reach.
pub const DEFAULT_TOKEN_BUDGET: u64 = 120_000;

/// Default hard ceiling that ends a repeat round early.
pub const DEFAULT_TOKEN_CEILING: u64 = 125_000;

/// Default maximum number of repeat rounds.
pub const DEFAULT_MAX_ROUNDS: u32 = 10;

/// Default number of repeat cycles for a standalone case.
pub const DEFAULT_STANDALONE_CYCLES: u32 = 3;

/// Phase of an overflow experiment, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperimentPhase {
    /// Messages and checkpoints of the base case
    LoadBase,
    /// Messages and checkpoints of the extension case
    LoadExtension,
    /// Replay messages until the context reaches the budget
    RepeatUntilBudget,
    /// All verifications at peak context
    Verify,
    /// Result assembled
    Terminal,
}

impl ExperimentPhase {
    pub fn as_str(&self) -> &str {
        match self {
            ExperimentPhase::LoadBase => "load_base",
            ExperimentPhase::LoadExtension => "load_extension",
            ExperimentPhase::RepeatUntilBudget => "repeat_until_budget",
            ExperimentPhase::Verify => "verify",
            ExperimentPhase::Terminal => "terminal",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            ExperimentPhase::LoadBase => "Load Base Case",
            ExperimentPhase::LoadExtension => "Load Extension Case",
            ExperimentPhase::RepeatUntilBudget => "Repeat Until Budget",
            ExperimentPhase::Verify => "Verify At Peak",
            ExperimentPhase::Terminal => "Terminal",
        }
    }

    /// The phase that follows this one.
    pub fn next(&self) -> Option<ExperimentPhase> {
        match self {
            ExperimentPhase::LoadBase => Some(ExperimentPhase::LoadExtension),
            ExperimentPhase::LoadExtension => Some(ExperimentPhase::RepeatUntilBudget),
            ExperimentPhase::RepeatUntilBudget => Some(ExperimentPhase::Verify),
            ExperimentPhase::Verify => Some(ExperimentPhase::Terminal),
            ExperimentPhase::Terminal => None,
        }
    }

    /// Whether an upstream failure in this phase aborts the whole run.
    pub fn failure_is_fatal(&self) -> bool {
        matches!(
            self,
            ExperimentPhase::LoadBase | ExperimentPhase::LoadExtension
        )
    }
}

impl std::fmt::Display for ExperimentPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Token thresholds and round limits for growing a conversation.
///
/// `budget` is the soft target: repeat rounds start only while the last
/// observed total is below it. `ceiling` is the hard stop checked before
/// every repeated step. The two are independent knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBudget {
    budget: u64,
    ceiling: u64,
    max_rounds: u32,
    standalone_cycles: u32,
}

impl Default for TokenBudget {
    fn default() -> Self {
        Self {
            budget: DEFAULT_TOKEN_BUDGET,
            ceiling: DEFAULT_TOKEN_CEILING,
            max_rounds: DEFAULT_MAX_ROUNDS,
            standalone_cycles: DEFAULT_STANDALONE_CYCLES,
        }
    }
}

impl TokenBudget {
    /// Create a validated budget.
    ///
    /// The ceiling must not be below the budget and at least one round must
    /// be allowed.
    pub fn try_new(
        budget: u64,
        ceiling: u64,
        max_rounds: u32,
        standalone_cycles: u32,
    ) -> Result<Self, DomainError> {
        if budget == 0 {
            return Err(DomainError::InvalidBudget(
                "token_budget must be greater than 0".to_string(),
            ));
        }
        if ceiling < budget {
            return Err(DomainError::InvalidBudget(format!(
                "token_ceiling ({}) must be >= token_budget ({})",
                ceiling, budget
            )));
        }
        if max_rounds == 0 {
            return Err(DomainError::InvalidBudget(
                "max_rounds must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            budget,
            ceiling,
            max_rounds,
            standalone_cycles,
        })
    }

    // ==================== Accessors ====================

    pub fn budget(&self) -> u64 {
        self.budget
    }

    pub fn ceiling(&self) -> u64 {
        self.ceiling
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    pub fn standalone_cycles(&self) -> u32 {
        self.standalone_cycles
    }

    // ==================== Predicates ====================

    /// Another repeat round may start.
    pub fn should_start_round(&self, last_total_tokens: u64, rounds_done: u32) -> bool {
        last_total_tokens < self.budget && rounds_done < self.max_rounds
    }

    /// The hard ceiling has been reached; stop the current round.
    pub fn ceiling_reached(&self, last_total_tokens: u64) -> bool {
        last_total_tokens >= self.ceiling
    }

    /// The soft target has been reached.
    pub fn budget_reached(&self, tokens: u64) -> bool {
        tokens >= self.budget
    }
}

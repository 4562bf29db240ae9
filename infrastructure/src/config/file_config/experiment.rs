//! Experiment configuration from TOML (`[experiment]` section)

use relay_domain::TokenBudget;
use relay_domain::core::error::DomainError;
use relay_domain::experiment::phase::{
    DEFAULT_MAX_ROUNDS, DEFAULT_STANDALONE_CYCLES, DEFAULT_TOKEN_BUDGET, DEFAULT_TOKEN_CEILING,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Raw experiment configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExperimentConfig {
    /// Pause after every step, in milliseconds
    pub step_delay_ms: u64,
    /// Soft target: repeat rounds start only below this total
    pub token_budget: u64,
    /// Hard stop checked before every repeated step
    pub token_ceiling: u64,
    pub max_rounds: u32,
    /// Replay cycles of a standalone case still under budget
    pub standalone_repeat_cycles: u32,
    /// Directory holding `<case>.txt` fixtures
    pub fixtures_dir: PathBuf,
    /// Where the suite result snapshot is written
    pub output_path: PathBuf,
}

impl Default for FileExperimentConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: 1000,
            token_budget: DEFAULT_TOKEN_BUDGET,
            token_ceiling: DEFAULT_TOKEN_CEILING,
            max_rounds: DEFAULT_MAX_ROUNDS,
            standalone_repeat_cycles: DEFAULT_STANDALONE_CYCLES,
            fixtures_dir: PathBuf::from("fixtures"),
            output_path: PathBuf::from("results/experiment_results.json"),
        }
    }
}

impl FileExperimentConfig {
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    pub fn token_budget(&self) -> Result<TokenBudget, DomainError> {
        TokenBudget::try_new(
            self.token_budget,
            self.token_ceiling,
            self.max_rounds,
            self.standalone_repeat_cycles,
        )
    }
}

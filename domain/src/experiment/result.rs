//! Experiment result types.
//!
//! These are the records persisted at the end of a run:
//! - [`StepResult`] - one attempted step (including repeated steps)
//! - [`ConversationEntry`] - a log-only mirror of each user/assistant turn
//! - [`ExperimentResult`] - the snapshot of one run
//! - [`FullExperimentResult`] - every run of a suite plus a generation time
//!
//! Field names are camelCase on disk; token usage keeps the upstream
//! snake_case names.

use super::step::StepType;
use crate::chat::{Role, TokenUsage};
use serde::{Deserialize, Serialize};

/// Record of one step sent to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub step_id: String,
    pub step_type: StepType,
    pub failure_mode: Option<String>,
    pub user_message: String,
    /// Absent when the model returned no content (including failures).
    pub assistant_response: Option<String>,
    pub usage: Option<TokenUsage>,
    /// 0 when no HTTP response was received.
    pub http_status: u16,
    pub error_message: Option<String>,
    /// History length after this step.
    pub conversation_length: usize,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

impl StepResult {
    pub fn is_failed(&self) -> bool {
        self.error_message.is_some()
    }

    pub fn total_tokens(&self) -> Option<u64> {
        self.usage.map(|u| u.total_tokens)
    }
}

/// One user or assistant turn, mirrored for the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationEntry {
    pub role: Role,
    pub content: String,
    pub step_id: String,
    pub step_type: StepType,
    /// Set on assistant turns only.
    pub usage: Option<TokenUsage>,
    pub timestamp: i64,
}

/// Snapshot of one experiment run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentResult {
    pub case_name: String,
    pub steps: Vec<StepResult>,
    pub conversation_log: Vec<ConversationEntry>,
    pub total_messages: usize,
    pub peak_tokens: u64,
    pub total_steps: usize,
    pub failed_steps: usize,
    pub started_at: i64,
    pub finished_at: i64,
}

impl ExperimentResult {
    /// Steps of a given type, in execution order.
    pub fn steps_of_type(&self, step_type: StepType) -> impl Iterator<Item = &StepResult> {
        self.steps.iter().filter(move |s| s.step_type == step_type)
    }

    pub fn duration_ms(&self) -> i64 {
        self.finished_at - self.started_at
    }

    pub fn has_failures(&self) -> bool {
        self.failed_steps > 0
    }
}

/// Every run of a suite, as written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullExperimentResult {
    pub cases: Vec<ExperimentResult>,
    pub generated_at: i64,
}

impl FullExperimentResult {
    pub fn new(cases: Vec<ExperimentResult>, generated_at: i64) -> Self {
        Self {
            cases,
            generated_at,
        }
    }

    pub fn peak_tokens(&self) -> u64 {
        self.cases.iter().map(|c| c.peak_tokens).max().unwrap_or(0)
    }
}

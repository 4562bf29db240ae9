//! Conversation state for a single experiment run.

use super::result::{ConversationEntry, ExperimentResult, StepResult};
use super::step::TestStep;
use crate::chat::{AgentReply, ConversationMessage, Role};
use crate::util::now_millis;

/// Accumulates history, step records and token counters for one run.
///
/// A run owns exactly one builder and passes it by `&mut` through its
/// phases. Each step is a [`push_user`](Self::push_user) followed by a
/// [`record_reply`](Self::record_reply); [`finish`](Self::finish) turns the
/// builder into an immutable [`ExperimentResult`].
#[derive(Debug)]
pub struct ConversationBuilder {
    case_name: String,
    history: Vec<ConversationMessage>,
    steps: Vec<StepResult>,
    log: Vec<ConversationEntry>,
    peak_tokens: u64,
    last_total_tokens: u64,
    started_at: i64,
}

impl ConversationBuilder {
    pub fn new(case_name: impl Into<String>) -> Self {
        Self {
            case_name: case_name.into(),
            history: Vec::new(),
            steps: Vec::new(),
            log: Vec::new(),
            peak_tokens: 0,
            last_total_tokens: 0,
            started_at: now_millis(),
        }
    }

    /// Append the step's content as a user turn.
    pub fn push_user(&mut self, step: &TestStep) {
        self.history.push(ConversationMessage::user(step.content()));
        self.log.push(ConversationEntry {
            role: Role::User,
            content: step.content().to_string(),
            step_id: step.id().to_string(),
            step_type: step.step_type(),
            usage: None,
            timestamp: now_millis(),
        });
    }

    /// Record the reply to the last user turn.
    ///
    /// Successful replies are appended to the history. Token counters move
    /// only when the reply carries usage.
    pub fn record_reply(&mut self, step: &TestStep, reply: &AgentReply) -> &StepResult {
        if !reply.is_error() {
            self.history
                .push(ConversationMessage::assistant(reply.content.clone()));
            self.log.push(ConversationEntry {
                role: Role::Assistant,
                content: reply.content.clone(),
                step_id: step.id().to_string(),
                step_type: step.step_type(),
                usage: reply.usage,
                timestamp: now_millis(),
            });
        }

        if let Some(total) = reply.total_tokens() {
            self.peak_tokens = self.peak_tokens.max(total);
            self.last_total_tokens = total;
        }

        self.steps.push(StepResult {
            step_id: step.id().to_string(),
            step_type: step.step_type(),
            failure_mode: step.failure_mode().map(str::to_string),
            user_message: step.content().to_string(),
            assistant_response: (!reply.content.is_empty()).then(|| reply.content.clone()),
            usage: reply.usage,
            http_status: reply.http_status,
            error_message: reply.error_message.clone(),
            conversation_length: self.history.len(),
            timestamp: now_millis(),
        });
        &self.steps[self.steps.len() - 1]
    }

    pub fn case_name(&self) -> &str {
        &self.case_name
    }

    /// Messages to send on the next call, oldest first.
    pub fn history(&self) -> &[ConversationMessage] {
        &self.history
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn peak_tokens(&self) -> u64 {
        self.peak_tokens
    }

    /// Total tokens reported by the most recent reply that carried usage.
    pub fn last_total_tokens(&self) -> u64 {
        self.last_total_tokens
    }

    pub fn steps(&self) -> &[StepResult] {
        &self.steps
    }

    pub fn finish(self) -> ExperimentResult {
        let failed_steps = self.steps.iter().filter(|s| s.is_failed()).count();
        ExperimentResult {
            case_name: self.case_name,
            total_messages: self.history.len(),
            peak_tokens: self.peak_tokens,
            total_steps: self.steps.len(),
            failed_steps,
            steps: self.steps,
            conversation_log: self.log,
            started_at: self.started_at,
            finished_at: now_millis(),
        }
    }
}

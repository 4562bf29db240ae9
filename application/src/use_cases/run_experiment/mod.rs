//! Run Experiment use case
//!
//! Drives a scripted conversation against a [`ChatAgent`] and records every
//! step. Two shapes of run exist:
//!
//! - **standalone** — one test case sent in order, optionally followed by a
//!   few repeat cycles to grow the context
//! - **overflow** — a base case continued by an extension case, then grown
//!   to the token budget before every verification is sent at peak context
//!
//! Runs are strictly sequential: one call is in flight at a time and the
//! history is owned by a single [`ConversationBuilder`].

mod overflow;
mod standalone;

use crate::config::ExperimentParams;
use crate::ports::chat_agent::ChatAgent;
use crate::ports::experiment_logger::{ExperimentLogger, NoExperimentLogger};
use relay_domain::{AgentReply, ConversationBuilder, TestStep};
use std::sync::Arc;

/// Whether a phase ran to completion or hit a fatal failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PhaseOutcome {
    Completed,
    Aborted,
}

/// Use case for running long-context experiments
pub struct RunExperimentUseCase<A: ChatAgent + ?Sized + 'static> {
    agent: Arc<A>,
    logger: Arc<dyn ExperimentLogger>,
    params: ExperimentParams,
}

impl<A: ChatAgent + ?Sized + 'static> RunExperimentUseCase<A> {
    pub fn new(agent: Arc<A>, params: ExperimentParams) -> Self {
        Self {
            agent,
            logger: Arc::new(NoExperimentLogger),
            params,
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ExperimentLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn params(&self) -> &ExperimentParams {
        &self.params
    }

    /// Send one step and record the reply.
    ///
    /// The configured step delay is applied afterwards whatever the outcome.
    async fn send_step(&self, builder: &mut ConversationBuilder, step: &TestStep) -> AgentReply {
        self.logger.log_step(step, builder.history_len());
        builder.push_user(step);

        let reply = self.agent.chat(builder.history()).await;
        self.logger.log_response(&reply);
        builder.record_reply(step, &reply);

        if !self.params.step_delay.is_zero() {
            tokio::time::sleep(self.params.step_delay).await;
        }
        reply
    }

    fn log_probe(&self, step: &TestStep) {
        match step {
            TestStep::Checkpoint {
                id, failure_mode, ..
            } => self
                .logger
                .log_milestone(&format!("CHECKPOINT {}: {}", id, failure_mode)),
            TestStep::Verification {
                id, failure_mode, ..
            } => self
                .logger
                .log_milestone(&format!("VERIFICATION {}: {}", id, failure_mode)),
            TestStep::Message { .. } => {}
        }
    }
}

//! Overflow run: base case continued by an extension case.
//!
//! ```text
//! LoadBase ──► LoadExtension ──► RepeatUntilBudget ──► Verify ──► Terminal
//!    │               │
//!    └── failure ────┴──────────────────────────────────────────────►
//! ```

use super::{PhaseOutcome, RunExperimentUseCase};
use crate::ports::chat_agent::ChatAgent;
use relay_domain::{ConversationBuilder, ExperimentPhase, ExperimentResult, TestCase, TestStep};
use tracing::{debug, info, warn};

impl<A: ChatAgent + ?Sized + 'static> RunExperimentUseCase<A> {
    /// Run `extension` as a continuation of `base` and verify both at peak
    /// context. The result is recorded under `name`.
    pub async fn run_overflow(
        &self,
        name: &str,
        base: &TestCase,
        extension: &TestCase,
    ) -> ExperimentResult {
        info!(
            "Running overflow experiment {} ({} + {})",
            name, base.name, extension.name
        );
        let mut builder = ConversationBuilder::new(name);
        let mut phase = Some(ExperimentPhase::LoadBase);

        while let Some(current) = phase {
            debug!("Entering phase {}", current.as_str());
            phase = match current {
                ExperimentPhase::LoadBase | ExperimentPhase::LoadExtension => {
                    let case = if current == ExperimentPhase::LoadBase {
                        base
                    } else {
                        extension
                    };
                    match self.load_phase(&mut builder, current, case).await {
                        PhaseOutcome::Completed => current.next(),
                        PhaseOutcome::Aborted => Some(ExperimentPhase::Terminal),
                    }
                }
                ExperimentPhase::RepeatUntilBudget => {
                    self.repeat_phase(&mut builder, base, extension).await;
                    current.next()
                }
                ExperimentPhase::Verify => {
                    self.verify_phase(&mut builder, base, extension).await;
                    current.next()
                }
                ExperimentPhase::Terminal => None,
            };
        }

        let result = builder.finish();
        info!(
            "Overflow experiment {} finished: {} steps, {} failed, peak {} tokens",
            result.case_name, result.total_steps, result.failed_steps, result.peak_tokens
        );
        result
    }

    /// Messages and checkpoints of one case. In a phase whose failures are
    /// fatal, the first failure aborts the run.
    async fn load_phase(
        &self,
        builder: &mut ConversationBuilder,
        phase: ExperimentPhase,
        case: &TestCase,
    ) -> PhaseOutcome {
        self.logger.log_milestone(&format!(
            "{}: loading {} (messages + checkpoints)",
            phase, case.name
        ));

        for step in case.loading_steps() {
            self.log_probe(step);
            let reply = self.send_step(builder, step).await;
            if let Some(err) = &reply.error_message {
                self.logger
                    .log_error(&format!("Error in {} at {}: {}", phase, step.id(), err));
                if phase.failure_is_fatal() {
                    warn!("{} aborted at {}", phase, step.id());
                    return PhaseOutcome::Aborted;
                }
            }
        }

        self.logger.log_milestone(&format!(
            "{} complete. Tokens: {}",
            phase,
            builder.last_total_tokens()
        ));
        PhaseOutcome::Completed
    }

    /// Replay every message of both cases until the budget is reached.
    ///
    /// A round starts only while the last observed total is below the
    /// budget; within a round, the ceiling is checked before each step. A
    /// failure ends the phase but not the run.
    async fn repeat_phase(
        &self,
        builder: &mut ConversationBuilder,
        base: &TestCase,
        extension: &TestCase,
    ) {
        let budget = self.params.budget;
        let messages: Vec<&TestStep> = base.messages().chain(extension.messages()).collect();
        let mut round = 0u32;

        'rounds: while budget.should_start_round(builder.last_total_tokens(), round) {
            round += 1;
            self.logger.log_milestone(&format!(
                "{}: round R{}. Current tokens: {}",
                ExperimentPhase::RepeatUntilBudget,
                round,
                builder.last_total_tokens()
            ));

            for message in &messages {
                if budget.ceiling_reached(builder.last_total_tokens()) {
                    debug!("Token ceiling reached in round R{}", round);
                    break;
                }
                let repeat = TestStep::message(
                    format!("{}-R{}", message.id(), round),
                    format!("REPEAT R{}: {}", round, message.content()),
                );
                let reply = self.send_step(builder, &repeat).await;
                if let Some(err) = &reply.error_message {
                    self.logger.log_error(&format!(
                        "Error in R{} at {} (continuing to verification): {}",
                        round,
                        repeat.id(),
                        err
                    ));
                    break 'rounds;
                }
            }
        }

        self.logger.log_milestone(&format!(
            "{} complete after {} rounds. Peak tokens: {}",
            ExperimentPhase::RepeatUntilBudget,
            round,
            builder.peak_tokens()
        ));
    }

    /// Every verification of both cases, at the current context size.
    /// Failures are logged and do not stop the phase.
    async fn verify_phase(
        &self,
        builder: &mut ConversationBuilder,
        base: &TestCase,
        extension: &TestCase,
    ) {
        let verifications: Vec<&TestStep> = base
            .verifications()
            .chain(extension.verifications())
            .collect();
        self.logger.log_milestone(&format!(
            "{}: sending {} verifications at {} tokens",
            ExperimentPhase::Verify,
            verifications.len(),
            builder.last_total_tokens()
        ));

        for step in verifications {
            self.log_probe(step);
            let reply = self.send_step(builder, step).await;
            if let Some(err) = &reply.error_message {
                self.logger
                    .log_error(&format!("Error in verification {}: {}", step.id(), err));
            }
        }

        self.logger.log_milestone(&format!(
            "{} complete. Final peak tokens: {}",
            ExperimentPhase::Verify,
            builder.peak_tokens()
        ));
    }
}

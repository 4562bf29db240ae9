//! Standalone run: one case, then optional repeat cycles.

use super::RunExperimentUseCase;
use crate::ports::chat_agent::ChatAgent;
use relay_domain::{ConversationBuilder, ExperimentResult, TestCase, TestStep};
use tracing::{info, warn};

impl<A: ChatAgent + ?Sized + 'static> RunExperimentUseCase<A> {
    /// Send every step of `case` in order.
    ///
    /// Any failure aborts the run. Otherwise, while the peak stays below the
    /// token budget, up to `standalone_cycles` cycles replay every message
    /// as `"REPEAT: <content>"` with id `"<id>-R<cycle>"`.
    pub async fn run_standalone(&self, case: &TestCase) -> ExperimentResult {
        info!("Running standalone experiment {} ({} steps)", case.name, case.steps.len());
        let mut builder = ConversationBuilder::new(&case.name);

        let mut aborted = false;
        for step in &case.steps {
            self.log_probe(step);
            let reply = self.send_step(&mut builder, step).await;
            if let Some(err) = &reply.error_message {
                warn!("Standalone experiment {} aborted at {}", case.name, step.id());
                self.logger
                    .log_error(&format!("Aborting experiment: {}", err));
                aborted = true;
                break;
            }
        }

        let budget = self.params.budget;
        if !aborted && !budget.budget_reached(builder.peak_tokens()) {
            let messages: Vec<&TestStep> = case.messages().collect();
            let cycles = budget.standalone_cycles();

            'cycles: for cycle in 1..=cycles {
                if budget.budget_reached(builder.peak_tokens()) {
                    break;
                }
                self.logger.log_milestone(&format!(
                    "Overflow repeat cycle {}/{} (peakTokens={})",
                    cycle,
                    cycles,
                    builder.peak_tokens()
                ));

                for message in &messages {
                    if budget.budget_reached(builder.peak_tokens()) {
                        break 'cycles;
                    }
                    let repeat = TestStep::message(
                        format!("{}-R{}", message.id(), cycle),
                        format!("REPEAT: {}", message.content()),
                    );
                    let reply = self.send_step(&mut builder, &repeat).await;
                    if let Some(err) = &reply.error_message {
                        self.logger.log_error(&format!("Aborting overflow: {}", err));
                        break 'cycles;
                    }
                }
            }
        }

        let result = builder.finish();
        info!(
            "Standalone experiment {} finished: {} steps, {} failed, peak {} tokens",
            result.case_name, result.total_steps, result.failed_steps, result.peak_tokens
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{ScriptedAgent, failed, ok};
    use super::*;
    use crate::config::ExperimentParams;
    use crate::ports::experiment_logger::testing::RecordingLogger;
    use relay_domain::{StepType, TokenBudget};
    use std::sync::Arc;
    use std::time::Duration;

    fn case() -> TestCase {
        TestCase::new(
            "case_1_short",
            "Be precise.",
            vec![
                TestStep::message("M1", "Study #1"),
                TestStep::message("M2", "Study #2"),
                TestStep::checkpoint("C1-1", "Which are NOTABLE?", "constraint drift"),
                TestStep::verification("V1-1", "Sample size of #1?", "early recall"),
            ],
        )
    }

    fn use_case(agent: Arc<ScriptedAgent>, budget: TokenBudget) -> RunExperimentUseCase<ScriptedAgent> {
        RunExperimentUseCase::new(
            agent,
            ExperimentParams::default()
                .with_budget(budget)
                .with_step_delay(Duration::ZERO),
        )
    }

    #[tokio::test]
    async fn test_runs_case_then_repeat_cycles() {
        let budget = TokenBudget::try_new(1_000, 1_000, 10, 2).unwrap();
        let agent = Arc::new(ScriptedAgent::with_totals(&[], 100));
        let result = use_case(Arc::clone(&agent), budget)
            .run_standalone(&case())
            .await;

        let ids: Vec<_> = result.steps.iter().map(|s| s.step_id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["M1", "M2", "C1-1", "V1-1", "M1-R1", "M2-R1", "M1-R2", "M2-R2"]
        );
        assert_eq!(result.case_name, "case_1_short");
        assert_eq!(result.failed_steps, 0);
        assert_eq!(result.steps[4].user_message, "REPEAT: Study #1");
        assert_eq!(result.steps[4].step_type, StepType::Message);
        assert_eq!(agent.sent_contents()[7], "REPEAT: Study #2");
    }

    #[tokio::test]
    async fn test_failure_aborts_without_repeats() {
        let agent = Arc::new(ScriptedAgent::new(vec![ok(10), failed(500)], 10));
        let logger = Arc::new(RecordingLogger::default());
        let result = use_case(agent, TokenBudget::default())
            .with_logger(logger.clone())
            .run_standalone(&case())
            .await;

        assert_eq!(result.total_steps, 2);
        assert_eq!(result.failed_steps, 1);
        assert_eq!(
            logger.errors(),
            vec!["Aborting experiment: Upstream error (500): boom"]
        );
    }

    #[tokio::test]
    async fn test_repeats_stop_once_budget_reached() {
        let budget = TokenBudget::try_new(500, 600, 10, 3).unwrap();
        let agent = Arc::new(ScriptedAgent::with_totals(&[100, 200, 300, 400, 520], 700));
        let result = use_case(agent, budget).run_standalone(&case()).await;

        // Four case steps, then M1-R1 crosses the budget.
        assert_eq!(result.total_steps, 5);
        assert_eq!(result.steps[4].step_id, "M1-R1");
        assert_eq!(result.peak_tokens, 520);
    }

    #[tokio::test]
    async fn test_no_repeats_when_case_already_over_budget() {
        let budget = TokenBudget::try_new(50, 60, 10, 3).unwrap();
        let agent = Arc::new(ScriptedAgent::with_totals(&[], 80));
        let logger = Arc::new(RecordingLogger::default());
        let result = use_case(agent, budget)
            .with_logger(logger.clone())
            .run_standalone(&case())
            .await;

        assert_eq!(result.total_steps, 4);
        assert_eq!(
            logger.milestones(),
            vec![
                "CHECKPOINT C1-1: constraint drift",
                "VERIFICATION V1-1: early recall"
            ]
        );
    }

    #[tokio::test]
    async fn test_repeat_failure_ends_cycles() {
        let budget = TokenBudget::try_new(1_000, 1_000, 10, 3).unwrap();
        let agent = Arc::new(ScriptedAgent::new(
            vec![ok(10), ok(20), ok(30), ok(40), ok(50), failed(503)],
            60,
        ));
        let result = use_case(agent, budget).run_standalone(&case()).await;

        assert_eq!(result.total_steps, 6);
        assert_eq!(result.steps[5].step_id, "M2-R1");
        assert!(result.steps[5].is_failed());
    }
}

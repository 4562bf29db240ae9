//! Run Experiment Suite use case
//!
//! Loads the three standard fixtures and runs them as one suite: the short
//! and long cases standalone, then the overflow case as a continuation of
//! the long one.

use crate::config::ExperimentParams;
use crate::ports::experiment_logger::{ExperimentLogger, NoExperimentLogger};
use crate::ports::fixture_source::{FixtureError, FixtureSource};
use crate::ports::llm_gateway::CompletionGateway;
use crate::use_cases::chat_agent::{DEFAULT_AGENT_TEMPERATURE, GatewayChatAgent};
use crate::use_cases::run_experiment::RunExperimentUseCase;
use relay_domain::util::now_millis;
use relay_domain::{ExperimentResult, FullExperimentResult, TestCase, parse_test_case};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

pub const CASE_SHORT: &str = "case_1_short";
pub const CASE_LONG: &str = "case_2_long";
pub const CASE_OVERFLOW: &str = "case_3_overflow";

/// Name under which the continuation run is recorded.
pub const OVERFLOW_RESULT_NAME: &str = "case_3_overflow_fixed";

/// Errors that can occur before a suite starts
#[derive(Error, Debug)]
pub enum ExperimentError {
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error("Fixture {0} contains no steps")]
    EmptyFixture(String),
}

/// Use case for running the full experiment suite
pub struct RunExperimentSuiteUseCase<G: CompletionGateway + ?Sized + 'static> {
    gateway: Arc<G>,
    fixtures: Arc<dyn FixtureSource>,
    logger: Arc<dyn ExperimentLogger>,
    params: ExperimentParams,
    model: String,
    temperature: f64,
}

impl<G: CompletionGateway + ?Sized + 'static> RunExperimentSuiteUseCase<G> {
    pub fn new(
        gateway: Arc<G>,
        fixtures: Arc<dyn FixtureSource>,
        model: impl Into<String>,
        params: ExperimentParams,
    ) -> Self {
        Self {
            gateway,
            fixtures,
            logger: Arc::new(NoExperimentLogger),
            params,
            model: model.into(),
            temperature: DEFAULT_AGENT_TEMPERATURE,
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ExperimentLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Run all three cases and collect their results.
    ///
    /// Every fixture is loaded before the first call is made.
    pub async fn execute(&self) -> Result<FullExperimentResult, ExperimentError> {
        let short = self.load(CASE_SHORT)?;
        let long = self.load(CASE_LONG)?;
        let overflow = self.load(CASE_OVERFLOW)?;
        info!("Running experiment suite");

        let mut cases = Vec::with_capacity(3);
        for case in [&short, &long] {
            self.logger
                .log_milestone(&format!("Starting experiment: {}", case.name));
            let result = self
                .runner(&case.system_prompt)
                .run_standalone(case)
                .await;
            self.log_finished(&result);
            cases.push(result);
        }

        cases.push(self.overflow(&long, &overflow).await);
        Ok(FullExperimentResult::new(cases, now_millis()))
    }

    /// Run only the continuation experiment.
    pub async fn execute_overflow(&self) -> Result<ExperimentResult, ExperimentError> {
        let long = self.load(CASE_LONG)?;
        let overflow = self.load(CASE_OVERFLOW)?;
        Ok(self.overflow(&long, &overflow).await)
    }

    async fn overflow(&self, base: &TestCase, extension: &TestCase) -> ExperimentResult {
        self.logger.log_milestone(&format!(
            "Starting experiment: {} (continuation of {})",
            OVERFLOW_RESULT_NAME, base.name
        ));
        // The continuation keeps the base case's system prompt.
        let result = self
            .runner(&base.system_prompt)
            .run_overflow(OVERFLOW_RESULT_NAME, base, extension)
            .await;
        self.log_finished(&result);
        result
    }

    fn runner(&self, system_prompt: &str) -> RunExperimentUseCase<GatewayChatAgent<G>> {
        let agent = GatewayChatAgent::new(Arc::clone(&self.gateway), &self.model, system_prompt)
            .with_temperature(self.temperature);
        RunExperimentUseCase::new(Arc::new(agent), self.params.clone())
            .with_logger(Arc::clone(&self.logger))
    }

    fn load(&self, name: &str) -> Result<TestCase, ExperimentError> {
        let raw = self.fixtures.load(name)?;
        let case = parse_test_case(name, &raw);
        if case.steps.is_empty() {
            return Err(ExperimentError::EmptyFixture(name.to_string()));
        }
        info!("Loaded fixture {} ({} steps)", name, case.steps.len());
        Ok(case)
    }

    fn log_finished(&self, result: &ExperimentResult) {
        self.logger.log_milestone(&format!(
            "Finished {}: peakTokens={}, failed={}",
            result.case_name, result.peak_tokens, result.failed_steps
        ));
    }
}

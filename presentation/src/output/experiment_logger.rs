//! Experiment events as `tracing` records

use relay_application::ExperimentLogger;
use relay_domain::util::preview;
use relay_domain::{AgentReply, TestStep};
use tracing::{info, warn};

/// Characters of message content shown per log line.
const PREVIEW_CHARS: usize = 80;

/// Logs every experiment event through `tracing`.
///
/// Steps and responses go out at `info`, errors at `warn`.
#[derive(Debug, Default)]
pub struct ConsoleExperimentLogger;

impl ConsoleExperimentLogger {
    pub fn new() -> Self {
        Self
    }
}

impl ExperimentLogger for ConsoleExperimentLogger {
    fn log_step(&self, step: &TestStep, history_len: usize) {
        info!(
            step_id = step.id(),
            step_type = %step.step_type(),
            history = history_len,
            "-> {}",
            preview(step.content(), PREVIEW_CHARS)
        );
    }

    fn log_response(&self, reply: &AgentReply) {
        match &reply.error_message {
            Some(error) => warn!(status = reply.http_status, "<- failed: {}", error),
            None => info!(
                status = reply.http_status,
                total_tokens = reply.total_tokens().unwrap_or(0),
                "<- {}",
                preview(&reply.content, PREVIEW_CHARS)
            ),
        }
    }

    fn log_error(&self, message: &str) {
        warn!("{}", message);
    }

    fn log_milestone(&self, message: &str) {
        info!("== {}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_domain::TokenUsage;

    #[test]
    fn test_logs_without_subscriber() {
        let logger = ConsoleExperimentLogger::new();
        logger.log_milestone("Repeat Until Budget: round 1");
        logger.log_step(&TestStep::message("M1", "a".repeat(500)), 2);
        logger.log_response(&AgentReply::success("ok", Some(TokenUsage::new(1, 1)), 200));
        logger.log_response(&AgentReply::failure(0, "Network error: reset"));
        logger.log_error("Error in verification V1-1: boom");
    }
}

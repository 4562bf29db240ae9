//! Port for experiment telemetry.
//!
//! Defines the [`ExperimentLogger`] trait the orchestrator reports to while
//! a run progresses. Loggers are pure observers: they never affect control
//! flow and their failures are swallowed by the implementation.

use relay_domain::{AgentReply, TestStep};
use std::sync::Arc;

/// Observer of experiment progress.
pub trait ExperimentLogger: Send + Sync {
    /// A step is about to be sent with `history_len` messages already in
    /// the conversation.
    fn log_step(&self, step: &TestStep, history_len: usize);

    /// The reply to the step just sent.
    fn log_response(&self, reply: &AgentReply);

    fn log_error(&self, message: &str);

    /// A phase boundary or other notable event.
    fn log_milestone(&self, message: &str);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoExperimentLogger;

impl ExperimentLogger for NoExperimentLogger {
    fn log_step(&self, _step: &TestStep, _history_len: usize) {}
    fn log_response(&self, _reply: &AgentReply) {}
    fn log_error(&self, _message: &str) {}
    fn log_milestone(&self, _message: &str) {}
}

/// A logger that forwards every event to several inner loggers.
///
/// ```text
/// orchestrator ──► CompositeExperimentLogger
///                      ├─► console (tracing)
///                      └─► JSONL file
/// ```
pub struct CompositeExperimentLogger {
    delegates: Vec<Arc<dyn ExperimentLogger>>,
}

impl CompositeExperimentLogger {
    pub fn new(delegates: Vec<Arc<dyn ExperimentLogger>>) -> Self {
        Self { delegates }
    }

    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}

macro_rules! delegate {
    ($self:ident, $method:ident $(, $arg:expr)*) => {
        for d in &$self.delegates {
            d.$method($($arg),*);
        }
    };
}

impl ExperimentLogger for CompositeExperimentLogger {
    fn log_step(&self, step: &TestStep, history_len: usize) {
        delegate!(self, log_step, step, history_len);
    }

    fn log_response(&self, reply: &AgentReply) {
        delegate!(self, log_response, reply);
    }

    fn log_error(&self, message: &str) {
        delegate!(self, log_error, message);
    }

    fn log_milestone(&self, message: &str) {
        delegate!(self, log_milestone, message);
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingLogger;
    use super::*;

    #[test]
    fn composite_forwards_to_every_delegate() {
        let first = Arc::new(RecordingLogger::default());
        let second = Arc::new(RecordingLogger::default());
        let composite = CompositeExperimentLogger::new(vec![
            first.clone() as Arc<dyn ExperimentLogger>,
            second.clone() as Arc<dyn ExperimentLogger>,
            Arc::new(NoExperimentLogger) as Arc<dyn ExperimentLogger>,
        ]);

        composite.log_step(&TestStep::message("M1", "hi"), 0);
        composite.log_milestone("Phase 1");
        composite.log_response(&AgentReply::failure(0, "down"));
        composite.log_error("down");

        assert_eq!(composite.len(), 3);
        for logger in [&first, &second] {
            assert_eq!(
                logger.events(),
                vec!["step:M1@0", "milestone:Phase 1", "response:0", "error:down"]
            );
        }
    }
}

//! Fixture steps and test cases.

use serde::{Deserialize, Serialize};

/// Kind of a [`TestStep`], as recorded in results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    Message,
    Checkpoint,
    Verification,
}

impl StepType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepType::Message => "message",
            StepType::Checkpoint => "checkpoint",
            StepType::Verification => "verification",
        }
    }
}

impl std::fmt::Display for StepType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scripted user turn of an experiment.
///
/// Checkpoints and verifications carry a failure-mode label naming the
/// behavior they probe (e.g. "constraint drift").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestStep {
    Message {
        id: String,
        content: String,
    },
    Checkpoint {
        id: String,
        content: String,
        failure_mode: String,
    },
    Verification {
        id: String,
        content: String,
        failure_mode: String,
    },
}

impl TestStep {
    pub fn message(id: impl Into<String>, content: impl Into<String>) -> Self {
        TestStep::Message {
            id: id.into(),
            content: content.into(),
        }
    }

    pub fn checkpoint(
        id: impl Into<String>,
        content: impl Into<String>,
        failure_mode: impl Into<String>,
    ) -> Self {
        TestStep::Checkpoint {
            id: id.into(),
            content: content.into(),
            failure_mode: failure_mode.into(),
        }
    }

    pub fn verification(
        id: impl Into<String>,
        content: impl Into<String>,
        failure_mode: impl Into<String>,
    ) -> Self {
        TestStep::Verification {
            id: id.into(),
            content: content.into(),
            failure_mode: failure_mode.into(),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            TestStep::Message { id, .. }
            | TestStep::Checkpoint { id, .. }
            | TestStep::Verification { id, .. } => id,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            TestStep::Message { content, .. }
            | TestStep::Checkpoint { content, .. }
            | TestStep::Verification { content, .. } => content,
        }
    }

    pub fn failure_mode(&self) -> Option<&str> {
        match self {
            TestStep::Message { .. } => None,
            TestStep::Checkpoint { failure_mode, .. }
            | TestStep::Verification { failure_mode, .. } => Some(failure_mode),
        }
    }

    pub fn step_type(&self) -> StepType {
        match self {
            TestStep::Message { .. } => StepType::Message,
            TestStep::Checkpoint { .. } => StepType::Checkpoint,
            TestStep::Verification { .. } => StepType::Verification,
        }
    }

    pub fn is_verification(&self) -> bool {
        matches!(self, TestStep::Verification { .. })
    }
}

/// A parsed fixture: system prompt plus ordered steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub name: String,
    pub system_prompt: String,
    pub steps: Vec<TestStep>,
}

impl TestCase {
    pub fn new(name: impl Into<String>, system_prompt: impl Into<String>, steps: Vec<TestStep>) -> Self {
        Self {
            name: name.into(),
            system_prompt: system_prompt.into(),
            steps,
        }
    }

    /// All `Message` steps, in order.
    pub fn messages(&self) -> impl Iterator<Item = &TestStep> {
        self.steps
            .iter()
            .filter(|s| s.step_type() == StepType::Message)
    }

    /// All `Verification` steps, in order.
    pub fn verifications(&self) -> impl Iterator<Item = &TestStep> {
        self.steps.iter().filter(|s| s.is_verification())
    }

    /// Messages and checkpoints, in order (the loading part of a case).
    pub fn loading_steps(&self) -> impl Iterator<Item = &TestStep> {
        self.steps.iter().filter(|s| !s.is_verification())
    }

    pub fn count(&self, step_type: StepType) -> usize {
        self.steps
            .iter()
            .filter(|s| s.step_type() == step_type)
            .count()
    }
}

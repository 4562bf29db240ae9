//! Console output formatter for fixtures and experiment results

use colored::Colorize;
use relay_domain::util::preview;
use relay_domain::{ExperimentResult, FullExperimentResult, StepType, TestCase, TestStep};

/// Formats experiment data for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Summarize a whole suite run
    pub fn format_suite(result: &FullExperimentResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Experiment Results"));
        output.push('\n');

        for case in &result.cases {
            output.push_str(&Self::format_case(case));
        }

        output.push_str(&format!(
            "\n{} {}\n",
            "Peak tokens across cases:".cyan().bold(),
            result.peak_tokens()
        ));
        output.push_str(&Self::footer());

        output
    }

    /// Summarize one experiment run
    pub fn format_case(result: &ExperimentResult) -> String {
        let mut output = Self::section_header(&result.case_name);

        output.push_str(&format!(
            "{} {}   {} {}   {} {}\n",
            "steps:".dimmed(),
            result.total_steps,
            "messages:".dimmed(),
            result.total_messages,
            "peak tokens:".dimmed(),
            result.peak_tokens
        ));
        output.push_str(&format!(
            "{} {:.1}s\n",
            "duration:".dimmed(),
            result.duration_ms() as f64 / 1000.0
        ));

        if result.has_failures() {
            output.push_str(&format!(
                "{}\n",
                format!("{} failed step(s)", result.failed_steps).red().bold()
            ));
            for step in result.steps.iter().filter(|s| s.is_failed()) {
                output.push_str(&format!(
                    "  {} {}\n",
                    step.step_id.red(),
                    step.error_message.as_deref().unwrap_or("unknown error")
                ));
            }
        } else {
            output.push_str(&format!("{}\n", "no failed steps".green()));
        }

        let verifications: Vec<_> = result.steps_of_type(StepType::Verification).collect();
        if !verifications.is_empty() {
            output.push_str(&format!("\n{}\n", "Verifications:".cyan().bold()));
            for step in verifications {
                let answer = step
                    .assistant_response
                    .as_deref()
                    .map(|a| preview(a, 100).to_string())
                    .unwrap_or_else(|| "(no response)".dimmed().to_string());
                output.push_str(&format!("  {} {}\n", step.step_id.yellow(), answer));
            }
        }

        output
    }

    /// Describe a parsed fixture (for `inspect`)
    pub fn format_test_case(case: &TestCase) -> String {
        let mut output = Self::header(&case.name);
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "System prompt:".cyan().bold(),
            if case.system_prompt.is_empty() {
                "(none)".dimmed().to_string()
            } else {
                preview(&case.system_prompt, 120).to_string()
            }
        ));
        output.push_str(&format!(
            "{} {} messages, {} checkpoints, {} verifications\n\n",
            "Steps:".cyan().bold(),
            case.count(StepType::Message),
            case.count(StepType::Checkpoint),
            case.count(StepType::Verification)
        ));

        for step in &case.steps {
            output.push_str(&Self::step_line(step));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(result: &FullExperimentResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    fn step_line(step: &TestStep) -> String {
        let id = match step.step_type() {
            StepType::Message => step.id().normal(),
            StepType::Checkpoint => step.id().yellow(),
            StepType::Verification => step.id().magenta(),
        };
        match step.failure_mode() {
            Some(mode) => format!(
                "  {:<8} {} {}\n",
                id,
                format!("({})", mode).dimmed(),
                preview(step.content(), 60)
            ),
            None => format!("  {:<8} {}\n", id, preview(step.content(), 60)),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

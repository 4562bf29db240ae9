//! Fixture parsing.
//!
//! A fixture is plain text divided into sections by `=== HEADER ===` lines:
//!
//! ```text
//! === SYSTEM PROMPT ===
//! You are a research assistant...
//!
//! === MESSAGE 1 ===
//! Here is study #1...
//!
//! === CHECKPOINT C2-1 (constraint drift) ===
//! Which studies are NOTABLE so far?
//!
//! === NOTE FOR AUTOTEST: send verifications at peak context ===
//! (dropped)
//!
//! === VERIFICATION V1-1 (early-context recall) ===
//! What was the sample size of study #1?
//! ```
//!
//! Headers that match none of the known forms are dropped without error so
//! fixtures can carry free-form annotations.

use super::step::{TestCase, TestStep};
use regex::Regex;
use std::sync::LazyLock;

static SECTION_DIVIDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^=== (.+) ===$").expect("divider pattern is valid"));
static MESSAGE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^MESSAGE (\d+)$").expect("message pattern is valid"));
static CHECKPOINT_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^CHECKPOINT (C[\w-]+) \((.+)\)$").expect("checkpoint pattern is valid")
});
static VERIFICATION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^VERIFICATION (V[\w-]+) \((.+)\)$").expect("verification pattern is valid")
});

const SYSTEM_PROMPT_HEADER: &str = "SYSTEM PROMPT";
const AUTOTEST_NOTE_PREFIX: &str = "NOTE FOR AUTOTEST";

/// Split raw text into `(header, trimmed body)` pairs.
///
/// Text before the first divider has no header and is discarded.
fn split_sections(raw: &str) -> Vec<(String, String)> {
    let mut sections = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in raw.lines() {
        if let Some(caps) = SECTION_DIVIDER.captures(line.trim()) {
            if let Some((header, body)) = current.take() {
                sections.push((header, body.join("\n").trim().to_string()));
            }
            current = Some((caps[1].to_string(), Vec::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push(line);
        }
    }
    if let Some((header, body)) = current {
        sections.push((header, body.join("\n").trim().to_string()));
    }

    sections
}

/// Parse a fixture into a [`TestCase`].
///
/// Steps keep their source order. The last `SYSTEM PROMPT` section wins if
/// several are present; a fixture without one has an empty system prompt.
pub fn parse_test_case(name: &str, raw: &str) -> TestCase {
    let mut system_prompt = String::new();
    let mut steps = Vec::new();

    for (header, body) in split_sections(raw) {
        if header == SYSTEM_PROMPT_HEADER {
            system_prompt = body;
        } else if header.starts_with(AUTOTEST_NOTE_PREFIX) {
            continue;
        } else if let Some(caps) = MESSAGE_HEADER.captures(&header) {
            steps.push(TestStep::message(format!("M{}", &caps[1]), body));
        } else if let Some(caps) = CHECKPOINT_HEADER.captures(&header) {
            steps.push(TestStep::checkpoint(&caps[1], body, &caps[2]));
        } else if let Some(caps) = VERIFICATION_HEADER.captures(&header) {
            steps.push(TestStep::verification(&caps[1], body, &caps[2]));
        }
    }

    TestCase::new(name, system_prompt, steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::step::StepType;

    const SHORT_FIXTURE: &str = "\
Preamble text that belongs to no section.

=== SYSTEM PROMPT ===
You are a research assistant.
Mark every study with effect size above 0.5 as NOTABLE.

=== MESSAGE 1 ===
Study #1: n=120, effect size 0.62.

=== MESSAGE 2 ===
Study #2: n=45, effect size 0.21.

=== MESSAGE 3 ===
Study #3: n=300, effect size 0.74.

=== VERIFICATION V1-1 (early-context recall) ===
What was the sample size of study #1?

=== VERIFICATION V1-2 (rule adherence) ===
Which studies are NOTABLE?

=== VERIFICATION V1-3 (arithmetic over context) ===
What is the total sample size?

=== VERIFICATION V1-4 (late-context recall) ===
What was the effect size of study #3?
";

    #[test]
    fn short_fixture_has_seven_steps() {
        let case = parse_test_case("case_1_short", SHORT_FIXTURE);

        assert_eq!(case.name, "case_1_short");
        assert_eq!(case.steps.len(), 7);
        assert_eq!(case.steps[0].id(), "M1");
        assert_eq!(case.count(StepType::Message), 3);
        assert_eq!(case.count(StepType::Checkpoint), 0);
        assert_eq!(case.count(StepType::Verification), 4);

        let ids: Vec<_> = case.verifications().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["V1-1", "V1-2", "V1-3", "V1-4"]);
    }

    #[test]
    fn system_prompt_is_captured_and_trimmed() {
        let case = parse_test_case("case_1_short", SHORT_FIXTURE);
        assert!(case.system_prompt.starts_with("You are a research assistant."));
        assert!(case.system_prompt.ends_with("as NOTABLE."));
        assert!(case.system_prompt.contains("NOTABLE"));
    }

    #[test]
    fn bodies_are_trimmed_and_multiline() {
        let raw = "=== MESSAGE 7 ===\n\n  line one\nline two  \n\n";
        let case = parse_test_case("x", raw);
        assert_eq!(case.steps[0].id(), "M7");
        assert_eq!(case.steps[0].content(), "line one\nline two");
    }

    #[test]
    fn checkpoint_and_verification_carry_failure_mode() {
        let raw = "\
=== CHECKPOINT C2-1 (constraint drift) ===
List NOTABLE studies.
=== VERIFICATION V2-3 (early recall) ===
Sample size of study 1?
";
        let case = parse_test_case("case_2_long", raw);
        assert_eq!(
            case.steps[0],
            TestStep::checkpoint("C2-1", "List NOTABLE studies.", "constraint drift")
        );
        assert_eq!(
            case.steps[1],
            TestStep::verification("V2-3", "Sample size of study 1?", "early recall")
        );
    }

    #[test]
    fn autotest_notes_are_dropped() {
        let raw = "\
=== MESSAGE 1 ===
hello
=== NOTE FOR AUTOTEST: send all verifications at peak ===
NOTE FOR AUTOTEST body should never become a step
=== MESSAGE 2 ===
world
";
        let case = parse_test_case("case_3_overflow", raw);
        assert_eq!(case.steps.len(), 2);
        let all_content: String = case.steps.iter().map(|s| s.content()).collect();
        assert!(!all_content.contains("NOTE FOR AUTOTEST"));
    }

    #[test]
    fn unmatched_headers_are_ignored_without_halting() {
        let raw = "\
=== MESSAGE 1 ===
first
=== APPENDIX ===
ignored
=== CHECKPOINT X1 (bad id prefix) ===
ignored too
=== MESSAGE two ===
not numeric
=== VERIFICATION V1-1 (recall) ===
kept
";
        let case = parse_test_case("tolerant", raw);
        let ids: Vec<_> = case.steps.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["M1", "V1-1"]);
    }

    #[test]
    fn step_count_matches_recognized_headers() {
        let raw = "\
=== SYSTEM PROMPT ===
p
=== MESSAGE 1 ===
a
=== CHECKPOINT C1 (m) ===
b
=== NOTE FOR AUTOTEST ===
c
=== MESSAGE 2 ===
d
=== VERIFICATION V1 (m) ===
e
";
        let case = parse_test_case("count", raw);
        let expected = raw
            .lines()
            .filter(|l| {
                l.starts_with("=== MESSAGE")
                    || l.starts_with("=== CHECKPOINT")
                    || l.starts_with("=== VERIFICATION")
            })
            .count();
        assert_eq!(case.steps.len(), expected);
    }

    #[test]
    fn indented_divider_is_recognized() {
        let raw = "   === MESSAGE 1 ===   \nbody\n";
        let case = parse_test_case("x", raw);
        assert_eq!(case.steps.len(), 1);
        assert_eq!(case.steps[0].content(), "body");
    }

    #[test]
    fn empty_input_yields_empty_case() {
        let case = parse_test_case("empty", "");
        assert!(case.steps.is_empty());
        assert!(case.system_prompt.is_empty());
    }
}

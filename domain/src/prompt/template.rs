//! Prompt templates for the analysis endpoints

use crate::analysis::{TemperatureSample, TierAnswer};

/// Templates for prompts the relay sends on its own behalf
pub struct PromptTemplate;

impl PromptTemplate {
    /// Ask the model to compare tier answers in a few bullets.
    ///
    /// The reply is expected to be a bare JSON object `{"comparison": "..."}`.
    pub fn model_comparison(answers: &[TierAnswer]) -> String {
        let results = answers
            .iter()
            .map(|a| {
                format!(
                    "=== {} ===\nResponse time: {}ms\nTokens: {}\nCost: ${:.6}\nContent: {}",
                    a.model_label, a.response_time_ms, a.total_tokens, a.estimated_cost, a.content
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            r#"You are an AI assistant comparing different LLM model tiers.
Below are responses from {count} model configurations to the same prompt.

{results}

Write a very short comparison (2-3 bullet points, 1 sentence each) about the key differences between these models in terms of quality, speed, and resource efficiency.

Respond in this exact JSON format (no markdown, no code blocks):
{{"comparison":"• bullet1\n• bullet2\n• bullet3"}}"#,
            count = answers.len(),
            results = results
        )
    }

    /// Ask the model to compare answers sampled at different temperatures.
    ///
    /// The reply is expected to be a bare JSON object with `comparison` and
    /// one `recommendations` entry per sampled temperature.
    pub fn temperature_analysis(samples: &[TemperatureSample]) -> String {
        let results = samples
            .iter()
            .map(|s| format!("=== Temperature {} ===\n{}", s.temperature, s.content))
            .collect::<Vec<_>>()
            .join("\n\n");

        let temperatures = samples
            .iter()
            .map(|s| s.temperature.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        let shape = samples
            .iter()
            .map(|s| format!(r#"{{"temperature":{:?},"bestFor":"..."}}"#, s.temperature))
            .collect::<Vec<_>>()
            .join(",");

        format!(
            r#"You are an AI assistant analyzing the effect of the temperature parameter on LLM outputs.
Below are {count} responses to the same prompt, generated with different temperature values.

{results}

Tasks:
1. Compare these {count} responses by: accuracy, creativity, and diversity. Write a brief comparison (3-5 sentences).
2. For each temperature ({temperatures}), write 1-2 sentences about which software development tasks it's best suited for.

Respond in this exact JSON format (no markdown, no code blocks):
{{"comparison":"...","recommendations":[{shape}]}}"#,
            count = samples.len(),
            results = results,
            temperatures = temperatures,
            shape = shape
        )
    }
}

//! Wire vocabulary for the two streaming endpoints.
//!
//! - [`RelayChunk`] — one event of the single-model token relay
//!   (`{"content": ...}` or `{"error": ...}`, terminated by `[DONE]`)
//! - [`StreamEvent`] — one event of the three-tier comparison stream,
//!   discriminated by a `type` field
//! - [`ModelMetrics`] — timing, token, and cost figures for one tier

use serde::{Deserialize, Serialize};

/// An event relayed from a single upstream completion stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelayChunk {
    /// An incremental piece of model output.
    Content { content: String },
    /// A terminal failure (upstream status or transport error).
    Error { error: String },
}

impl RelayChunk {
    pub fn content(content: impl Into<String>) -> Self {
        RelayChunk::Content {
            content: content.into(),
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        RelayChunk::Error {
            error: error.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RelayChunk::Error { .. })
    }
}

/// Per-tier measurements reported after a successful comparison call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetrics {
    pub model_id: String,
    pub model_label: String,
    pub response_time_ms: u64,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    pub estimated_cost: f64,
}

/// An event in the three-tier comparison stream.
///
/// Serialized with an internal `type` tag:
///
/// ```
/// use relay_domain::StreamEvent;
///
/// let json = serde_json::to_string(&StreamEvent::Done).unwrap();
/// assert_eq!(json, r#"{"type":"done"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// A tier has been launched. Emitted for every tier before any result.
    ModelStart { model: String, label: String },
    /// A tier's full response text.
    ModelResult {
        index: usize,
        label: String,
        content: String,
    },
    /// Measurements for the tier at `index`, following its `ModelResult`.
    Metrics { index: usize, data: ModelMetrics },
    /// All tiers have reported.
    Done,
    /// A tier-scoped failure (message carries the tier label) or a
    /// top-level failure replacing `Done`.
    Error { message: String },
}

impl StreamEvent {
    /// Returns true if this event ends the stream.
    ///
    /// Tier-scoped errors are not distinguishable from top-level ones on the
    /// wire, so only `Done` is treated as terminal here; the aggregator
    /// decides when a top-level error ends the stream.
    pub fn is_done(&self) -> bool {
        matches!(self, StreamEvent::Done)
    }

    /// The tier index this event refers to, if any.
    pub fn index(&self) -> Option<usize> {
        match self {
            StreamEvent::ModelResult { index, .. } | StreamEvent::Metrics { index, .. } => {
                Some(*index)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sse::{SseData, decode, encode};

    fn sample_metrics() -> ModelMetrics {
        ModelMetrics {
            model_id: "deepseek-chat".to_string(),
            model_label: "Medium (chat, full)".to_string(),
            response_time_ms: 1234,
            prompt_tokens: 12,
            completion_tokens: 80,
            total_tokens: 92,
            estimated_cost: 0.25,
        }
    }

    fn all_variants() -> Vec<StreamEvent> {
        vec![
            StreamEvent::ModelStart {
                model: "deepseek-chat".to_string(),
                label: "Weak (chat, 100 tokens)".to_string(),
            },
            StreamEvent::ModelResult {
                index: 2,
                label: "Strong (reasoner)".to_string(),
                content: "line one\nline \"two\" \\ end".to_string(),
            },
            StreamEvent::Metrics {
                index: 1,
                data: sample_metrics(),
            },
            StreamEvent::Done,
            StreamEvent::Error {
                message: "Weak (chat, 100 tokens): timeout".to_string(),
            },
        ]
    }

    #[test]
    fn stream_event_sse_round_trip() {
        for event in all_variants() {
            let line = encode(&event);
            let decoded: Option<SseData<StreamEvent>> = decode(line.trim_end());
            assert_eq!(decoded, Some(SseData::Event(event)));
        }
    }

    #[test]
    fn model_start_wire_shape() {
        let event = StreamEvent::ModelStart {
            model: "deepseek-reasoner".to_string(),
            label: "Strong (reasoner)".to_string(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "model_start");
        assert_eq!(value["model"], "deepseek-reasoner");
        assert_eq!(value["label"], "Strong (reasoner)");
    }

    #[test]
    fn metrics_wire_shape_uses_camel_case() {
        let event = StreamEvent::Metrics {
            index: 0,
            data: sample_metrics(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "metrics");
        assert_eq!(value["index"], 0);
        assert_eq!(value["data"]["modelId"], "deepseek-chat");
        assert_eq!(value["data"]["responseTimeMs"], 1234);
        assert_eq!(value["data"]["promptTokens"], 12);
        assert_eq!(value["data"]["estimatedCost"], 0.25);
    }

    #[test]
    fn index_accessor() {
        assert_eq!(
            StreamEvent::Metrics {
                index: 1,
                data: sample_metrics()
            }
            .index(),
            Some(1)
        );
        assert_eq!(StreamEvent::Done.index(), None);
        assert!(StreamEvent::Done.is_done());
    }

    #[test]
    fn relay_chunk_wire_shapes() {
        assert_eq!(
            encode(&RelayChunk::content("tok")),
            "data: {\"content\":\"tok\"}\n\n"
        );
        assert_eq!(
            encode(&RelayChunk::error("boom")),
            "data: {\"error\":\"boom\"}\n\n"
        );
    }

    #[test]
    fn relay_chunk_round_trip() {
        for chunk in [RelayChunk::content("a\"b"), RelayChunk::error("x\ny")] {
            let line = encode(&chunk);
            let decoded: Option<SseData<RelayChunk>> = decode(line.trim_end());
            assert_eq!(decoded, Some(SseData::Event(chunk)));
        }
    }

    #[test]
    fn relay_chunk_is_error() {
        assert!(RelayChunk::error("x").is_error());
        assert!(!RelayChunk::content("x").is_error());
    }
}

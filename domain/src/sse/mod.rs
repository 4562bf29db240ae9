//! Server-sent event framing.
//!
//! Every stream path in the relay speaks the same minimal subset of SSE:
//!
//! ```text
//! data: {"content":"Hel"}\n\n
//! data: {"content":"lo"}\n\n
//! data: [DONE]\n\n
//! ```
//!
//! [`encode`] produces one frame from any serializable event, and
//! [`decode`] reads one line back. Decoding is deliberately lenient: lines
//! without the `data:` prefix and payloads that are not valid JSON for the
//! requested type yield `None` so a garbled upstream chunk never halts the
//! consumer.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Field prefix of an SSE data line.
pub const DATA_PREFIX: &str = "data:";

/// End-of-stream sentinel used by OpenAI-compatible APIs.
pub const DONE_SENTINEL: &str = "[DONE]";

/// A decoded SSE data line.
#[derive(Debug, Clone, PartialEq)]
pub enum SseData<T> {
    /// A JSON payload that parsed as `T`.
    Event(T),
    /// The `[DONE]` sentinel.
    Done,
}

impl<T> SseData<T> {
    /// Returns the payload if this is an event.
    pub fn into_event(self) -> Option<T> {
        match self {
            SseData::Event(event) => Some(event),
            SseData::Done => None,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, SseData::Done)
    }
}

fn frame(payload: &str) -> String {
    format!("{} {}\n\n", DATA_PREFIX, payload)
}

/// Encode an event as a single `data: <json>\n\n` frame.
///
/// JSON escaping (quotes, backslashes, newlines, control characters) is
/// handled by the serializer. If the value cannot be serialized, an
/// `{"error": ...}` frame is produced instead so the stream still carries a
/// well-formed line.
pub fn encode<T: Serialize>(event: &T) -> String {
    match serde_json::to_string(event) {
        Ok(json) => frame(&json),
        Err(e) => frame(&serde_json::json!({ "error": e.to_string() }).to_string()),
    }
}

/// Encode the `data: [DONE]\n\n` terminator.
pub fn encode_done() -> String {
    frame(DONE_SENTINEL)
}

/// Decode one SSE line.
///
/// Returns `None` for comments, blank separators, other SSE fields
/// (`event:`, `id:`), and malformed payloads.
pub fn decode<T: DeserializeOwned>(line: &str) -> Option<SseData<T>> {
    let payload = line.trim_end().strip_prefix(DATA_PREFIX)?.trim();
    if payload == DONE_SENTINEL {
        return Some(SseData::Done);
    }
    serde_json::from_str(payload).ok().map(SseData::Event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Chunk {
        content: String,
    }

    #[test]
    fn encode_wraps_json_in_data_frame() {
        let line = encode(&Chunk {
            content: "hi".to_string(),
        });
        assert_eq!(line, "data: {\"content\":\"hi\"}\n\n");
    }

    #[test]
    fn encode_escapes_quotes_backslashes_and_newlines() {
        let line = encode(&Chunk {
            content: "say \"hi\"\\\nbye".to_string(),
        });
        assert_eq!(line, "data: {\"content\":\"say \\\"hi\\\"\\\\\\nbye\"}\n\n");
        // Exactly one frame terminator, no raw newline inside the payload
        assert_eq!(line.matches('\n').count(), 2);
    }

    #[test]
    fn encode_done_is_sentinel_frame() {
        assert_eq!(encode_done(), "data: [DONE]\n\n");
    }

    #[test]
    fn decode_event() {
        let decoded: Option<SseData<Chunk>> = decode("data: {\"content\":\"tok\"}");
        assert_eq!(
            decoded,
            Some(SseData::Event(Chunk {
                content: "tok".to_string()
            }))
        );
    }

    #[test]
    fn decode_without_space_after_prefix() {
        let decoded: Option<SseData<Chunk>> = decode("data:{\"content\":\"x\"}");
        assert!(matches!(decoded, Some(SseData::Event(_))));
    }

    #[test]
    fn decode_done_sentinel() {
        let decoded: Option<SseData<Chunk>> = decode("data: [DONE]");
        assert_eq!(decoded, Some(SseData::Done));
        assert!(decoded.unwrap().is_done());
    }

    #[test]
    fn decode_ignores_non_data_lines() {
        assert!(decode::<Chunk>("").is_none());
        assert!(decode::<Chunk>(": keep-alive").is_none());
        assert!(decode::<Chunk>("event: message").is_none());
        assert!(decode::<Chunk>("id: 42").is_none());
    }

    #[test]
    fn decode_skips_malformed_json() {
        assert!(decode::<Chunk>("data: {\"content\": \"unterminated").is_none());
        assert!(decode::<Chunk>("data: not json at all").is_none());
        // Valid JSON, wrong shape
        assert!(decode::<Chunk>("data: {\"other\": 1}").is_none());
    }

    #[test]
    fn decode_tolerates_carriage_return() {
        let decoded: Option<SseData<Chunk>> = decode("data: [DONE]\r");
        assert_eq!(decoded, Some(SseData::Done));
    }

    #[test]
    fn decode_skips_bad_lines_and_keeps_scanning() {
        let body = "data: {\"content\":\"a\"}\n\ndata: {broken\n\n: ping\ndata: {\"content\":\"b\"}\n\ndata: [DONE]\n\n";
        let events: Vec<_> = body.lines().filter_map(decode::<Chunk>).collect();
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[0],
            SseData::Event(Chunk {
                content: "a".to_string()
            })
        );
        assert_eq!(
            events[1],
            SseData::Event(Chunk {
                content: "b".to_string()
            })
        );
        assert_eq!(events[2], SseData::Done);
    }

    #[test]
    fn into_event_on_done_is_none() {
        let done: SseData<Chunk> = SseData::Done;
        assert!(done.into_event().is_none());
    }
}

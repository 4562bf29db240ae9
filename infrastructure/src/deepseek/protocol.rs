//! Wire types of the `/chat/completions` endpoint.
//!
//! Only the fields the relay reads are modelled; everything else in the
//! upstream payloads is ignored on deserialization.

use relay_domain::{ConversationMessage, SseData, TokenUsage};
use serde::{Deserialize, Serialize};

/// Request body
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ConversationMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub stream: bool,
}

/// Non-streaming response body
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ResponseChoice>,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

impl ChatResponse {
    /// Content of the first choice, empty when there is none.
    pub fn into_content(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct ResponseChoice {
    pub message: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// One `data:` payload of a streaming response
#[derive(Debug, Deserialize)]
pub struct StreamChunk {
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
pub struct StreamChoice {
    #[serde(default)]
    pub delta: Delta,
}

#[derive(Debug, Default, Deserialize)]
pub struct Delta {
    /// `null` on role-only and reasoning chunks
    #[serde(default)]
    pub content: Option<String>,
}

/// Decode one upstream SSE line into a content delta.
///
/// Returns `None` for blank lines, comments, malformed payloads and chunks
/// whose first choice carries no content.
pub fn decode_delta(line: &str) -> Option<SseData<String>> {
    match relay_domain::decode::<StreamChunk>(line)? {
        SseData::Done => Some(SseData::Done),
        SseData::Event(chunk) => chunk
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
            .map(SseData::Event),
    }
}

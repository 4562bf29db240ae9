//! Completion gateway port
//!
//! Defines the interface for talking to an OpenAI-compatible chat completion
//! API, both as a single request/response and as a token stream.

use async_trait::async_trait;
use futures::stream::BoxStream;
use relay_domain::{ConversationMessage, SseData, TokenUsage};
use thiserror::Error;

/// Errors that can occur at the upstream boundary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Network failure or timeout; no HTTP response was received.
    #[error("{0}")]
    Transport(String),

    /// The upstream answered with a non-success status.
    #[error("Upstream API error: {status} - {body}")]
    Upstream { status: u16, body: String },

    /// A non-streaming body that is not a valid completion response.
    #[error("Invalid upstream response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// HTTP status of the failed call, or 0 when no response was received.
    pub fn http_status(&self) -> u16 {
        match self {
            GatewayError::Upstream { status, .. } => *status,
            GatewayError::Transport(_) => 0,
            GatewayError::Decode(_) => 200,
        }
    }
}

/// A chat completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ConversationMessage>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ConversationMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            max_tokens: None,
        }
    }

    /// A single user turn.
    pub fn prompt(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::new(model, vec![ConversationMessage::user(prompt)])
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// A successful non-streaming completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Text of the first choice; empty when the upstream returned none.
    pub content: String,
    pub usage: Option<TokenUsage>,
    pub http_status: u16,
}

/// Incremental content of a streaming completion.
///
/// `SseData::Event` carries one content delta, `SseData::Done` marks the
/// upstream end-of-stream sentinel.
pub type DeltaStream = BoxStream<'static, Result<SseData<String>, GatewayError>>;

/// Gateway for upstream completions
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Send a request and wait for the whole completion.
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, GatewayError>;

    /// Open a streaming completion.
    ///
    /// A non-success status is reported here, before any delta is yielded.
    /// Deltas without content are filtered out by the adapter.
    async fn open_stream(&self, request: &CompletionRequest) -> Result<DeltaStream, GatewayError>;
}

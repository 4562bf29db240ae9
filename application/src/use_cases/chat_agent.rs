//! Gateway-backed chat agent
//!
//! Adapts a [`CompletionGateway`] to the [`ChatAgent`] port used by the
//! experiment orchestrator.

use crate::ports::chat_agent::ChatAgent;
use crate::ports::llm_gateway::{CompletionGateway, CompletionRequest, GatewayError};
use async_trait::async_trait;
use relay_domain::{AgentReply, ConversationMessage};
use std::sync::Arc;
use tracing::debug;

/// Default temperature of experiment conversations.
pub const DEFAULT_AGENT_TEMPERATURE: f64 = 0.3;

/// Chat agent that prepends a fixed system prompt to every call
pub struct GatewayChatAgent<G: CompletionGateway + ?Sized + 'static> {
    gateway: Arc<G>,
    model: String,
    system_prompt: String,
    temperature: f64,
}

impl<G: CompletionGateway + ?Sized + 'static> GatewayChatAgent<G> {
    pub fn new(gateway: Arc<G>, model: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            gateway,
            model: model.into(),
            system_prompt: system_prompt.into(),
            temperature: DEFAULT_AGENT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    fn request(&self, history: &[ConversationMessage]) -> CompletionRequest {
        let mut messages = Vec::with_capacity(history.len() + 1);
        if !self.system_prompt.is_empty() {
            messages.push(ConversationMessage::system(&self.system_prompt));
        }
        messages.extend_from_slice(history);
        CompletionRequest::new(&self.model, messages).with_temperature(self.temperature)
    }
}

/// Error text recorded on a failed experiment step.
fn reply_error(error: &GatewayError) -> String {
    match error {
        GatewayError::Upstream { status, body } => {
            format!("Upstream error ({}): {}", status, body)
        }
        GatewayError::Transport(message) => format!("Network error: {}", message),
        GatewayError::Decode(message) => format!("Invalid response: {}", message),
    }
}

#[async_trait]
impl<G: CompletionGateway + ?Sized + 'static> ChatAgent for GatewayChatAgent<G> {
    async fn chat(&self, history: &[ConversationMessage]) -> AgentReply {
        let request = self.request(history);
        debug!("Chat call with {} messages", request.messages.len());

        match self.gateway.complete(&request).await {
            Ok(completion) => {
                AgentReply::success(completion.content, completion.usage, completion.http_status)
            }
            Err(e) => AgentReply::failure(e.http_status(), reply_error(&e)),
        }
    }
}

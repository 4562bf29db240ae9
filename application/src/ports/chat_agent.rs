//! Chat agent port
//!
//! The experiment orchestrator talks to the model through this port. Unlike
//! [`CompletionGateway`](super::llm_gateway::CompletionGateway) it never
//! returns an error: failures come back inside the [`AgentReply`].

use async_trait::async_trait;
use relay_domain::{AgentReply, ConversationMessage};

/// Single-call chat agent driven by the experiment orchestrator
#[async_trait]
pub trait ChatAgent: Send + Sync {
    /// Send the whole history and return one reply.
    ///
    /// `history` excludes the system prompt; the agent adds its own.
    async fn chat(&self, history: &[ConversationMessage]) -> AgentReply;
}

//! OpenAI-compatible upstream adapter
//!
//! Implements [`CompletionGateway`](relay_application::CompletionGateway)
//! over HTTPS with `reqwest`. The default target is the DeepSeek chat
//! completion API; any server speaking the same wire format works.

pub mod gateway;
pub mod protocol;

pub use gateway::DeepSeekGateway;

//! Relay Stream use case
//!
//! Forwards the token stream of one upstream completion to a client as
//! [`RelayChunk`]s, always ending with either the done sentinel or a single
//! error chunk.

use crate::ports::llm_gateway::{CompletionGateway, CompletionRequest, GatewayError};
use futures::StreamExt;
use relay_domain::{RelayChunk, SseData};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Placeholder content when the upstream returned no choice.
pub const NO_RESPONSE: &str = "No response";

/// Input for the single-model relay
#[derive(Debug, Clone, PartialEq)]
pub struct RelayInput {
    pub prompt: String,
    pub temperature: f64,
}

impl RelayInput {
    pub fn new(prompt: impl Into<String>, temperature: f64) -> Self {
        Self {
            prompt: prompt.into(),
            temperature,
        }
    }
}

/// Use case for relaying one streaming completion
pub struct RelayStreamUseCase<G: CompletionGateway + ?Sized + 'static> {
    gateway: Arc<G>,
    model: String,
}

impl<G: CompletionGateway + ?Sized + 'static> RelayStreamUseCase<G> {
    pub fn new(gateway: Arc<G>, model: impl Into<String>) -> Self {
        Self {
            gateway,
            model: model.into(),
        }
    }

    /// Non-streaming variant: wait for the whole completion.
    ///
    /// An empty first choice is reported as `"No response"`.
    pub async fn complete(&self, input: RelayInput) -> Result<String, GatewayError> {
        let request = CompletionRequest::prompt(&self.model, input.prompt)
            .with_temperature(input.temperature);
        let completion = self.gateway.complete(&request).await?;
        if completion.content.is_empty() {
            Ok(NO_RESPONSE.to_string())
        } else {
            Ok(completion.content)
        }
    }

    /// Relay the stream into `tx` until it ends, fails, or the receiver is
    /// dropped.
    ///
    /// Every run that is not cancelled ends with exactly one terminal item:
    /// `SseData::Done` or a `RelayChunk::Error`.
    pub async fn execute(&self, input: RelayInput, tx: mpsc::Sender<SseData<RelayChunk>>) {
        let request = CompletionRequest::prompt(&self.model, input.prompt)
            .with_temperature(input.temperature);

        info!(
            "Relaying stream from {} (temperature {})",
            self.model, input.temperature
        );

        let mut deltas = match self.gateway.open_stream(&request).await {
            Ok(deltas) => deltas,
            Err(e) => {
                warn!("Upstream stream failed to open: {}", e);
                let _ = tx.send(SseData::Event(RelayChunk::error(e.to_string()))).await;
                return;
            }
        };

        let mut forwarded = 0usize;
        while let Some(item) = deltas.next().await {
            let out = match item {
                Ok(SseData::Event(content)) => SseData::Event(RelayChunk::content(content)),
                Ok(SseData::Done) => break,
                Err(e) => {
                    warn!("Upstream stream failed after {} chunks: {}", forwarded, e);
                    let _ = tx.send(SseData::Event(RelayChunk::error(e.to_string()))).await;
                    return;
                }
            };
            if tx.send(out).await.is_err() {
                debug!("Client disconnected after {} chunks", forwarded);
                return;
            }
            forwarded += 1;
        }

        debug!("Relay finished after {} chunks", forwarded);
        let _ = tx.send(SseData::Done).await;
    }
}

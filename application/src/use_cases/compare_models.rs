//! Compare Models use case
//!
//! Sends one prompt to every configured tier concurrently and streams
//! [`StreamEvent`]s as the tiers finish.

use crate::config::RelayParams;
use crate::ports::llm_gateway::{Completion, CompletionGateway, CompletionRequest, GatewayError};
use futures::FutureExt;
use relay_domain::{ModelMetrics, ModelTierConfig, StreamEvent};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Outcome of a single tier task
struct TierOutcome {
    index: usize,
    tier: ModelTierConfig,
    elapsed: Duration,
    result: Result<Completion, GatewayError>,
}

/// Use case for the three-tier fan-out
pub struct CompareModelsUseCase<G: CompletionGateway + ?Sized + 'static> {
    gateway: Arc<G>,
    params: RelayParams,
}

impl<G: CompletionGateway + ?Sized + 'static> CompareModelsUseCase<G> {
    pub fn new(gateway: Arc<G>, params: RelayParams) -> Self {
        Self { gateway, params }
    }

    /// Run every tier and stream events into `tx`.
    ///
    /// All `ModelStart` events are sent before any tier is launched. Tier
    /// outcomes are then emitted in completion order; a failing tier yields
    /// one `Error` and never affects the others, even when the call panics.
    /// The stream ends with `Done` once every tier has reported, or with a
    /// top-level `Error` if a tier task vanished without reporting.
    pub async fn execute(&self, prompt: &str, tx: mpsc::Sender<StreamEvent>) {
        let tiers = &self.params.tiers;
        info!("Comparing {} model tiers", tiers.len());

        for tier in tiers {
            let start = StreamEvent::ModelStart {
                model: tier.id.clone(),
                label: tier.label.clone(),
            };
            if tx.send(start).await.is_err() {
                debug!("Client disconnected before tiers were launched");
                return;
            }
        }

        let (done_tx, mut done_rx) = mpsc::channel::<TierOutcome>(tiers.len().max(1));

        for (index, tier) in tiers.iter().enumerate() {
            let gateway = Arc::clone(&self.gateway);
            let tier = tier.clone();
            let done_tx = done_tx.clone();
            let request = CompletionRequest::prompt(tier.id.clone(), prompt)
                .with_temperature(self.params.compare_temperature)
                .with_max_tokens(tier.max_tokens);

            tokio::spawn(async move {
                let started = Instant::now();
                // A panicking call is reported as this tier's failure.
                let result = AssertUnwindSafe(gateway.complete(&request))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|_| {
                        Err(GatewayError::Transport("tier task panicked".to_string()))
                    });
                let outcome = TierOutcome {
                    index,
                    tier,
                    elapsed: started.elapsed(),
                    result,
                };
                // The consumer may be gone if the client disconnected.
                let _ = done_tx.send(outcome).await;
            });
        }
        drop(done_tx);

        let mut reported = 0usize;
        while let Some(outcome) = done_rx.recv().await {
            reported += 1;
            for event in self.outcome_events(outcome) {
                if tx.send(event).await.is_err() {
                    debug!("Client disconnected after {} tier outcomes", reported);
                    return;
                }
            }
        }

        let last = if reported == tiers.len() {
            StreamEvent::Done
        } else {
            warn!("Only {} of {} tiers reported", reported, tiers.len());
            StreamEvent::Error {
                message: format!(
                    "Comparison incomplete: {} of {} models reported",
                    reported,
                    tiers.len()
                ),
            }
        };
        let _ = tx.send(last).await;
    }

    fn outcome_events(&self, outcome: TierOutcome) -> Vec<StreamEvent> {
        let TierOutcome {
            index,
            tier,
            elapsed,
            result,
        } = outcome;

        match result {
            Ok(completion) => {
                info!(
                    "Tier {} ({}) responded in {}ms",
                    index,
                    tier.label,
                    elapsed.as_millis()
                );
                let usage = completion.usage.unwrap_or_default();
                let metrics = ModelMetrics {
                    model_id: tier.id.clone(),
                    model_label: tier.label.clone(),
                    response_time_ms: elapsed.as_millis() as u64,
                    prompt_tokens: usage.prompt_tokens,
                    completion_tokens: usage.completion_tokens,
                    total_tokens: usage.total_tokens,
                    estimated_cost: self
                        .params
                        .pricing
                        .estimate_cost(usage.prompt_tokens, usage.completion_tokens),
                };
                vec![
                    StreamEvent::ModelResult {
                        index,
                        label: tier.label,
                        content: completion.content,
                    },
                    StreamEvent::Metrics {
                        index,
                        data: metrics,
                    },
                ]
            }
            Err(e) => {
                warn!("Tier {} ({}) failed: {}", index, tier.label, e);
                vec![StreamEvent::Error {
                    message: format!("{}: {}", tier.label, e),
                }]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::DeltaStream;
    use async_trait::async_trait;
    use relay_domain::{Pricing, TokenUsage};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Scripted per-label behavior: delay then outcome
    #[derive(Clone)]
    enum TierScript {
        Ok { delay_ms: u64, content: &'static str, prompt: u64, completion: u64 },
        Fail { delay_ms: u64, message: &'static str },
        Panic,
    }

    /// Gateway keyed by `max_tokens` so tiers sharing a model id stay distinct
    struct TierGateway {
        scripts: HashMap<Option<u32>, TierScript>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    #[async_trait]
    impl CompletionGateway for TierGateway {
        async fn complete(&self, request: &CompletionRequest) -> Result<Completion, GatewayError> {
            self.requests.lock().unwrap().push(request.clone());
            match self.scripts.get(&request.max_tokens).cloned() {
                Some(TierScript::Ok {
                    delay_ms,
                    content,
                    prompt,
                    completion,
                }) => {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    Ok(Completion {
                        content: content.to_string(),
                        usage: Some(TokenUsage::new(prompt, completion)),
                        http_status: 200,
                    })
                }
                Some(TierScript::Fail { delay_ms, message }) => {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    Err(GatewayError::Transport(message.to_string()))
                }
                Some(TierScript::Panic) => panic!("tier task crashed"),
                None => Err(GatewayError::Transport("unscripted".to_string())),
            }
        }

        async fn open_stream(
            &self,
            _request: &CompletionRequest,
        ) -> Result<DeltaStream, GatewayError> {
            Err(GatewayError::Transport("not scripted".to_string()))
        }
    }

    fn tiers() -> Vec<ModelTierConfig> {
        vec![
            ModelTierConfig::new("deepseek-chat", "Weak").with_max_tokens(1),
            ModelTierConfig::new("deepseek-chat", "Medium").with_max_tokens(2),
            ModelTierConfig::new("deepseek-reasoner", "Strong").with_max_tokens(3),
        ]
    }

    async fn run(scripts: Vec<(u32, TierScript)>) -> (Vec<StreamEvent>, Vec<CompletionRequest>) {
        let gateway = Arc::new(TierGateway {
            scripts: scripts.into_iter().map(|(k, v)| (Some(k), v)).collect(),
            requests: Mutex::new(Vec::new()),
        });
        let params = RelayParams::default()
            .with_tiers(tiers())
            .with_pricing(Pricing::new(1.0, 2.0));
        let use_case = CompareModelsUseCase::new(Arc::clone(&gateway), params);
        let (tx, mut rx) = mpsc::channel(32);
        use_case.execute("Explain recursion", tx).await;

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        let requests = gateway.requests.lock().unwrap().clone();
        (events, requests)
    }

    fn ok(delay_ms: u64, content: &'static str) -> TierScript {
        TierScript::Ok {
            delay_ms,
            content,
            prompt: 1_000_000,
            completion: 500_000,
        }
    }

    fn first_result_position(events: &[StreamEvent]) -> usize {
        events
            .iter()
            .position(|e| !matches!(e, StreamEvent::ModelStart { .. }))
            .unwrap()
    }

    #[tokio::test]
    async fn test_starts_precede_results_for_any_completion_order() {
        for delays in [[30, 10, 20], [10, 20, 30], [20, 30, 10]] {
            let (events, _) = run(vec![
                (1, ok(delays[0], "weak")),
                (2, ok(delays[1], "medium")),
                (3, ok(delays[2], "strong")),
            ])
            .await;

            let labels: Vec<_> = events[..3]
                .iter()
                .map(|e| match e {
                    StreamEvent::ModelStart { label, .. } => label.as_str(),
                    other => panic!("expected model_start, got {:?}", other),
                })
                .collect();
            assert_eq!(labels, vec!["Weak", "Medium", "Strong"]);
            assert_eq!(first_result_position(&events), 3);
            assert_eq!(events.len(), 3 + 3 * 2 + 1);
            assert_eq!(events.last(), Some(&StreamEvent::Done));
        }
    }

    #[tokio::test]
    async fn test_results_arrive_in_completion_order() {
        let (events, _) = run(vec![
            (1, ok(60, "weak")),
            (2, ok(5, "medium")),
            (3, ok(30, "strong")),
        ])
        .await;

        let order: Vec<usize> = events
            .iter()
            .filter(|e| matches!(e, StreamEvent::ModelResult { .. }))
            .filter_map(|e| e.index())
            .collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[tokio::test]
    async fn test_result_is_followed_by_its_metrics() {
        let (events, _) = run(vec![
            (1, ok(1, "weak")),
            (2, ok(1, "medium")),
            (3, ok(1, "strong")),
        ])
        .await;

        for (i, event) in events.iter().enumerate() {
            if let StreamEvent::ModelResult { index, .. } = event {
                match &events[i + 1] {
                    StreamEvent::Metrics { index: m, data } => {
                        assert_eq!(m, index);
                        assert_eq!(data.prompt_tokens, 1_000_000);
                        assert_eq!(data.total_tokens, 1_500_000);
                        // 1.0 * 1 + 2.0 * 0.5
                        assert!((data.estimated_cost - 2.0).abs() < 1e-9);
                    }
                    other => panic!("expected metrics, got {:?}", other),
                }
            }
        }
    }

    #[tokio::test]
    async fn test_failing_tier_is_isolated() {
        let (events, _) = run(vec![
            (1, ok(20, "weak")),
            (
                2,
                TierScript::Fail {
                    delay_ms: 1,
                    message: "timeout",
                },
            ),
            (3, ok(10, "strong")),
        ])
        .await;

        let errors: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                StreamEvent::Error { message } => Some(message.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(errors, vec!["Medium: timeout"]);

        let results = events
            .iter()
            .filter(|e| matches!(e, StreamEvent::ModelResult { .. }))
            .count();
        let metrics = events
            .iter()
            .filter(|e| matches!(e, StreamEvent::Metrics { .. }))
            .count();
        assert_eq!(results, 2);
        assert_eq!(metrics, 2);
        assert_eq!(events.last(), Some(&StreamEvent::Done));
    }

    #[tokio::test]
    async fn test_panicking_tier_reports_its_own_error() {
        let (events, _) = run(vec![
            (1, ok(1, "weak")),
            (2, TierScript::Panic),
            (3, ok(1, "strong")),
        ])
        .await;

        let errors: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                StreamEvent::Error { message } => Some(message.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Medium"));

        let mut answered: Vec<usize> = events
            .iter()
            .filter(|e| matches!(e, StreamEvent::ModelResult { .. }))
            .filter_map(|e| e.index())
            .collect();
        answered.sort();
        assert_eq!(answered, vec![0, 2]);
        let metrics = events
            .iter()
            .filter(|e| matches!(e, StreamEvent::Metrics { .. }))
            .count();
        assert_eq!(metrics, 2);
        assert_eq!(events.last(), Some(&StreamEvent::Done));
    }

    #[tokio::test]
    async fn test_requests_use_tier_model_and_limits() {
        let (_, requests) = run(vec![
            (1, ok(1, "weak")),
            (2, ok(1, "medium")),
            (3, ok(1, "strong")),
        ])
        .await;

        assert_eq!(requests.len(), 3);
        for request in &requests {
            assert_eq!(request.temperature, Some(0.7));
            assert_eq!(request.messages[0].content, "Explain recursion");
        }
        let strong = requests
            .iter()
            .find(|r| r.max_tokens == Some(3))
            .unwrap();
        assert_eq!(strong.model, "deepseek-reasoner");
    }
}

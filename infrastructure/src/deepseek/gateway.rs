//! `reqwest` implementation of the completion gateway

use super::protocol::{ChatRequest, ChatResponse, decode_delta};
use async_trait::async_trait;
use futures::StreamExt;
use relay_application::{
    Completion, CompletionGateway, CompletionRequest, DeltaStream, GatewayError,
};
use reqwest::{Client, Response};
use std::time::Duration;
use tokio::io::AsyncBufReadExt;
use tokio_util::io::StreamReader;
use tracing::{debug, warn};

/// Completion gateway for an OpenAI-compatible HTTP API
pub struct DeepSeekGateway {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl DeepSeekGateway {
    /// Build a gateway for `base_url` (e.g. `https://api.deepseek.com`).
    ///
    /// `request_timeout` bounds the whole call including a streamed body.
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(
        &self,
        request: &CompletionRequest,
        stream: bool,
    ) -> Result<Response, GatewayError> {
        let body = ChatRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream,
        };

        debug!(
            "POST {} model={} messages={} stream={}",
            self.endpoint,
            request.model,
            request.messages.len(),
            stream
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Upstream returned {}: {}", status.as_u16(), body);
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl CompletionGateway for DeepSeekGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, GatewayError> {
        let response = self.send(request, false).await?;
        let http_status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| GatewayError::Decode(e.to_string()))?;
        let usage = parsed.usage;

        Ok(Completion {
            content: parsed.into_content(),
            usage,
            http_status,
        })
    }

    async fn open_stream(&self, request: &CompletionRequest) -> Result<DeltaStream, GatewayError> {
        let response = self.send(request, true).await?;

        let bytes = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(std::io::Error::other))
            .boxed();
        let lines = StreamReader::new(bytes).lines();

        // The line reader is dropped after the first read error.
        let deltas = futures::stream::unfold(Some(lines), |state| async move {
            let mut lines = state?;
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if let Some(delta) = decode_delta(&line) {
                            return Some((Ok(delta), Some(lines)));
                        }
                    }
                    Ok(None) => return None,
                    Err(e) => return Some((Err(GatewayError::Transport(e.to_string())), None)),
                }
            }
        });

        Ok(deltas.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use relay_domain::{ConversationMessage, SseData};
    use serde_json::json;

    fn gateway(url: &str) -> DeepSeekGateway {
        DeepSeekGateway::new(
            url,
            "test-key",
            Duration::from_secs(5),
            Duration::from_secs(1),
        )
        .unwrap()
    }

    fn request() -> CompletionRequest {
        CompletionRequest::prompt("deepseek-chat", "Tell me a story").with_temperature(0.7)
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let gateway = gateway("https://api.deepseek.com/");
        assert_eq!(gateway.endpoint(), "https://api.deepseek.com/chat/completions");
    }

    #[tokio::test]
    async fn test_complete_returns_content_and_usage() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(json!({
                "model": "deepseek-chat",
                "temperature": 0.7,
                "stream": false,
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "choices": [{"message": {"role": "assistant", "content": "Once upon a time"}}],
                    "usage": {"prompt_tokens": 8, "completion_tokens": 4, "total_tokens": 12}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let completion = gateway(&server.url()).complete(&request()).await.unwrap();

        assert_eq!(completion.content, "Once upon a time");
        assert_eq!(completion.usage.unwrap().total_tokens, 12);
        assert_eq!(completion.http_status, 200);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_sends_history_and_max_tokens() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::PartialJson(json!({
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "hi"}
                ],
                "max_tokens": 100,
            })))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"ok"}}]}"#)
            .create_async()
            .await;

        let request = CompletionRequest::new(
            "deepseek-chat",
            vec![
                ConversationMessage::system("be brief"),
                ConversationMessage::user("hi"),
            ],
        )
        .with_max_tokens(Some(100));
        let completion = gateway(&server.url()).complete(&request).await.unwrap();

        assert_eq!(completion.content, "ok");
        assert!(completion.usage.is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_maps_error_status() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body("Authentication Fails")
            .create_async()
            .await;

        let err = gateway(&server.url())
            .complete(&request())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            GatewayError::Upstream {
                status: 401,
                body: "Authentication Fails".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_complete_rejects_malformed_body() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create_async()
            .await;

        let err = gateway(&server.url())
            .complete(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let err = gateway("http://127.0.0.1:1")
            .complete(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
        assert_eq!(err.http_status(), 0);
    }

    #[tokio::test]
    async fn test_stream_yields_deltas_in_order() {
        let body = concat!(
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\",\"content\":null}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
            ": keep-alive\n\n",
            "data: {not json}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n",
            "data: [DONE]\n\n",
        );

        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::PartialJson(json!({"stream": true})))
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(body)
            .create_async()
            .await;

        let deltas: Vec<_> = gateway(&server.url())
            .open_stream(&request())
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(
            deltas,
            vec![
                Ok(SseData::Event("Hel".to_string())),
                Ok(SseData::Event("lo".to_string())),
                Ok(SseData::Done),
            ]
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_stream_without_sentinel_just_ends() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body("data: {\"choices\":[{\"delta\":{\"content\":\"only\"}}]}\n")
            .create_async()
            .await;

        let deltas: Vec<_> = gateway(&server.url())
            .open_stream(&request())
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(deltas, vec![Ok(SseData::Event("only".to_string()))]);
    }

    #[tokio::test]
    async fn test_stream_error_status_fails_to_open() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(503)
            .with_body("busy")
            .create_async()
            .await;

        let result = gateway(&server.url()).open_stream(&request()).await;
        match result {
            Err(err) => assert_eq!(err.to_string(), "Upstream API error: 503 - busy"),
            Ok(_) => panic!("expected an upstream error"),
        }
    }
}

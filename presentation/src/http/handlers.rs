//! Request handlers
//!
//! Streaming handlers spawn the use case on its own task and return the
//! receiving end of its channel as the response body right away.

use super::dto::{
    CompareAnalyzeRequest, CompareRequest, TemperatureAnalyzeRequest, TemperatureRequest,
    TemperatureResponse,
};
use super::sse::{CHANNEL_CAPACITY, event_stream};
use super::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use relay_application::{
    AnalyzeUseCase, CompareModelsUseCase, RelayInput, RelayStreamUseCase,
};
use relay_domain::{
    ModelComparison, SseData, StreamEvent, TemperatureAnalysis, encode, encode_done,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// `POST /stream/single`
pub async fn stream_single(
    State(state): State<AppState>,
    Json(request): Json<TemperatureRequest>,
) -> Response {
    info!("Stream request at temperature {}", request.temperature);

    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let use_case = RelayStreamUseCase::new(Arc::clone(&state.gateway), &state.params.model);
    tokio::spawn(async move {
        use_case
            .execute(RelayInput::new(request.prompt, request.temperature), tx)
            .await;
    });

    event_stream(rx, |item| match item {
        SseData::Event(chunk) => encode(&chunk),
        SseData::Done => encode_done(),
    })
}

/// `POST /stream/compare`
pub async fn stream_compare(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Response {
    info!("Comparison request across {} tiers", state.params.tiers.len());

    let (tx, rx) = mpsc::channel::<StreamEvent>(CHANNEL_CAPACITY);
    let use_case =
        CompareModelsUseCase::new(Arc::clone(&state.gateway), state.params.as_ref().clone());
    tokio::spawn(async move {
        use_case.execute(&request.prompt, tx).await;
    });

    event_stream(rx, |event| encode(&event))
}

/// `POST /completion`
pub async fn completion(
    State(state): State<AppState>,
    Json(request): Json<TemperatureRequest>,
) -> (StatusCode, Json<TemperatureResponse>) {
    let temperature = request.temperature;
    let use_case = RelayStreamUseCase::new(Arc::clone(&state.gateway), &state.params.model);

    match use_case
        .complete(RelayInput::new(request.prompt, temperature))
        .await
    {
        Ok(content) => (
            StatusCode::OK,
            Json(TemperatureResponse {
                temperature,
                content,
                error: None,
            }),
        ),
        Err(e) => {
            warn!("Completion failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(TemperatureResponse {
                    temperature,
                    content: String::new(),
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

/// `POST /compare/analyze`
pub async fn compare_analyze(
    State(state): State<AppState>,
    Json(request): Json<CompareAnalyzeRequest>,
) -> (StatusCode, Json<ModelComparison>) {
    match analyzer(&state).compare_models(&request.results).await {
        Ok(verdict) => (StatusCode::OK, Json(verdict)),
        Err(e) => {
            warn!("Model comparison analysis failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ModelComparison {
                    comparison: format!("Analysis failed: {}", e),
                }),
            )
        }
    }
}

/// `POST /completion/analyze`
pub async fn completion_analyze(
    State(state): State<AppState>,
    Json(request): Json<TemperatureAnalyzeRequest>,
) -> (StatusCode, Json<TemperatureAnalysis>) {
    match analyzer(&state).compare_temperatures(&request.results).await {
        Ok(analysis) => (StatusCode::OK, Json(analysis)),
        Err(e) => {
            warn!("Temperature analysis failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(TemperatureAnalysis::failed(format!("Analysis failed: {}", e))),
            )
        }
    }
}

/// `GET /health`
pub async fn health() -> &'static str {
    "ok"
}

fn analyzer(state: &AppState) -> AnalyzeUseCase<dyn relay_application::CompletionGateway> {
    AnalyzeUseCase::new(
        Arc::clone(&state.gateway),
        &state.params.model,
        state.params.analysis_temperature,
    )
}

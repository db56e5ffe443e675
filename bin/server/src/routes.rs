//! Axum route handlers for the HTTP API.

use crate::error::ApiError;
use crate::models::{
    EnhanceRequest, HealthResponse, ServiceInfo, SimilarityQuery, TextRequest, VerifyRequest,
};
use crate::state::AppState;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use chrono::{SecondsFormat, Utc};
use llm_inference_tasks::{
    EnhancementResult, Entities, SentimentResult, SimilarityResult, VerificationResult,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

const SERVICE_NAME: &str = "LLM Inference Service";
const PREVIEW_CHARS: usize = 50;

/// Every route, keyed by its short name.
pub const ENDPOINTS: [(&str, &str); 7] = [
    ("info", "/"),
    ("health", "/health"),
    ("entities", "/api/v1/entities"),
    ("sentiment", "/api/v1/sentiment"),
    ("similarity", "/api/v1/similarity"),
    ("enhance_entities", "/api/v1/enhance-entities"),
    ("verify", "/api/v1/verify"),
];

/// First 50 characters of `text`, with `...` appended when cut.
fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::Validation(rejection.body_text()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// `GET /` - service metadata and endpoint map.
pub async fn service_info() -> impl IntoResponse {
    Json(ServiceInfo {
        title: SERVICE_NAME.to_string(),
        description: "Entity extraction, sentiment, similarity, enhancement and verification \
                      backed by a local large language model."
            .to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: ENDPOINTS
            .iter()
            .map(|(name, path)| ((*name).to_string(), (*path).to_string()))
            .collect::<BTreeMap<_, _>>(),
    })
}

/// `GET /health` - liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        uptime: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /api/v1/entities` - named-entity extraction.
pub async fn extract_entities(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<Entities>, ApiError> {
    let request = body(payload)?;
    info!(text = %preview(&request.text), "Received text for entity extraction");

    let started = Instant::now();
    let entities = state
        .entities
        .extract(&request.text)
        .await
        .map_err(|e| ApiError::task_failed("Unable to extract entities", &e))?;

    info!(
        elapsed_secs = started.elapsed().as_secs_f64(),
        "Entity extraction completed"
    );
    Ok(Json(entities))
}

/// `POST /api/v1/sentiment` - sentiment analysis. Upstream failures answer neutral.
pub async fn analyze_sentiment(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<SentimentResult>, ApiError> {
    let request = body(payload)?;
    info!(text = %preview(&request.text), "Received text for sentiment analysis");

    let started = Instant::now();
    let result = state.sentiment.analyze(&request.text).await;

    info!(
        elapsed_secs = started.elapsed().as_secs_f64(),
        sentiment = ?result.sentiment,
        "Sentiment analysis completed"
    );
    Ok(Json(result))
}

/// `GET /api/v1/similarity` - semantic similarity of two texts.
pub async fn compute_similarity(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SimilarityQuery>, QueryRejection>,
) -> Result<Json<SimilarityResult>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    let (Some(text1), Some(text2), Some(entity_type)) = (
        non_empty(query.text1),
        non_empty(query.text2),
        non_empty(query.entity_type),
    ) else {
        return Err(ApiError::Validation(
            "Both text1 and text2, and entity_type query parameters are required".to_string(),
        ));
    };

    let started = Instant::now();
    let result = state
        .similarity
        .compare(&text1, &text2, &entity_type)
        .await
        .map_err(|e| ApiError::task_failed("Failed to compute similarity", &e))?;

    info!(
        elapsed_secs = started.elapsed().as_secs_f64(),
        entity_type = %entity_type,
        score = result.score,
        "Similarity computed"
    );
    Ok(Json(result))
}

/// `POST /api/v1/enhance-entities` - entity list clean-up.
pub async fn enhance_entities(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EnhanceRequest>, JsonRejection>,
) -> Result<Json<EnhancementResult>, ApiError> {
    let request = body(payload)?;
    info!(
        count = request.entities.len(),
        entity_type = %request.entity_type,
        "Received entities for enhancement"
    );

    let started = Instant::now();
    let result = state
        .enhancement
        .enhance(request.entities, &request.entity_type)
        .await
        .map_err(|e| ApiError::task_failed("Failed to enhance entities", &e))?;

    info!(
        elapsed_secs = started.elapsed().as_secs_f64(),
        removed = result.removed_count,
        "Entity enhancement completed"
    );
    Ok(Json(result))
}

/// `POST /api/v1/verify` - single entity verification.
pub async fn verify_entity(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<VerificationResult>, ApiError> {
    let request = body(payload)?;
    info!(
        entity = %preview(&request.entity),
        entity_type = %request.entity_type,
        "Received entity for verification"
    );

    let started = Instant::now();
    let result = state
        .verification
        .verify(&request.entity, &request.entity_type)
        .await
        .map_err(|e| ApiError::task_failed("Failed to verify entity", &e))?;

    info!(
        elapsed_secs = started.elapsed().as_secs_f64(),
        verified = result.verified,
        "Entity verification completed"
    );
    Ok(Json(result))
}

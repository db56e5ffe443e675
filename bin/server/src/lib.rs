//! HTTP API for the llm-inference services.
//!
//! ## Endpoints
//!
//! - `GET /`: service metadata and endpoint map
//! - `GET /health`: liveness probe
//! - `POST /api/v1/entities`: named-entity extraction
//! - `POST /api/v1/sentiment`: sentiment analysis
//! - `GET /api/v1/similarity`: semantic similarity of two texts
//! - `POST /api/v1/enhance-entities`: entity list clean-up
//! - `POST /api/v1/verify`: single entity verification

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;

use axum::Router;
use axum::http::{Method, header};
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the router with every route, CORS and request tracing.
pub fn build_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(routes::service_info))
        .route("/health", get(routes::health))
        .route("/api/v1/entities", post(routes::extract_entities))
        .route("/api/v1/sentiment", post(routes::analyze_sentiment))
        .route("/api/v1/similarity", get(routes::compute_similarity))
        .route("/api/v1/enhance-entities", post(routes::enhance_entities))
        .route("/api/v1/verify", post(routes::verify_entity))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorResponse;
    use crate::models::{HealthResponse, ServiceInfo};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use llm_inference_ai::{GatewayError, InferenceReply, LlmBackend};
    use rootcause::Report;
    use serde_json::{Value as JsonValue, json};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt; // for oneshot()

    struct StubBackend {
        reply: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl StubBackend {
        fn replying(reply: &'static str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply),
                calls: AtomicUsize::new(0),
            })
        }

        fn unreachable() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl LlmBackend for StubBackend {
        async fn generate(&self, _prompt: &str) -> Result<InferenceReply, Report<GatewayError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Some(text) => Ok(InferenceReply::new(text)),
                None => Err(GatewayError::RequestFailed {
                    endpoint: "http://localhost:11434/api/generate".to_string(),
                    reason: "connection refused".to_string(),
                }
                .into()),
            }
        }

        fn model(&self) -> &str {
            "stub"
        }
    }

    fn app(backend: Arc<StubBackend>) -> Router {
        build_app(AppState::new(backend))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_version_and_time() {
        let response = app(StubBackend::replying("")).oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let health: HealthResponse = json_body(response).await;
        assert_eq!(health.status, "healthy");
        assert_eq!(health.service, "LLM Inference Service");
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
        assert!(chrono::DateTime::parse_from_rfc3339(&health.uptime).is_ok());
    }

    #[tokio::test]
    async fn service_info_lists_every_route() {
        let response = app(StubBackend::replying("")).oneshot(get("/")).await.unwrap();
        let info: ServiceInfo = json_body(response).await;

        assert_eq!(info.endpoints.len(), routes::ENDPOINTS.len());
        assert_eq!(info.endpoints["verify"], "/api/v1/verify");
        assert_eq!(info.endpoints["enhance_entities"], "/api/v1/enhance-entities");
    }

    #[tokio::test]
    async fn entities_end_to_end() {
        let backend = StubBackend::replying(
            "Let me think...\n{\"persons\":[\"Jane Doe\",\"Jane\"],\"locations\":[\"Cairo\"],\"organizations\":[],\"events\":[\"World Cup Final\",\"Final\"]}",
        );
        let response = app(backend)
            .oneshot(post_json(
                "/api/v1/entities",
                r#"{"text":"Jane Doe watched the World Cup Final in Cairo"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: JsonValue = json_body(response).await;
        assert_eq!(
            body,
            json!({
                "persons": ["Jane Doe"],
                "locations": ["Cairo"],
                "organizations": [],
                "events": ["World Cup Final"]
            })
        );
    }

    #[tokio::test]
    async fn entities_rejects_missing_text() {
        let backend = StubBackend::replying("{}");
        let response = app(backend.clone())
            .oneshot(post_json("/api/v1/entities", r#"{"content":"hi"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ErrorResponse = json_body(response).await;
        assert!(!error.error.is_empty());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn entities_gateway_failure_is_server_error() {
        let response = app(StubBackend::unreachable())
            .oneshot(post_json("/api/v1/entities", r#"{"text":"hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let error: ErrorResponse = json_body(response).await;
        assert_eq!(error.error, "Unable to extract entities");
    }

    #[tokio::test]
    async fn sentiment_masks_gateway_failure() {
        let response = app(StubBackend::unreachable())
            .oneshot(post_json("/api/v1/sentiment", r#"{"text":"hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: JsonValue = json_body(response).await;
        assert_eq!(body, json!({"sentiment": "neutral", "confidence": 0.0}));
    }

    #[tokio::test]
    async fn similarity_passes_verdict_through() {
        let backend = StubBackend::replying(r#"{"similarity_score":0.92,"should_be_merged":true}"#);
        let response = app(backend)
            .oneshot(get("/api/v1/similarity?text1=hello&text2=hi&entity_type=greeting"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: JsonValue = json_body(response).await;
        assert_eq!(
            body,
            json!({
                "text1": "hello",
                "text2": "hi",
                "similarity_score": 0.92,
                "should_be_merged": true,
                "thinking": ""
            })
        );
    }

    #[tokio::test]
    async fn similarity_requires_all_parameters() {
        let backend = StubBackend::replying("{}");
        for uri in [
            "/api/v1/similarity?text1=hello&text2=hi",
            "/api/v1/similarity?text1=hello&text2=&entity_type=greeting",
            "/api/v1/similarity",
        ] {
            let response = app(backend.clone()).oneshot(get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");

            let error: ErrorResponse = json_body(response).await;
            assert_eq!(
                error.error,
                "Both text1 and text2, and entity_type query parameters are required"
            );
        }
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn enhancement_reports_signed_removed_count() {
        let backend = StubBackend::replying(r#"{"enhanced_entities":["Berlin","Munich","Hamburg"]}"#);
        let response = app(backend)
            .oneshot(post_json(
                "/api/v1/enhance-entities",
                r#"{"entities":["berlin"],"entity_type":"location"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: JsonValue = json_body(response).await;
        assert_eq!(body["processed_count"], 1);
        assert_eq!(body["removed_count"], -2);
        assert_eq!(body["original_entities"], json!(["berlin"]));
        assert_eq!(body["entity_type"], "location");
    }

    #[tokio::test]
    async fn verify_empty_entity_skips_the_model() {
        let backend = StubBackend::replying(r#"{"verified":true}"#);
        let response = app(backend.clone())
            .oneshot(post_json("/api/v1/verify", r#"{"type":"person"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: JsonValue = json_body(response).await;
        assert_eq!(body, json!({"entity": "", "verified": false}));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn verify_undecodable_reply_is_server_error() {
        let response = app(StubBackend::replying("looks valid to me"))
            .oneshot(post_json("/api/v1/verify", r#"{"entity":"Cairo","type":"location"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn cors_preflight_is_answered() {
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/v1/entities")
            .header("origin", "http://example.com")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type")
            .body(Body::empty())
            .unwrap();
        let response = app(StubBackend::replying("")).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }
}

//! Ollama gateway.
//!
//! Issues `POST {base_url}/api/generate` with a non-streaming body and reads
//! the `{"response": ...}` envelope. When a token is configured, requests go
//! through [`SessionCookieAuth`]; otherwise through [`NoAuth`].

use crate::auth::{Authenticator, NoAuth, SessionCookieAuth};
use crate::backend::{InferenceReply, InferenceRequest, InvocationId, LlmBackend};
use crate::error::GatewayError;
use async_trait::async_trait;
use llm_inference_core::Result;
use reqwest::{Client, Response, redirect};
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Session cookie issued by the auth proxy in front of the endpoint.
pub const DEFAULT_AUTH_COOKIE: &str = "C.27500673_auth_token";

/// Connection settings for an Ollama endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Base URL of the Ollama server (also the auth priming URL).
    pub base_url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Optional credential token.
    pub token: Option<String>,
    /// Per-call deadline covering connect, send and body read.
    pub timeout: Duration,
    /// Name of the session cookie issued by the auth proxy.
    pub auth_cookie: String,
}

impl GatewayConfig {
    /// Creates a configuration without credentials and a 120 second deadline.
    #[must_use]
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            token: None,
            timeout: Duration::from_secs(120),
            auth_cookie: DEFAULT_AUTH_COOKIE.to_string(),
        }
    }

    /// Sets the credential token. An empty token counts as none.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// Sets the per-call deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the session cookie name.
    #[must_use]
    pub fn with_auth_cookie(mut self, name: impl Into<String>) -> Self {
        self.auth_cookie = name.into();
        self
    }

    /// The inference endpoint URL.
    #[must_use]
    pub fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Deserialize)]
struct GenerateEnvelope {
    response: String,
}

/// Gateway to an Ollama `/api/generate` endpoint.
pub struct OllamaGateway {
    client: Client,
    config: GatewayConfig,
    authenticator: Arc<dyn Authenticator>,
}

impl OllamaGateway {
    /// Creates a gateway, choosing the authenticator from the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::ClientBuild {
                reason: e.to_string(),
            })?;

        let authenticator: Arc<dyn Authenticator> = match &config.token {
            Some(token) => Arc::new(SessionCookieAuth::new(
                client.clone(),
                config.base_url.clone(),
                token.clone(),
                config.auth_cookie.clone(),
            )),
            None => Arc::new(NoAuth),
        };

        Ok(Self {
            client,
            config,
            authenticator,
        })
    }

    /// Returns the gateway configuration.
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    async fn post(&self, url: &str, body: &InferenceRequest) -> Result<Response, GatewayError> {
        let request = self
            .authenticator
            .attach(self.client.post(url).json(body))
            .await?;

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout {
                    endpoint: url.to_string(),
                }
            } else {
                GatewayError::RequestFailed {
                    endpoint: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;
        Ok(response)
    }
}

#[async_trait]
impl LlmBackend for OllamaGateway {
    async fn generate(&self, prompt: &str) -> Result<InferenceReply, GatewayError> {
        let invocation_id = InvocationId::new();
        let started = Instant::now();
        let url = self.config.generate_url();

        let mut body = InferenceRequest::new(&self.config.model, prompt);
        if let Some(token) = &self.config.token {
            body = body.with_token(token.clone());
        }

        debug!(
            %invocation_id,
            endpoint = %url,
            model = %self.config.model,
            prompt_chars = prompt.chars().count(),
            "Calling inference endpoint"
        );

        let mut response = self.post(&url, &body).await?;
        if !response.status().is_success()
            && self.authenticator.on_challenge(response.status()).await?
        {
            info!(
                %invocation_id,
                status = %response.status(),
                "Retrying inference call after re-authentication"
            );
            response = self.post(&url, &body).await?;
        }

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(
                %invocation_id,
                endpoint = %url,
                status = %status,
                body = %detail,
                "Inference endpoint returned error"
            );
            return Err(GatewayError::UpstreamStatus {
                endpoint: url,
                status: status.as_u16(),
            }
            .into());
        }

        let envelope: GenerateEnvelope = response.json().await.map_err(|e| {
            warn!(%invocation_id, error = %e, "Failed to decode inference response");
            GatewayError::EnvelopeDecode {
                reason: e.to_string(),
            }
        })?;

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        debug!(
            %invocation_id,
            elapsed_ms,
            response_chars = envelope.response.chars().count(),
            "Inference call completed"
        );

        Ok(InferenceReply::new(envelope.response))
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

//! LLM backend abstraction.
//!
//! Defines the wire request sent to the inference endpoint, the reply handed
//! back to task services, and the trait every gateway implements.

use crate::error::GatewayError;
use async_trait::async_trait;
use llm_inference_core::{ReplySplit, Result, decode_fragment, decode_tolerant, split_reply};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique identifier for one gateway invocation, used to correlate log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvocationId(Ulid);

impl InvocationId {
    /// Creates a new invocation ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for InvocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InvocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "llm_{}", self.0)
    }
}

/// Body of a `POST /api/generate` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceRequest {
    /// Model identifier.
    pub model: String,
    /// Fully rendered prompt.
    pub prompt: String,
    /// Always false; replies are read as one envelope.
    pub stream: bool,
    /// Credential token, sent only when configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl InferenceRequest {
    /// Creates a non-streaming request.
    #[must_use]
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            stream: false,
            token: None,
        }
    }

    /// Attaches a credential token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// A model reply with its thinking text and JSON fragment derived once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceReply {
    response_text: String,
    split: ReplySplit,
}

impl InferenceReply {
    /// Wraps the raw `response` text of an envelope.
    #[must_use]
    pub fn new(response_text: impl Into<String>) -> Self {
        let response_text = response_text.into();
        let split = split_reply(&response_text);
        Self {
            response_text,
            split,
        }
    }

    /// The raw model output.
    #[must_use]
    pub fn response_text(&self) -> &str {
        &self.response_text
    }

    /// Everything the model wrote before its JSON payload.
    #[must_use]
    pub fn thinking(&self) -> &str {
        &self.split.thinking
    }

    /// The first `{` through the last `}`, or empty.
    #[must_use]
    pub fn json_fragment(&self) -> &str {
        &self.split.json_fragment
    }

    /// Decodes the pre-split JSON fragment.
    ///
    /// # Errors
    ///
    /// Returns the decoder error if the fragment is empty or not a valid `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        decode_fragment(&self.split.json_fragment)
    }

    /// Decodes the whole reply, falling back to the brace span.
    ///
    /// # Errors
    ///
    /// Returns the decoder error if neither attempt yields a valid `T`.
    pub fn decode_tolerant<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        decode_tolerant(&self.response_text)
    }
}

/// Trait for model gateways.
///
/// One call issues one inference request (two when the upstream demands
/// re-authentication) and returns the raw reply.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Sends `prompt` to the model and returns its reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is unreachable, answers with a
    /// non-success status, or the reply envelope cannot be decoded.
    async fn generate(&self, prompt: &str) -> Result<InferenceReply, GatewayError>;

    /// Returns the model name.
    fn model(&self) -> &str;
}

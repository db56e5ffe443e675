//! Sentiment analysis.
//!
//! The only task that never fails: a failed model call or an unusable reply
//! degrades to a neutral result with zero confidence.

use crate::prompts;
use crate::shape::loose_f64;
use llm_inference_ai::LlmBackend;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue, json};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Sentiment label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl SentimentLabel {
    /// Parses a label case-insensitively.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" => Some(Self::Positive),
            "negative" => Some(Self::Negative),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

/// Sentiment of a text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub sentiment: SentimentLabel,
    /// Always within `0.0..=1.0`.
    pub confidence: f64,
}

impl SentimentResult {
    /// The fallback result: neutral, zero confidence.
    #[must_use]
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Shapes the fields of a decoded model object.
    #[must_use]
    pub fn from_model_output(value: &Map<String, JsonValue>) -> Self {
        let sentiment = value
            .get("sentiment")
            .and_then(JsonValue::as_str)
            .and_then(SentimentLabel::parse)
            .unwrap_or_default();
        let confidence = loose_f64(value.get("confidence"))
            .map(|c| c.clamp(0.0, 1.0))
            .unwrap_or(0.0);
        Self {
            sentiment,
            confidence,
        }
    }
}

/// Classifies text as positive, negative or neutral.
pub struct SentimentService {
    backend: Arc<dyn LlmBackend>,
}

impl SentimentService {
    /// Creates a service backed by `backend`.
    #[must_use]
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self { backend }
    }

    /// Analyzes `text`, falling back to [`SentimentResult::neutral`].
    pub async fn analyze(&self, text: &str) -> SentimentResult {
        let variables = HashMap::from([("text".to_string(), json!(text))]);
        let prompt = prompts::sentiment().render(&variables);

        let reply = match self.backend.generate(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Sentiment model call failed, answering neutral");
                return SentimentResult::neutral();
            }
        };

        match reply.decode_tolerant::<Map<String, JsonValue>>() {
            Ok(value) => SentimentResult::from_model_output(&value),
            Err(e) => {
                warn!(error = %e, "Sentiment reply held no JSON object, answering neutral");
                SentimentResult::neutral()
            }
        }
    }
}

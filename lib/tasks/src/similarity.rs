//! Semantic similarity between two texts of the same entity type.

use crate::error::TaskError;
use crate::prompts;
use llm_inference_ai::LlmBackend;
use llm_inference_core::Result;
use rootcause::prelude::ResultExt;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

const TASK: &str = "similarity";

#[derive(Debug, Deserialize)]
struct Verdict {
    #[serde(default)]
    similarity_score: f64,
    #[serde(default)]
    should_be_merged: bool,
}

/// Similarity verdict for two texts.
///
/// The score is passed through exactly as the model gave it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub text1: String,
    pub text2: String,
    #[serde(rename = "similarity_score")]
    pub score: f64,
    #[serde(rename = "should_be_merged")]
    pub should_merge: bool,
    pub thinking: String,
}

/// Scores the semantic similarity of two texts.
pub struct SimilarityService {
    backend: Arc<dyn LlmBackend>,
}

impl SimilarityService {
    /// Creates a service backed by `backend`.
    #[must_use]
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self { backend }
    }

    /// Compares `text1` and `text2` as entities of `entity_type`.
    ///
    /// # Errors
    ///
    /// Returns an error if the model call fails or its reply carries no
    /// decodable verdict.
    pub async fn compare(
        &self,
        text1: &str,
        text2: &str,
        entity_type: &str,
    ) -> Result<SimilarityResult, TaskError> {
        let variables = HashMap::from([
            ("text1".to_string(), json!(text1)),
            ("text2".to_string(), json!(text2)),
            ("entity_type".to_string(), json!(entity_type)),
        ]);
        let prompt = prompts::similarity().render(&variables);

        let reply = self
            .backend
            .generate(&prompt)
            .await
            .context(TaskError::Gateway { task: TASK })?;

        let verdict: Verdict = reply.decode().map_err(|e| {
            warn!(error = %e, fragment = %reply.json_fragment(), "Undecodable similarity verdict");
            TaskError::Extraction {
                task: TASK,
                reason: e.to_string(),
            }
        })?;

        debug!(
            score = verdict.similarity_score,
            should_merge = verdict.should_be_merged,
            "Similarity computed"
        );

        Ok(SimilarityResult {
            text1: text1.to_string(),
            text2: text2.to_string(),
            score: verdict.similarity_score,
            should_merge: verdict.should_be_merged,
            thinking: reply.thinking().to_string(),
        })
    }
}

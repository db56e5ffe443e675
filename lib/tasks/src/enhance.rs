//! Entity list enhancement: typo fixes, normalization and deduplication.

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

const TASK: &str = "enhancement";

#[derive(Debug, Deserialize)]
struct Enhanced {
    #[serde(default)]
    enhanced_entities: Vec<String>,
}

/// Outcome of an enhancement pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhancementResult {
    pub original_entities: Vec<String>,
    pub enhanced_entities: Vec<String>,
    pub entity_type: String,
    pub processed_count: usize,
    /// `processed_count - enhanced_entities.len()`. Negative when the model
    /// returned more entities than it was given.
    pub removed_count: i64,
    pub thinking: String,
}

impl EnhancementResult {
    fn new(
        original_entities: Vec<String>,
        enhanced_entities: Vec<String>,
        entity_type: &str,
        thinking: &str,
    ) -> Self {
        let processed_count = original_entities.len();
        let removed_count = signed(processed_count) - signed(enhanced_entities.len());
        Self {
            original_entities,
            enhanced_entities,
            entity_type: entity_type.to_string(),
            processed_count,
            removed_count,
            thinking: thinking.to_string(),
        }
    }
}

fn signed(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

/// Cleans and deduplicates entity lists.
pub struct EnhancementService {
    backend: Arc<dyn LlmBackend>,
}

impl EnhancementService {
    /// Creates a service backed by `backend`.
    #[must_use]
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self { backend }
    }

    /// Enhances `entities` of `entity_type`. An empty list skips the model.
    ///
    /// # Errors
    ///
    /// Returns an error if the model call fails or its reply carries no
    /// decodable entity list.
    pub async fn enhance(
        &self,
        entities: Vec<String>,
        entity_type: &str,
    ) -> Result<EnhancementResult, TaskError> {
        if entities.is_empty() {
            return Ok(EnhancementResult::new(entities, Vec::new(), entity_type, ""));
        }

        let variables = HashMap::from([
            ("entities".to_string(), json!(entities.join("\", \""))),
            ("entity_type".to_string(), json!(entity_type)),
        ]);
        let prompt = prompts::enhancement().render(&variables);

        let reply = self
            .backend
            .generate(&prompt)
            .await
            .context(TaskError::Gateway { task: TASK })?;

        let enhanced: Enhanced = reply.decode().map_err(|e| {
            warn!(error = %e, fragment = %reply.json_fragment(), "Undecodable enhancement reply");
            TaskError::Extraction {
                task: TASK,
                reason: e.to_string(),
            }
        })?;

        let result = EnhancementResult::new(
            entities,
            enhanced.enhanced_entities,
            entity_type,
            reply.thinking(),
        );
        debug!(
            entity_type,
            processed = result.processed_count,
            removed = result.removed_count,
            "Entities enhanced"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedBackend;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[tokio::test]
    async fn duplicates_are_counted_as_removed() {
        let backend = ScriptedBackend::replying(
            "<think>john smith is a duplicate</think>{\"enhanced_entities\": [\"John Smith\", \"Jane Doe\"]}",
        );
        let service = EnhancementService::new(backend.clone());

        let result = service
            .enhance(names(&["John Smith", "john smith", "Jane Doe"]), "person")
            .await
            .expect("enhance");

        assert_eq!(result.enhanced_entities, names(&["John Smith", "Jane Doe"]));
        assert_eq!(result.processed_count, 3);
        assert_eq!(result.removed_count, 1);
        assert_eq!(result.thinking, "<think>john smith is a duplicate</think>");
        assert!(
            backend
                .last_prompt()
                .expect("prompt")
                .contains(r#"Input entities: ["John Smith", "john smith", "Jane Doe"]"#)
        );
    }

    #[tokio::test]
    async fn invented_entities_make_removed_count_negative() {
        let backend = ScriptedBackend::replying(
            r#"{"enhanced_entities": ["Berlin", "Munich", "Hamburg"]}"#,
        );
        let result = EnhancementService::new(backend)
            .enhance(names(&["berlin"]), "location")
            .await
            .expect("enhance");

        assert_eq!(result.removed_count, -2);
        assert_eq!(
            result.removed_count,
            result.processed_count as i64 - result.enhanced_entities.len() as i64
        );
    }

    #[tokio::test]
    async fn empty_input_skips_the_model() {
        let backend = ScriptedBackend::replying("unused");
        let result = EnhancementService::new(backend.clone())
            .enhance(Vec::new(), "organization")
            .await
            .expect("enhance");

        assert_eq!(backend.calls(), 0);
        assert_eq!(result.processed_count, 0);
        assert_eq!(result.removed_count, 0);
        assert!(result.enhanced_entities.is_empty());
        assert_eq!(result.entity_type, "organization");
    }

    #[tokio::test]
    async fn reply_without_json_is_an_error() {
        let service = EnhancementService::new(ScriptedBackend::replying("All entities look fine."));
        let err = service
            .enhance(names(&["Cairo"]), "location")
            .await
            .expect_err("should fail");
        assert!(err.to_string().contains("enhancement"));
    }
}

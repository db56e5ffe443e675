//! Single-entity verification.

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

const TASK: &str = "verification";

#[derive(Debug, Deserialize)]
struct Verdict {
    #[serde(default)]
    verified: bool,
}

/// Whether an entity is a valid, specific instance of its type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// The entity as submitted.
    pub entity: String,
    pub verified: bool,
}

/// Asks the model whether an entity is valid for its type.
pub struct VerificationService {
    backend: Arc<dyn LlmBackend>,
}

impl VerificationService {
    /// Creates a service backed by `backend`.
    #[must_use]
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self { backend }
    }

    /// Verifies `entity` as an `entity_type`. An empty entity is never valid
    /// and skips the model.
    ///
    /// # Errors
    ///
    /// Returns an error if the model call fails or its reply carries no
    /// decodable verdict.
    pub async fn verify(
        &self,
        entity: &str,
        entity_type: &str,
    ) -> Result<VerificationResult, TaskError> {
        if entity.is_empty() {
            return Ok(VerificationResult {
                entity: String::new(),
                verified: false,
            });
        }

        let variables = HashMap::from([
            ("entity".to_string(), json!(entity)),
            ("entity_type".to_string(), json!(entity_type)),
        ]);
        let prompt = prompts::verification().render(&variables);

        let reply = self
            .backend
            .generate(&prompt)
            .await
            .context(TaskError::Gateway { task: TASK })?;

        let verdict: Verdict = reply.decode().map_err(|e| {
            warn!(error = %e, fragment = %reply.json_fragment(), "Undecodable verification reply");
            TaskError::Extraction {
                task: TASK,
                reason: e.to_string(),
            }
        })?;

        debug!(entity, entity_type, verified = verdict.verified, "Entity verified");
        Ok(VerificationResult {
            entity: entity.to_string(),
            verified: verdict.verified,
        })
    }
}

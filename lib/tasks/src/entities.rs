//! Named-entity extraction.

use crate::error::TaskError;
use crate::prompts;
use crate::shape::{string_list, with_min_words};
use llm_inference_ai::LlmBackend;
use llm_inference_core::Result;
use rootcause::prelude::ResultExt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue, json};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

const TASK: &str = "entities";

/// Persons and events shorter than this are discarded.
pub const MIN_WORDS: usize = 2;

/// Entities found in a text, in model order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entities {
    pub persons: Vec<String>,
    pub locations: Vec<String>,
    pub organizations: Vec<String>,
    pub events: Vec<String>,
}

impl Entities {
    /// Shapes the fields of a decoded model object.
    ///
    /// Locations and organizations are copied as-is; persons and events keep
    /// only entries of at least [`MIN_WORDS`] words. Non-string list elements
    /// and missing fields are dropped silently.
    #[must_use]
    pub fn from_model_output(value: &Map<String, JsonValue>) -> Self {
        Self {
            persons: with_min_words(string_list(value.get("persons")), MIN_WORDS),
            locations: string_list(value.get("locations")),
            organizations: string_list(value.get("organizations")),
            events: with_min_words(string_list(value.get("events")), MIN_WORDS),
        }
    }
}

/// Extracts persons, locations, organizations and events from text.
pub struct EntityService {
    backend: Arc<dyn LlmBackend>,
}

impl EntityService {
    /// Creates a service backed by `backend`.
    #[must_use]
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self { backend }
    }

    /// Extracts entities from `text`.
    ///
    /// The reply must hold a JSON object, either as the whole text or inside
    /// it. A reply without one yields empty lists rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the model call fails.
    pub async fn extract(&self, text: &str) -> Result<Entities, TaskError> {
        let variables = HashMap::from([("text".to_string(), json!(text))]);
        let prompt = prompts::entity_extraction().render(&variables);

        let reply = self
            .backend
            .generate(&prompt)
            .await
            .context(TaskError::Gateway { task: TASK })?;

        let entities = match reply.decode_tolerant::<Map<String, JsonValue>>() {
            Ok(value) => Entities::from_model_output(&value),
            Err(e) => {
                warn!(error = %e, "Model reply held no entity JSON, returning empty lists");
                Entities::default()
            }
        };

        debug!(
            persons = entities.persons.len(),
            locations = entities.locations.len(),
            organizations = entities.organizations.len(),
            events = entities.events.len(),
            "Shaped entities"
        );
        Ok(entities)
    }
}

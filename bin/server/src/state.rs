//! Shared application state.

use llm_inference_ai::LlmBackend;
use llm_inference_tasks::{
    EnhancementService, EntityService, SentimentService, SimilarityService, VerificationService,
};
use std::sync::Arc;

/// Task services shared by every handler. All of them use the same backend.
pub struct AppState {
    pub entities: EntityService,
    pub sentiment: SentimentService,
    pub similarity: SimilarityService,
    pub enhancement: EnhancementService,
    pub verification: VerificationService,
}

impl AppState {
    /// Wires every task service to `backend`.
    #[must_use]
    pub fn new(backend: Arc<dyn LlmBackend>) -> Arc<Self> {
        Arc::new(Self {
            entities: EntityService::new(backend.clone()),
            sentiment: SentimentService::new(backend.clone()),
            similarity: SimilarityService::new(backend.clone()),
            enhancement: EnhancementService::new(backend.clone()),
            verification: VerificationService::new(backend),
        })
    }
}

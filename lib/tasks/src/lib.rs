//! Task services for the llm-inference API.
//!
//! Each service renders its prompt, makes one gateway call, recovers the JSON
//! payload from the reply and shapes it into the public response type:
//!
//! - [`EntityService`]: named-entity extraction
//! - [`SentimentService`]: sentiment label and confidence
//! - [`SimilarityService`]: semantic similarity and merge advice
//! - [`EnhancementService`]: entity list clean-up and deduplication
//! - [`VerificationService`]: single entity validity check

pub mod enhance;
pub mod entities;
pub mod error;
pub mod prompts;
pub mod sentiment;
pub mod shape;
pub mod similarity;
pub mod verify;

#[cfg(test)]
mod testing;

pub use enhance::{EnhancementResult, EnhancementService};
pub use entities::{Entities, EntityService};
pub use error::TaskError;
pub use sentiment::{SentimentLabel, SentimentResult, SentimentService};
pub use similarity::{SimilarityResult, SimilarityService};
pub use verify::{VerificationResult, VerificationService};

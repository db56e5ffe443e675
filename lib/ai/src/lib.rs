//! Model access for the llm-inference services.
//!
//! This crate provides the single primitive every task is built on: send one
//! prompt to the inference endpoint and get the raw reply back, already split
//! into thinking text and a candidate JSON fragment.
//!
//! - [`LlmBackend`]: the gateway seam, implemented by [`OllamaGateway`]
//! - [`Authenticator`]: pluggable upstream authentication
//! - [`PromptTemplate`]: `{{variable}}` instruction templates

pub mod auth;
pub mod backend;
pub mod error;
pub mod ollama;
pub mod prompt;

pub use auth::{Authenticator, NoAuth, SessionCookieAuth};
pub use backend::{InferenceReply, InferenceRequest, InvocationId, LlmBackend};
pub use error::GatewayError;
pub use ollama::{DEFAULT_AUTH_COOKIE, GatewayConfig, OllamaGateway};
pub use prompt::{PromptTemplate, VariableDefinition};

//! Centralized server configuration.
//!
//! Loaded via the `config` crate from environment variables (after an
//! optional `.env` file has been applied by `main`).

use llm_inference_ai::{DEFAULT_AUTH_COOKIE, GatewayConfig};
use serde::Deserialize;
use std::time::Duration;

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the Ollama server (`OLLAMA_URL`).
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,

    /// Model identifier (`MODEL_NAME`).
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Listen port (`PORT`).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Upstream credential (`OLLAMA_TOKEN`). Empty means none.
    #[serde(default)]
    pub ollama_token: Option<String>,

    /// Per-call deadline for model requests (`OLLAMA_TIMEOUT_SECONDS`).
    #[serde(default = "default_timeout_seconds")]
    pub ollama_timeout_seconds: u64,

    /// Session cookie issued by the auth proxy (`OLLAMA_AUTH_COOKIE`).
    #[serde(default = "default_auth_cookie")]
    pub ollama_auth_cookie: String,
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model_name() -> String {
    "deepseek-r1:1.5b".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_timeout_seconds() -> u64 {
    120
}

fn default_auth_cookie() -> String {
    DEFAULT_AUTH_COOKIE.to_string()
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_environment(config::Environment::default())
    }

    fn from_environment(environment: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Gateway settings derived from this configuration.
    #[must_use]
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::new(&self.ollama_url, &self.model_name)
            .with_token(self.ollama_token.clone())
            .with_timeout(Duration::from_secs(self.ollama_timeout_seconds))
            .with_auth_cookie(&self.ollama_auth_cookie)
    }
}

//! Scripted backend for service tests.

use async_trait::async_trait;
use llm_inference_ai::{GatewayError, InferenceReply, LlmBackend};
use llm_inference_core::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Backend that returns a fixed reply, or fails, and records every prompt.
pub(crate) struct ScriptedBackend {
    reply: Option<String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub(crate) fn replying(text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.into()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().expect("lock").last().cloned()
    }
}

#[async_trait]
impl LlmBackend for ScriptedBackend {
    async fn generate(&self, prompt: &str) -> Result<InferenceReply, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().expect("lock").push(prompt.to_string());
        match &self.reply {
            Some(text) => Ok(InferenceReply::new(text.clone())),
            None => Err(GatewayError::UpstreamStatus {
                endpoint: "http://stub/api/generate".to_string(),
                status: 502,
            }
            .into()),
        }
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

//! Request and response bodies for the HTTP API.
//!
//! Task results are serialized directly from the task crate's types; only the
//! inbound bodies and the service metadata live here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of `POST /api/v1/entities` and `POST /api/v1/sentiment`.
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

/// Query of `GET /api/v1/similarity`. Empty values count as missing.
#[derive(Debug, Default, Deserialize)]
pub struct SimilarityQuery {
    pub text1: Option<String>,
    pub text2: Option<String>,
    pub entity_type: Option<String>,
}

/// Body of `POST /api/v1/enhance-entities`.
#[derive(Debug, Deserialize)]
pub struct EnhanceRequest {
    pub entities: Vec<String>,
    pub entity_type: String,
}

/// Body of `POST /api/v1/verify`.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub entity: String,
    #[serde(default, rename = "type")]
    pub entity_type: String,
}

/// Response of `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    /// Current UTC time, RFC 3339.
    pub uptime: String,
    pub version: String,
}

/// Response of `GET /`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub title: String,
    pub description: String,
    pub version: String,
    pub endpoints: BTreeMap<String, String>,
}

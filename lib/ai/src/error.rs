//! Error types for the AI crate.
//!
//! `GatewayError` covers outbound inference calls and upstream
//! authentication. Callers wrap it in a rootcause `Report` and add their own
//! context on top.

use std::fmt;

/// Errors from the model gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The HTTP client could not be constructed.
    ClientBuild { reason: String },
    /// The request could not be sent or the connection failed.
    RequestFailed { endpoint: String, reason: String },
    /// No response arrived before the per-call deadline.
    Timeout { endpoint: String },
    /// The upstream auth proxy rejected the priming request.
    AuthenticationFailed { status: u16 },
    /// The endpoint answered with a non-success status.
    UpstreamStatus { endpoint: String, status: u16 },
    /// The reply envelope was not the expected `{"response": ...}` shape.
    EnvelopeDecode { reason: String },
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientBuild { reason } => {
                write!(f, "failed to build inference client: {reason}")
            }
            Self::RequestFailed { endpoint, reason } => {
                write!(f, "inference request to '{endpoint}' failed: {reason}")
            }
            Self::Timeout { endpoint } => {
                write!(f, "inference request to '{endpoint}' timed out")
            }
            Self::AuthenticationFailed { status } => {
                write!(f, "upstream authentication failed with status {status}")
            }
            Self::UpstreamStatus { endpoint, status } => {
                write!(f, "inference endpoint '{endpoint}' returned status {status}")
            }
            Self::EnvelopeDecode { reason } => {
                write!(f, "failed to decode inference response: {reason}")
            }
        }
    }
}

impl std::error::Error for GatewayError {}

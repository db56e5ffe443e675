//! Task error types.
//!
//! `TaskError` is the context a task attaches on top of a gateway report, or
//! the root of a report when the model reply could not be used.

use std::fmt;

/// Errors from task services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The model call failed (wraps a gateway report).
    Gateway { task: &'static str },
    /// The model reply did not contain the expected JSON payload.
    Extraction { task: &'static str, reason: String },
}

impl TaskError {
    /// Name of the task that failed.
    #[must_use]
    pub fn task(&self) -> &'static str {
        match self {
            Self::Gateway { task } | Self::Extraction { task, .. } => task,
        }
    }
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gateway { task } => write!(f, "{task}: model call failed"),
            Self::Extraction { task, reason } => {
                write!(f, "{task}: model reply was not usable: {reason}")
            }
        }
    }
}

impl std::error::Error for TaskError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_error_display() {
        let err = TaskError::Extraction {
            task: "verification",
            reason: "EOF while parsing a value".to_string(),
        };
        assert!(err.to_string().starts_with("verification:"));
        assert!(err.to_string().contains("EOF"));
        assert_eq!(err.task(), "verification");
    }
}

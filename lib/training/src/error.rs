//! Error taxonomy for training operations.
//!
//! Services return `Report<TrainingError>`; the HTTP layer maps each variant
//! to a status code and a user-safe message.

use medtrain_ai::LlmError;
use medtrain_conversation::{StoreError, ValidationError};
use std::fmt;

/// How a language model call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamFailure {
    Timeout,
    BadResponse { reason: String },
}

impl fmt::Display for UpstreamFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "language model timed out"),
            Self::BadResponse { reason } => write!(f, "language model failed: {reason}"),
        }
    }
}

impl From<LlmError> for UpstreamFailure {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Timeout => Self::Timeout,
            other => Self::BadResponse {
                reason: other.to_string(),
            },
        }
    }
}

/// Training operation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainingError {
    /// Required input was missing or malformed.
    InvalidArgument { reason: String },
    ScenarioNotFound { id: String },
    DialogNotFound { id: String },
    /// The client exhausted its request quota.
    RateLimited { remaining: u32, retry_after_secs: u64 },
    /// The language model call for the reply failed.
    Upstream(UpstreamFailure),
    /// A store operation failed.
    Storage { reason: String },
    /// Another exchange saved the dialog first.
    Conflict { id: String },
}

impl fmt::Display for TrainingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { reason } => write!(f, "invalid argument: {reason}"),
            Self::ScenarioNotFound { id } => write!(f, "scenario '{id}' not found"),
            Self::DialogNotFound { id } => write!(f, "dialog '{id}' not found"),
            Self::RateLimited {
                remaining,
                retry_after_secs,
            } => write!(
                f,
                "rate limit exceeded ({remaining} remaining, retry after {retry_after_secs}s)"
            ),
            Self::Upstream(failure) => write!(f, "{failure}"),
            Self::Storage { reason } => write!(f, "storage error: {reason}"),
            Self::Conflict { id } => write!(f, "dialog '{id}' was modified concurrently"),
        }
    }
}

impl std::error::Error for TrainingError {}

impl TrainingError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}

impl From<ValidationError> for TrainingError {
    fn from(err: ValidationError) -> Self {
        Self::invalid(err.to_string())
    }
}

impl From<StoreError> for TrainingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { id, .. } => Self::Conflict { id: id.to_string() },
            other => Self::Storage {
                reason: other.to_string(),
            },
        }
    }
}

impl From<LlmError> for TrainingError {
    fn from(err: LlmError) -> Self {
        Self::Upstream(err.into())
    }
}

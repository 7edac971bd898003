//! Error types for the AI crate.

use std::fmt;

/// Errors from text generation backends.
///
/// Timeouts are kept distinct from every other failure so callers can
/// tell "try again later" apart from "the backend answered nonsense".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// No response arrived within the request timeout.
    Timeout,
    /// The backend answered, but the payload was malformed or empty.
    BadResponse { reason: String },
    /// The request could not be delivered or was rejected.
    RequestFailed { reason: String },
    /// The adapter is misconfigured.
    InvalidConfig { reason: String },
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "LLM request timed out"),
            Self::BadResponse { reason } => write!(f, "bad LLM response: {reason}"),
            Self::RequestFailed { reason } => write!(f, "LLM request failed: {reason}"),
            Self::InvalidConfig { reason } => write!(f, "invalid LLM configuration: {reason}"),
        }
    }
}

impl std::error::Error for LlmError {}

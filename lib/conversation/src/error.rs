//! Error types for the conversation crate.
//!
//! - `ValidationError`: Rejected input when building scenarios, turns or sessions
//! - `StoreError`: Failures reported by dialog and scenario stores

use medtrain_core::DialogId;
use std::fmt;

/// Input rejected while constructing a domain value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Turn content was empty or whitespace-only.
    EmptyContent,
    /// Scenario system prompt was empty or whitespace-only.
    EmptySystemPrompt,
    /// Scenario token budget is below the allowed minimum.
    BudgetTooSmall { max_tokens: u32, minimum: u32 },
    /// Role string did not name a known turn role.
    UnknownRole { role: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "message content must not be empty"),
            Self::EmptySystemPrompt => write!(f, "scenario system prompt must not be empty"),
            Self::BudgetTooSmall {
                max_tokens,
                minimum,
            } => {
                write!(
                    f,
                    "scenario token budget {max_tokens} is below the minimum of {minimum}"
                )
            }
            Self::UnknownRole { role } => write!(f, "unknown turn role: {role}"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors from dialog and scenario storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The stored dialog changed since it was loaded.
    Conflict { id: DialogId, expected_version: u64 },
    /// The backing store could not complete the operation.
    StorageFailed { reason: String },
    /// A stored record could not be decoded into a domain value.
    Corrupt { reason: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict {
                id,
                expected_version,
            } => {
                write!(
                    f,
                    "dialog {id} was modified concurrently (expected version {expected_version})"
                )
            }
            Self::StorageFailed { reason } => write!(f, "storage operation failed: {reason}"),
            Self::Corrupt { reason } => write!(f, "stored record is corrupt: {reason}"),
        }
    }
}

impl std::error::Error for StoreError {}

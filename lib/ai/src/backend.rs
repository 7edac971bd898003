//! The text generation capability.

use crate::error::LlmError;
use crate::summary::summary_request;
use async_trait::async_trait;
use medtrain_conversation::{ContextEntry, Turn};
use serde::{Deserialize, Serialize};

/// Output of one generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    /// The generated text.
    pub text: String,
    /// Completion tokens reported by the backend.
    pub tokens: u32,
}

/// A language model backend.
///
/// Calls are blocking, network-bound and never retried here. Implementations
/// must report a timeout as [`LlmError::Timeout`] and an empty or malformed
/// answer as [`LlmError::BadResponse`].
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates the next reply for an ordered context window.
    async fn generate(&self, context: &[ContextEntry]) -> Result<Generation, LlmError>;

    /// Condenses `turns` into a short plain-text summary.
    ///
    /// By default this frames the turns with [`summary_request`] and runs
    /// a regular generation.
    async fn summarize(&self, turns: &[Turn]) -> Result<String, LlmError> {
        let request = summary_request(turns);
        Ok(self.generate(&request).await?.text)
    }
}

//! Context window entries submitted to a text generator.

use crate::turn::{Turn, TurnRole};
use serde::{Deserialize, Serialize};

/// One role-tagged entry of a generation context window.
///
/// Serializes as `{"role": "...", "text": "..."}`, the shape the
/// completion API expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub role: TurnRole,
    pub text: String,
}

impl ContextEntry {
    #[must_use]
    pub fn new(role: TurnRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(TurnRole::System, text)
    }

    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(TurnRole::User, text)
    }
}

impl From<&Turn> for ContextEntry {
    fn from(turn: &Turn) -> Self {
        Self::new(turn.role(), turn.content())
    }
}

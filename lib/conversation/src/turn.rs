//! Turns: the role-tagged messages that make up a dialog.

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Estimates the token count of `text` as one token per four characters.
///
/// This is a coarse approximation shared by every place that needs a token
/// figure without a tokenizer. Budget thresholds are tuned against its exact
/// rounding (integer division, counted in characters, not bytes).
#[must_use]
pub fn estimate_tokens(text: &str) -> u32 {
    u32::try_from(text.chars().count() / 4).unwrap_or(u32::MAX)
}

/// The role of a turn's author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// Instructions or synthetic context (system prompt, summaries).
    System,
    /// The trainee (clinic administrator).
    User,
    /// The simulated patient, produced by the language model.
    Assistant,
}

impl TurnRole {
    /// Returns the wire name of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TurnRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(Self::System),
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            other => Err(ValidationError::UnknownRole {
                role: other.to_string(),
            }),
        }
    }
}

/// One message in a conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TurnRecord")]
pub struct Turn {
    role: TurnRole,
    content: String,
    timestamp: DateTime<Utc>,
    token_count: u32,
}

/// Unvalidated shape of a turn as it appears in storage.
#[derive(Deserialize)]
struct TurnRecord {
    role: TurnRole,
    content: String,
    timestamp: DateTime<Utc>,
    #[serde(default)]
    token_count: u32,
}

impl TryFrom<TurnRecord> for Turn {
    type Error = ValidationError;

    fn try_from(record: TurnRecord) -> Result<Self, Self::Error> {
        Self::restore(
            record.role,
            record.content,
            record.timestamp,
            record.token_count,
        )
    }
}

impl Turn {
    /// Creates a turn stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyContent`] if `content` is empty after trimming.
    pub fn new(
        role: TurnRole,
        content: impl Into<String>,
        token_count: u32,
    ) -> Result<Self, ValidationError> {
        Self::restore(role, content, Utc::now(), token_count)
    }

    /// Rebuilds a turn with a known timestamp, e.g. when loading from storage.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyContent`] if `content` is empty after trimming.
    pub fn restore(
        role: TurnRole,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
        token_count: u32,
    ) -> Result<Self, ValidationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(ValidationError::EmptyContent);
        }
        Ok(Self {
            role,
            content,
            timestamp,
            token_count,
        })
    }

    /// Builds the synthetic system turn that replaces compacted history.
    /// `content` always carries the summary tag, so it is never blank.
    pub(crate) fn summary(content: String, token_count: u32) -> Self {
        Self {
            role: TurnRole::System,
            content,
            timestamp: Utc::now(),
            token_count,
        }
    }

    /// Returns the author role.
    #[must_use]
    pub fn role(&self) -> TurnRole {
        self.role
    }

    /// Returns the message text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns when the turn was created.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the token estimate recorded for this turn.
    #[must_use]
    pub fn token_count(&self) -> u32 {
        self.token_count
    }
}

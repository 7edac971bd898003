//! Training scenarios.
//!
//! Scenarios are authored out-of-band and are read-only to the dialog
//! engine. Each one carries the system prompt that frames the simulated
//! patient and the token budget its conversations are held to.

use crate::error::ValidationError;
use medtrain_core::ScenarioId;
use serde::{Deserialize, Serialize};

/// Smallest token budget a scenario may declare.
pub const MIN_SCENARIO_TOKENS: u32 = 1000;

/// Budget used when a scenario record does not declare one.
pub const DEFAULT_SCENARIO_TOKENS: u32 = 8000;

/// Immutable definition of a training situation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScenarioRecord")]
pub struct Scenario {
    id: ScenarioId,
    title: String,
    description: String,
    system_prompt: String,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ScenarioRecord {
    id: ScenarioId,
    title: String,
    #[serde(default)]
    description: String,
    system_prompt: String,
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,
}

fn default_max_tokens() -> u32 {
    DEFAULT_SCENARIO_TOKENS
}

impl TryFrom<ScenarioRecord> for Scenario {
    type Error = ValidationError;

    fn try_from(record: ScenarioRecord) -> Result<Self, Self::Error> {
        Self::new(
            record.id,
            record.title,
            record.description,
            record.system_prompt,
            record.max_tokens,
        )
    }
}

impl Scenario {
    /// Creates a validated scenario.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptySystemPrompt`] if the system prompt is
    /// blank, or [`ValidationError::BudgetTooSmall`] if `max_tokens` is below
    /// [`MIN_SCENARIO_TOKENS`].
    pub fn new(
        id: ScenarioId,
        title: impl Into<String>,
        description: impl Into<String>,
        system_prompt: impl Into<String>,
        max_tokens: u32,
    ) -> Result<Self, ValidationError> {
        let system_prompt = system_prompt.into();
        if system_prompt.trim().is_empty() {
            return Err(ValidationError::EmptySystemPrompt);
        }
        if max_tokens < MIN_SCENARIO_TOKENS {
            return Err(ValidationError::BudgetTooSmall {
                max_tokens,
                minimum: MIN_SCENARIO_TOKENS,
            });
        }
        Ok(Self {
            id,
            title: title.into(),
            description: description.into(),
            system_prompt,
            max_tokens,
        })
    }

    #[must_use]
    pub fn id(&self) -> ScenarioId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Returns the token budget for conversations on this scenario.
    #[must_use]
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Returns the public listing view (no system prompt).
    #[must_use]
    pub fn summary(&self) -> ScenarioSummary {
        ScenarioSummary {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
        }
    }
}

/// The part of a scenario that is shown to trainees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub id: ScenarioId,
    pub title: String,
    pub description: String,
}

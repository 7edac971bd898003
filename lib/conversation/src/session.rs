//! Dialog sessions.
//!
//! A [`DialogSession`] owns one training conversation on one scenario. It
//! grows by two turns per exchange (user, then assistant) and is compacted
//! when its running token total passes 80% of the scenario budget: every
//! turn except the most recent [`RECENT_TURNS_KEPT`] is replaced by a
//! single synthetic system turn carrying a summary.
//!
//! The session never persists itself. Callers load it from a
//! [`DialogStore`](crate::store::DialogStore), mutate it, and save it back.

use crate::context::ContextEntry;
use crate::error::ValidationError;
use crate::scenario::Scenario;
use crate::turn::{Turn, TurnRole, estimate_tokens};
use chrono::{DateTime, Utc};
use medtrain_core::DialogId;

/// Number of trailing turns kept verbatim when a session is compacted.
pub const RECENT_TURNS_KEPT: usize = 5;

/// Tag that opens the synthetic summary turn.
pub const SUMMARY_PREFIX: &str = "[SUMMARY OF PREVIOUS DIALOG]";

/// The aggregate root of a training conversation.
///
/// `total_tokens` always equals the sum of `token_count` over `turns`.
#[derive(Debug, Clone)]
pub struct DialogSession {
    id: DialogId,
    user_id: String,
    scenario: Scenario,
    turns: Vec<Turn>,
    total_tokens: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

impl DialogSession {
    /// Starts an empty session bound to `scenario`.
    ///
    /// Resolving the scenario is the caller's job; this never touches storage.
    #[must_use]
    pub fn start(scenario: Scenario, user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: DialogId::new(),
            user_id: user_id.into(),
            scenario,
            turns: Vec::new(),
            total_tokens: 0,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// Rebuilds a session from stored parts.
    ///
    /// The token total is recomputed from `turns` rather than trusted from storage.
    #[must_use]
    pub fn restore(
        id: DialogId,
        user_id: String,
        scenario: Scenario,
        turns: Vec<Turn>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        version: u64,
    ) -> Self {
        let total_tokens = sum_tokens(&turns);
        Self {
            id,
            user_id,
            scenario,
            turns,
            total_tokens,
            created_at,
            updated_at,
            version,
        }
    }

    /// Appends a turn and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyContent`] if `content` is blank. The
    /// session is left untouched in that case.
    pub fn add_turn(
        &mut self,
        role: TurnRole,
        content: impl Into<String>,
        token_count: u32,
    ) -> Result<Turn, ValidationError> {
        let turn = Turn::new(role, content, token_count)?;
        self.total_tokens += u64::from(token_count);
        self.updated_at = turn.timestamp();
        self.turns.push(turn.clone());
        Ok(turn)
    }

    /// Returns true once the running total is strictly above 80% of the budget.
    #[must_use]
    pub fn needs_summarization(&self) -> bool {
        // total > max * 0.8, kept in integers.
        self.total_tokens * 5 > u64::from(self.scenario.max_tokens()) * 4
    }

    /// Returns every turn except the most recent [`RECENT_TURNS_KEPT`].
    ///
    /// Empty while the session has no more than that many turns.
    #[must_use]
    pub fn turns_eligible_for_summary(&self) -> &[Turn] {
        &self.turns[..self.recent_start()]
    }

    /// Returns the most recent [`RECENT_TURNS_KEPT`] turns, or all of them if fewer.
    #[must_use]
    pub fn recent_turns(&self) -> &[Turn] {
        &self.turns[self.recent_start()..]
    }

    /// Replaces the conversation with one summary turn plus the recent turns.
    ///
    /// The summary turn is tagged with [`SUMMARY_PREFIX`] and estimated at
    /// one token per four characters of `summary_text`. The token total is
    /// recomputed from scratch afterwards.
    pub fn collapse_to_summary(&mut self, summary_text: &str) {
        let summary = Turn::summary(
            format!("{SUMMARY_PREFIX}\n{summary_text}"),
            estimate_tokens(summary_text),
        );
        let recent = self.turns.split_off(self.recent_start());

        self.turns.clear();
        self.turns.push(summary);
        self.turns.extend(recent);
        self.total_tokens = sum_tokens(&self.turns);
        self.updated_at = Utc::now();
    }

    /// Builds the context window for the next generation call: the scenario
    /// system prompt followed by every turn in order.
    #[must_use]
    pub fn context_for_generation(&self) -> Vec<ContextEntry> {
        std::iter::once(ContextEntry::system(self.scenario.system_prompt()))
            .chain(self.turns.iter().map(ContextEntry::from))
            .collect()
    }

    #[must_use]
    pub fn id(&self) -> DialogId {
        self.id
    }

    /// Returns the identity of the trainee who started the session.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// Returns the turns in conversation order.
    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    #[must_use]
    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the persisted version this session was loaded at.
    ///
    /// Zero means the session has never been saved.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Records a successful save. Called by stores, not by application code.
    pub fn mark_saved(&mut self) {
        self.version += 1;
    }

    fn recent_start(&self) -> usize {
        self.turns.len().saturating_sub(RECENT_TURNS_KEPT)
    }
}

fn sum_tokens(turns: &[Turn]) -> u64 {
    turns.iter().map(|t| u64::from(t.token_count())).sum()
}

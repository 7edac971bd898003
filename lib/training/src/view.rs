//! Response shapes returned by the training services.

use chrono::{DateTime, Utc};
use medtrain_conversation::{DialogSession, ScenarioSummary, Turn, TurnRole};
use medtrain_core::DialogId;
use serde::Serialize;

/// A newly started dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartedDialog {
    pub dialog_id: DialogId,
    pub scenario: ScenarioSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnView {
    pub role: TurnRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&Turn> for TurnView {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role(),
            content: turn.content().to_string(),
            timestamp: turn.timestamp(),
        }
    }
}

/// One completed message exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exchange {
    pub user_message: TurnView,
    pub assistant_response: TurnView,
}

/// Full transcript of a dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogHistory {
    pub id: DialogId,
    pub user_id: String,
    pub scenario: ScenarioSummary,
    pub messages: Vec<TurnView>,
    pub total_tokens: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&DialogSession> for DialogHistory {
    fn from(session: &DialogSession) -> Self {
        Self {
            id: session.id(),
            user_id: session.user_id().to_string(),
            scenario: session.scenario().summary(),
            messages: session.turns().iter().map(TurnView::from).collect(),
            total_tokens: session.total_tokens(),
            created_at: session.created_at(),
            updated_at: session.updated_at(),
        }
    }
}

/// A dialog in a per-user listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogOverview {
    pub id: DialogId,
    pub scenario: ScenarioSummary,
    pub message_count: usize,
    pub total_tokens: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&DialogSession> for DialogOverview {
    fn from(session: &DialogSession) -> Self {
        Self {
            id: session.id(),
            scenario: session.scenario().summary(),
            message_count: session.turns().len(),
            total_tokens: session.total_tokens(),
            created_at: session.created_at(),
            updated_at: session.updated_at(),
        }
    }
}

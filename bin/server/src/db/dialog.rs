//! Dialog repository.
//!
//! Turns are stored as a JSONB array on the dialog row. Saves are
//! optimistic: a row is only written if its stored `version` still matches
//! the version the session was loaded at.

use super::scenario::ScenarioRow;
use super::{corrupt, storage_failed};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use medtrain_conversation::{DialogSession, DialogStore, StoreError, Turn};
use medtrain_core::DialogId;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use tracing::instrument;

/// Row type for dialog queries, joined with the owning scenario.
#[derive(FromRow)]
struct DialogRow {
    id: String,
    user_id: String,
    messages: serde_json::Value,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    scenario_id: String,
    title: String,
    description: String,
    system_prompt: String,
    max_tokens: i32,
}

impl DialogRow {
    fn try_into_session(self) -> Result<DialogSession, StoreError> {
        let id = DialogId::from_str(&self.id).map_err(|e| corrupt("dialog id", &self.id, e))?;
        let turns: Vec<Turn> = serde_json::from_value(self.messages)
            .map_err(|e| corrupt("messages of dialog", &self.id, e))?;
        let version =
            u64::try_from(self.version).map_err(|e| corrupt("version of dialog", &self.id, e))?;
        let scenario = ScenarioRow {
            id: self.scenario_id,
            title: self.title,
            description: self.description,
            system_prompt: self.system_prompt,
            max_tokens: self.max_tokens,
        }
        .try_into_scenario()?;

        Ok(DialogSession::restore(
            id,
            self.user_id,
            scenario,
            turns,
            self.created_at,
            self.updated_at,
            version,
        ))
    }
}

const SELECT_DIALOG: &str = r#"
    SELECT d.id, d.user_id, d.messages, d.version, d.created_at, d.updated_at,
           s.id AS scenario_id, s.title, s.description, s.system_prompt, s.max_tokens
    FROM training_dialogs d
    JOIN training_scenarios s ON s.id = d.scenario_id
"#;

/// Postgres-backed [`DialogStore`].
#[derive(Clone)]
pub struct PgDialogStore {
    pool: PgPool,
}

impl PgDialogStore {
    /// Creates a new repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DialogStore for PgDialogStore {
    #[instrument(skip(self, session), fields(dialog_id = %session.id(), version = session.version()))]
    async fn save(&self, session: &mut DialogSession) -> Result<(), StoreError> {
        let messages = serde_json::to_value(session.turns()).map_err(|e| StoreError::Corrupt {
            reason: format!("failed to encode turns: {e}"),
        })?;
        let total_tokens = i64::try_from(session.total_tokens()).unwrap_or(i64::MAX);
        let expected = i64::try_from(session.version()).unwrap_or(i64::MAX);

        let result = if session.version() == 0 {
            sqlx::query(
                r#"
                INSERT INTO training_dialogs
                    (id, user_id, scenario_id, messages, total_tokens, version, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, 1, $6, $7)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(session.id().to_string())
            .bind(session.user_id())
            .bind(session.scenario().id().to_string())
            .bind(&messages)
            .bind(total_tokens)
            .bind(session.created_at())
            .bind(session.updated_at())
            .execute(&self.pool)
            .await
        } else {
            sqlx::query(
                r#"
                UPDATE training_dialogs
                SET messages = $2, total_tokens = $3, updated_at = $4, version = version + 1
                WHERE id = $1 AND version = $5
                "#,
            )
            .bind(session.id().to_string())
            .bind(&messages)
            .bind(total_tokens)
            .bind(session.updated_at())
            .bind(expected)
            .execute(&self.pool)
            .await
        }
        .map_err(storage_failed)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict {
                id: session.id(),
                expected_version: session.version(),
            });
        }

        session.mark_saved();
        Ok(())
    }

    async fn load(&self, id: DialogId) -> Result<Option<DialogSession>, StoreError> {
        let row: Option<DialogRow> = sqlx::query_as(&format!("{SELECT_DIALOG} WHERE d.id = $1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_failed)?;

        row.map(DialogRow::try_into_session).transpose()
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<DialogSession>, StoreError> {
        let rows: Vec<DialogRow> = sqlx::query_as(&format!(
            "{SELECT_DIALOG} WHERE d.user_id = $1 ORDER BY d.updated_at DESC, d.created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_failed)?;

        rows.into_iter().map(DialogRow::try_into_session).collect()
    }
}

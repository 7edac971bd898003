//! Scenario repository.

use super::{corrupt, storage_failed};
use async_trait::async_trait;
use medtrain_conversation::{Scenario, ScenarioStore, StoreError};
use medtrain_core::ScenarioId;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;

/// Row type for scenario queries.
#[derive(FromRow)]
pub(super) struct ScenarioRow {
    pub(super) id: String,
    pub(super) title: String,
    pub(super) description: String,
    pub(super) system_prompt: String,
    pub(super) max_tokens: i32,
}

impl ScenarioRow {
    pub(super) fn try_into_scenario(self) -> Result<Scenario, StoreError> {
        let id = ScenarioId::from_str(&self.id).map_err(|e| corrupt("scenario id", &self.id, e))?;
        let max_tokens =
            u32::try_from(self.max_tokens).map_err(|e| corrupt("token budget", &self.id, e))?;

        Scenario::new(
            id,
            self.title,
            self.description,
            self.system_prompt,
            max_tokens,
        )
        .map_err(|e| corrupt("scenario", &self.id, e))
    }
}

/// Postgres-backed [`ScenarioStore`].
#[derive(Clone)]
pub struct PgScenarioStore {
    pool: PgPool,
}

impl PgScenarioStore {
    /// Creates a new repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a scenario or replaces the stored definition with the same id.
    pub async fn upsert(&self, scenario: &Scenario) -> Result<(), StoreError> {
        let max_tokens = i32::try_from(scenario.max_tokens()).unwrap_or(i32::MAX);

        sqlx::query(
            r#"
            INSERT INTO training_scenarios (id, title, description, system_prompt, max_tokens)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET title = EXCLUDED.title,
                description = EXCLUDED.description,
                system_prompt = EXCLUDED.system_prompt,
                max_tokens = EXCLUDED.max_tokens
            "#,
        )
        .bind(scenario.id().to_string())
        .bind(scenario.title())
        .bind(scenario.description())
        .bind(scenario.system_prompt())
        .bind(max_tokens)
        .execute(&self.pool)
        .await
        .map_err(storage_failed)?;

        Ok(())
    }
}

#[async_trait]
impl ScenarioStore for PgScenarioStore {
    async fn load(&self, id: ScenarioId) -> Result<Option<Scenario>, StoreError> {
        let row: Option<ScenarioRow> = sqlx::query_as(
            r#"
            SELECT id, title, description, system_prompt, max_tokens
            FROM training_scenarios
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_failed)?;

        row.map(ScenarioRow::try_into_scenario).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Scenario>, StoreError> {
        let rows: Vec<ScenarioRow> = sqlx::query_as(
            r#"
            SELECT id, title, description, system_prompt, max_tokens
            FROM training_scenarios
            ORDER BY title
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_failed)?;

        rows.into_iter().map(ScenarioRow::try_into_scenario).collect()
    }
}

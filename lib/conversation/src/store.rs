//! Storage capabilities consumed by the dialog engine.
//!
//! The engine depends only on these traits. Relational adapters live in
//! the server crate; [`crate::memory`] provides in-process ones.

use crate::error::StoreError;
use crate::scenario::Scenario;
use crate::session::DialogSession;
use async_trait::async_trait;
use medtrain_core::{DialogId, ScenarioId};

/// Persistence for dialog sessions.
#[async_trait]
pub trait DialogStore: Send + Sync {
    /// Inserts or updates a session.
    ///
    /// The write only succeeds if the stored copy is still at
    /// `session.version()`; on success the session is marked saved.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if another writer saved first.
    async fn save(&self, session: &mut DialogSession) -> Result<(), StoreError>;

    /// Loads a session by ID.
    async fn load(&self, id: DialogId) -> Result<Option<DialogSession>, StoreError>;

    /// Lists the sessions started by a user, most recently updated first.
    ///
    /// Ties on `updated_at` are broken by `created_at`, newest first.
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<DialogSession>, StoreError>;
}

/// Read-only access to authored scenarios.
#[async_trait]
pub trait ScenarioStore: Send + Sync {
    /// Loads a scenario by ID.
    async fn load(&self, id: ScenarioId) -> Result<Option<Scenario>, StoreError>;

    /// Lists every scenario, ordered by title.
    async fn list_all(&self) -> Result<Vec<Scenario>, StoreError>;
}

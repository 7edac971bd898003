//! In-process store adapters.
//!
//! Used by tests and by the server when no database is configured. State
//! lives for the lifetime of the value and is never written to disk.

use crate::error::StoreError;
use crate::scenario::Scenario;
use crate::session::DialogSession;
use crate::store::{DialogStore, ScenarioStore};
use async_trait::async_trait;
use medtrain_core::{DialogId, ScenarioId};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

/// A [`DialogStore`] backed by a map.
#[derive(Debug, Default)]
pub struct InMemoryDialogStore {
    dialogs: Mutex<HashMap<DialogId, DialogSession>>,
}

impl InMemoryDialogStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<DialogId, DialogSession>> {
        self.dialogs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl DialogStore for InMemoryDialogStore {
    async fn save(&self, session: &mut DialogSession) -> Result<(), StoreError> {
        let mut dialogs = self.lock();
        let stored_version = dialogs.get(&session.id()).map_or(0, DialogSession::version);
        if stored_version != session.version() {
            return Err(StoreError::Conflict {
                id: session.id(),
                expected_version: session.version(),
            });
        }
        session.mark_saved();
        dialogs.insert(session.id(), session.clone());
        Ok(())
    }

    async fn load(&self, id: DialogId) -> Result<Option<DialogSession>, StoreError> {
        Ok(self.lock().get(&id).cloned())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<DialogSession>, StoreError> {
        let mut sessions: Vec<DialogSession> = self
            .lock()
            .values()
            .filter(|s| s.user_id() == user_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| {
            (b.updated_at(), b.created_at()).cmp(&(a.updated_at(), a.created_at()))
        });
        Ok(sessions)
    }
}

/// A [`ScenarioStore`] holding a fixed set of scenarios.
#[derive(Debug, Default)]
pub struct InMemoryScenarioStore {
    scenarios: RwLock<HashMap<ScenarioId, Scenario>>,
}

impl InMemoryScenarioStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `scenarios`.
    #[must_use]
    pub fn with_scenarios(scenarios: impl IntoIterator<Item = Scenario>) -> Self {
        let store = Self::new();
        for scenario in scenarios {
            store.insert(scenario);
        }
        store
    }

    /// Adds or replaces a scenario.
    pub fn insert(&self, scenario: Scenario) {
        self.scenarios
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(scenario.id(), scenario);
    }
}

#[async_trait]
impl ScenarioStore for InMemoryScenarioStore {
    async fn load(&self, id: ScenarioId) -> Result<Option<Scenario>, StoreError> {
        Ok(self
            .scenarios
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Scenario>, StoreError> {
        let mut scenarios: Vec<Scenario> = self
            .scenarios
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        scenarios.sort_by(|a, b| a.title().cmp(b.title()));
        Ok(scenarios)
    }
}

//! PostgreSQL adapters for the dialog and scenario stores.

pub mod dialog;
pub mod scenario;

pub use dialog::PgDialogStore;
pub use scenario::PgScenarioStore;

use medtrain_conversation::StoreError;

fn storage_failed(e: sqlx::Error) -> StoreError {
    StoreError::StorageFailed {
        reason: e.to_string(),
    }
}

fn corrupt(what: &str, id: &str, reason: impl std::fmt::Display) -> StoreError {
    StoreError::Corrupt {
        reason: format!("invalid {what} '{id}': {reason}"),
    }
}

//! Dialog engine for the medtrain platform.
//!
//! This crate provides:
//!
//! - **Scenario**: Read-only definition of a training situation and its token budget
//! - **Turn**: One immutable, role-tagged message in a conversation
//! - **DialogSession**: The aggregate that owns a conversation, tracks its token
//!   total and compacts older turns into a summary when the budget is threatened
//! - **Stores**: Capability traits for persisting sessions and resolving scenarios,
//!   plus in-memory adapters

pub mod context;
pub mod error;
pub mod memory;
pub mod scenario;
pub mod session;
pub mod store;
pub mod turn;

pub use context::ContextEntry;
pub use error::{StoreError, ValidationError};
pub use memory::{InMemoryDialogStore, InMemoryScenarioStore};
pub use scenario::{Scenario, ScenarioSummary};
pub use session::{DialogSession, RECENT_TURNS_KEPT, SUMMARY_PREFIX};
pub use store::{DialogStore, ScenarioStore};
pub use turn::{Turn, TurnRole, estimate_tokens};

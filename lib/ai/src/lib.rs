//! AI capabilities for the medtrain platform.
//!
//! This crate provides:
//!
//! - **TextGenerator**: The capability the dialog engine talks to. Given an
//!   ordered context window it returns generated text and a token count, and
//!   it can condense a run of turns into a short summary.
//! - **Summary prompts**: How a transcript is framed for summarization
//! - **YandexGPT adapter**: A `TextGenerator` over the Foundation Models
//!   completion API

pub mod backend;
pub mod error;
pub mod summary;
pub mod yandex;

pub use backend::{Generation, TextGenerator};
pub use error::LlmError;
pub use medtrain_conversation::ContextEntry;
pub use summary::{fallback_summary, summary_request};
pub use yandex::{YandexGptClient, YandexGptConfig};
